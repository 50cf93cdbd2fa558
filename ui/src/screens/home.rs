use api::Category;
use dioxus::prelude::*;

use crate::components::async_view::ErrorCard;
use crate::components::async_view::LoadingCard;
use crate::components::empty_state::EmptyState;
use crate::components::item_card::CategoryButton;
use crate::components::pico::Card;
use crate::hooks::use_observable::use_observable;
use crate::hooks::use_view_model::use_view_model;
use crate::state::UiState;
use crate::view_models::home::HomeViewModel;

#[component]
pub fn HomeScreen() -> Element {
    let vm = use_view_model(|services| {
        let vm = HomeViewModel::new(services);
        vm.load();
        vm
    });
    let categories = use_observable(vm.categories.watch());

    rsx! {
        match categories() {
            UiState::Idle | UiState::Loading => rsx! {
                LoadingCard { title: "Shop by category" }
            },
            UiState::Error(message) => rsx! {
                ErrorCard {
                    title: "Shop by category",
                    message,
                    on_retry: {
                        let vm = vm.clone();
                        move |_| {
                            vm.load();
                        }
                    },
                }
            },
            UiState::Success(list) if list.is_empty() => rsx! {
                EmptyState {
                    title: "Nothing on the shelves yet".to_string(),
                    description: Some("Check back soon.".to_string()),
                    icon: Some("🧺".to_string()),
                }
            },
            UiState::Success(list) => rsx! {
                Card {
                    h3 { "Shop by category" }
                    div {
                        class: "category-grid",
                        for category in list {
                            CategoryButton {
                                key: "{category.name}",
                                category,
                                on_select: {
                                    let vm = vm.clone();
                                    move |c: Category| vm.select_category(&c)
                                },
                            }
                        }
                    }
                }
            },
        }
    }
}
