use api::Item;
use dioxus::prelude::*;

use crate::components::async_view::ErrorCard;
use crate::components::async_view::LoadingCard;
use crate::components::empty_state::EmptyState;
use crate::components::item_card::ItemCard;
use crate::components::pico::Card;
use crate::components::toast::Toast;
use crate::hooks::use_observable::use_observable;
use crate::hooks::use_view_model::use_view_model;
use crate::state::UiState;
use crate::view_models::category::CategoryViewModel;

#[component]
pub fn CategoryScreen(name: String) -> Element {
    let vm = use_view_model(|services| {
        let vm = CategoryViewModel::new(services, name.clone());
        vm.load();
        vm
    });
    let items = use_observable(vm.items.watch());

    rsx! {
        match items() {
            UiState::Idle | UiState::Loading => rsx! {
                LoadingCard { title: "{name}" }
            },
            UiState::Error(message) => rsx! {
                ErrorCard {
                    title: "{name}",
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
                    title: format!("No items in {name}"),
                    icon: Some("🥕".to_string()),
                }
            },
            UiState::Success(list) => rsx! {
                Card {
                    div {
                        class: "item-grid",
                        for item in list {
                            ItemCard {
                                key: "{item.id}",
                                item,
                                on_open: {
                                    let vm = vm.clone();
                                    move |item: Item| vm.open_details(&item)
                                },
                                on_add_to_cart: {
                                    let vm = vm.clone();
                                    move |item: Item| {
                                        vm.add_to_cart(&item);
                                    }
                                },
                                on_favourite: {
                                    let vm = vm.clone();
                                    move |item: Item| {
                                        vm.add_to_favourite(&item);
                                    }
                                },
                            }
                        }
                    }
                }
            },
        }
        Toast {
            message: vm.notice.watch(),
            on_dismiss: {
                let notice = vm.notice.clone();
                move |_| notice.dismiss()
            },
        }
    }
}
