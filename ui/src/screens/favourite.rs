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
use crate::view_models::favourites::FavouritesViewModel;

#[component]
pub fn FavouriteScreen() -> Element {
    let vm = use_view_model(|services| {
        let vm = FavouritesViewModel::new(services);
        vm.load();
        vm
    });
    let favourites = use_observable(vm.favourites.watch());

    rsx! {
        match favourites() {
            UiState::Idle | UiState::Loading => rsx! {
                LoadingCard { title: "Favourites" }
            },
            UiState::Error(message) => rsx! {
                ErrorCard {
                    title: "Favourites",
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
                    title: "No favourites yet".to_string(),
                    description: Some("Tap ♥ on an item to keep it here.".to_string()),
                    icon: Some("♥".to_string()),
                }
            },
            UiState::Success(list) => rsx! {
                Card {
                    h3 { "Favourites" }
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
