use dioxus::prelude::*;

use crate::components::async_view::ErrorCard;
use crate::components::async_view::LoadingCard;
use crate::components::cart_line::CartLineRow;
use crate::components::empty_state::EmptyState;
use crate::components::pico::Button;
use crate::components::pico::Card;
use crate::hooks::use_observable::use_observable;
use crate::hooks::use_view_model::use_view_model;
use crate::state::UiState;
use crate::view_models::cart::subtotal;
use crate::view_models::cart::CartViewModel;

#[component]
pub fn CartScreen() -> Element {
    let vm = use_view_model(|services| {
        let vm = CartViewModel::new(services);
        vm.get_all_cart();
        vm
    });
    let cart = use_observable(vm.cart.watch());

    rsx! {
        match cart() {
            UiState::Idle | UiState::Loading => rsx! {
                LoadingCard { title: "Cart" }
            },
            UiState::Error(message) => rsx! {
                ErrorCard {
                    title: "Cart",
                    message,
                    on_retry: {
                        let vm = vm.clone();
                        move |_| {
                            vm.get_all_cart();
                        }
                    },
                }
            },
            UiState::Success(lines) if lines.is_empty() => rsx! {
                EmptyState {
                    title: "Your cart is empty".to_string(),
                    description: Some("Add something from the catalog to get started.".to_string()),
                    icon: Some("🛒".to_string()),
                }
            },
            UiState::Success(lines) => {
                let total = subtotal(&lines).to_string_with_symbol();
                rsx! {
                    Card {
                        h3 { "Cart ({lines.len()})" }
                        div {
                            style: "overflow-x: auto;",
                            table {
                                thead {
                                    tr {
                                        th { "Item" }
                                        th { "Price" }
                                        th { "Qty" }
                                        th { style: "text-align: right;", "Total" }
                                    }
                                }
                                tbody {
                                    for (i, line) in lines.into_iter().enumerate() {
                                        CartLineRow {
                                            key: "{i}",
                                            line,
                                        }
                                    }
                                }
                                tfoot {
                                    tr {
                                        th { colspan: "3", "Subtotal" }
                                        th { style: "text-align: right;", "{total}" }
                                    }
                                }
                            }
                        }
                        Button {
                            on_click: {
                                let vm = vm.clone();
                                move |_| vm.checkout()
                            },
                            "Checkout"
                        }
                    }
                }
            }
        }
    }
}
