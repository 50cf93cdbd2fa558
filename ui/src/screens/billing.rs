use api::AddressId;
use dioxus::prelude::*;

use crate::components::address_item::AddressItem;
use crate::components::async_view::ErrorCard;
use crate::components::async_view::LoadingCard;
use crate::components::empty_state::EmptyState;
use crate::components::pico::Button;
use crate::components::pico::Card;
use crate::hooks::use_observable::use_observable;
use crate::hooks::use_view_model::use_view_model;
use crate::state::UiState;
use crate::view_models::billing::BillingViewModel;
use crate::view_models::cart::subtotal;

#[component]
pub fn BillingScreen() -> Element {
    let vm = use_view_model(|services| {
        let vm = BillingViewModel::new(services);
        vm.load();
        vm
    });
    let addresses = use_observable(vm.addresses.watch());
    let cart = use_observable(vm.cart.watch());
    let selected = use_observable(vm.selected());
    let order = use_observable(vm.order.watch());

    // re-read on every render; each observable above triggers one
    let can_place_order = vm.can_place_order();
    let order_error = order.read().error().map(str::to_string);
    let retry = {
        let vm = vm.clone();
        move |_: ()| vm.load()
    };

    rsx! {
        match addresses() {
            UiState::Idle | UiState::Loading => rsx! {
                LoadingCard { title: "Delivery address" }
            },
            UiState::Error(message) => rsx! {
                ErrorCard { title: "Delivery address", message, on_retry: retry.clone() }
            },
            UiState::Success(list) if list.is_empty() => rsx! {
                EmptyState {
                    title: "No saved addresses".to_string(),
                    description: Some("Add an address to your account to check out.".to_string()),
                    icon: Some("📍".to_string()),
                }
            },
            UiState::Success(list) => rsx! {
                Card {
                    h3 { "Delivery address" }
                    for address in list {
                        AddressItem {
                            key: "{address.address_id}",
                            selected: selected() == Some(address.address_id),
                            address,
                            on_select: {
                                let vm = vm.clone();
                                move |id: AddressId| vm.select_address(id)
                            },
                        }
                    }
                }
            },
        }
        match cart() {
            UiState::Idle | UiState::Loading => rsx! {
                LoadingCard { title: "Order summary" }
            },
            UiState::Error(message) => rsx! {
                ErrorCard { title: "Order summary", message, on_retry: retry.clone() }
            },
            UiState::Success(lines) => {
                let total = subtotal(&lines).to_string_with_symbol();
                rsx! {
                    Card {
                        h3 { "Order summary" }
                        ul {
                            for line in lines.iter() {
                                li {
                                    "{line.name} × {line.quantity} = {line.line_total().to_string_with_symbol()}"
                                }
                            }
                        }
                        p { strong { "Total: {total}" } }
                        if let Some(message) = order_error {
                            p { class: "error-text", role: "alert", "{message}" }
                        }
                        Button {
                            disabled: !can_place_order,
                            busy: order.read().is_loading(),
                            on_click: {
                                let vm = vm.clone();
                                move |_| {
                                    vm.place_order();
                                }
                            },
                            "Place order"
                        }
                    }
                }
            }
        }
    }
}
