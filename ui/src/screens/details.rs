use api::Item;
use dioxus::prelude::*;

use crate::components::pico::Button;
use crate::components::pico::ButtonType;
use crate::components::pico::Card;
use crate::components::toast::Toast;
use crate::hooks::use_observable::use_observable;
use crate::hooks::use_view_model::use_view_model;
use crate::view_models::details::DetailsViewModel;
use crate::view_models::details::MAX_QUANTITY;
use crate::view_models::details::MIN_QUANTITY;

#[component]
pub fn DetailsScreen(item: Item) -> Element {
    let vm = use_view_model(|services| DetailsViewModel::new(services, item.clone()));
    let quantity = use_observable(vm.quantity());

    let price = item.price.to_string_with_symbol();
    let total = item.price.times(quantity()).to_string_with_symbol();
    let description = item
        .description
        .clone()
        .unwrap_or_else(|| "No description available.".to_string());

    rsx! {
        Card {
            header {
                h3 { style: "margin-bottom: 0;", "{item.name}" }
                small { "{item.category}" }
            }
            p { "{description}" }
            p { strong { "{price}" } " / {item.unit}" }
            div {
                class: "quantity-stepper",
                role: "group",
                Button {
                    button_type: ButtonType::Secondary,
                    outline: true,
                    disabled: quantity() <= MIN_QUANTITY,
                    on_click: {
                        let vm = vm.clone();
                        move |_| vm.decrement()
                    },
                    "−"
                }
                span { class: "quantity", "{quantity}" }
                Button {
                    button_type: ButtonType::Secondary,
                    outline: true,
                    disabled: quantity() >= MAX_QUANTITY,
                    on_click: {
                        let vm = vm.clone();
                        move |_| vm.increment()
                    },
                    "+"
                }
            }
            footer {
                Button {
                    on_click: {
                        let vm = vm.clone();
                        move |_| {
                            vm.add_to_cart();
                        }
                    },
                    "Add to cart · {total}"
                }
                Button {
                    button_type: ButtonType::Secondary,
                    outline: true,
                    on_click: {
                        let vm = vm.clone();
                        move |_| {
                            vm.add_to_favourite();
                        }
                    },
                    "♥ Favourite"
                }
                Button {
                    button_type: ButtonType::Contrast,
                    outline: true,
                    on_click: {
                        let vm = vm.clone();
                        move |_| vm.open_cart()
                    },
                    "Go to cart"
                }
            }
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
