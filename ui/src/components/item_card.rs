use api::Category;
use api::Item;
use dioxus::prelude::*;

use crate::components::pico::Button;
use crate::components::pico::ButtonType;

/// One catalog item in a grid, with quick actions.
#[component]
pub fn ItemCard(
    item: Item,
    on_open: EventHandler<Item>,
    on_add_to_cart: EventHandler<Item>,
    #[props(optional)] on_favourite: Option<EventHandler<Item>>,
) -> Element {
    let price = item.price.to_string_with_symbol();
    let open_item = item.clone();
    let cart_item = item.clone();
    let favourite_item = item.clone();

    rsx! {
        article {
            class: "item-card",
            header {
                a {
                    href: "#",
                    onclick: move |evt| {
                        evt.prevent_default();
                        on_open.call(open_item.clone());
                    },
                    strong { "{item.name}" }
                }
            }
            p { "{price} / {item.unit}" }
            footer {
                Button {
                    on_click: move |_| on_add_to_cart.call(cart_item.clone()),
                    "Add to cart"
                }
                if let Some(on_favourite) = on_favourite {
                    Button {
                        button_type: ButtonType::Secondary,
                        outline: true,
                        on_click: move |_| on_favourite.call(favourite_item.clone()),
                        "♥"
                    }
                }
            }
        }
    }
}

#[component]
pub fn CategoryButton(category: Category, on_select: EventHandler<Category>) -> Element {
    let selected = category.clone();
    rsx! {
        button {
            class: "secondary category-button",
            onclick: move |_| on_select.call(selected.clone()),
            "{category.name}"
        }
    }
}
