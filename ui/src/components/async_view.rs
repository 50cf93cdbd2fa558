//! Rendering for the two non-data load states.

use dioxus::prelude::*;

use crate::components::pico::Button;
use crate::components::pico::ButtonType;
use crate::components::pico::Card;

#[component]
pub fn LoadingCard(title: String) -> Element {
    rsx! {
        Card {
            h3 { "{title}" }
            p { "Loading..." }
            progress {}
        }
    }
}

/// Shows a failed load with a retry button.
#[component]
pub fn ErrorCard(title: String, message: String, on_retry: EventHandler<()>) -> Element {
    rsx! {
        Card {
            h3 { "{title}" }
            p { class: "error-text", "{message}" }
            Button {
                button_type: ButtonType::Secondary,
                on_click: move |_| on_retry.call(()),
                "Retry"
            }
        }
    }
}
