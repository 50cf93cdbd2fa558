use dioxus::prelude::*;

use crate::components::pico::Card;

/// Shown while the configuration loads and any stored session is checked.
#[component]
pub fn SplashScreen(#[props(optional)] error: Option<String>) -> Element {
    rsx! {
        div {
            class: "splash",
            h1 { "DashDrop" }
            p { "Groceries at your door." }
            match error {
                None => rsx! { progress {} },
                Some(error) => rsx! {
                    Card {
                        h3 { "Could not start" }
                        p { class: "error-text", "{error}" }
                    }
                },
            }
        }
    }
}
