use api::federated::FederatedResolver;
use dioxus::prelude::*;

use crate::components::pico::Button;
use crate::components::pico::Modal;
use crate::components::pico::TextField;

/// Collects the identity token for a pending federated sign-in.
///
/// Closing the dialog drops the resolver, which cancels the sign-in.
#[component]
pub fn FederatedPrompt(pending: Signal<Option<FederatedResolver>>) -> Element {
    let mut token = use_signal(String::new);
    let mut pending = pending;

    let Some(provider) = pending.read().as_ref().map(|r| r.provider()) else {
        return rsx! {};
    };

    rsx! {
        Modal {
            title: "Continue with {provider}",
            on_close: move |_| {
                pending.set(None);
                token.set(String::new());
            },
            p { "Paste the ID token issued by {provider}." }
            TextField {
                label: "ID token",
                value: token(),
                on_input: move |v| token.set(v),
            }
            Button {
                disabled: token.read().trim().is_empty(),
                on_click: move |_| {
                    if let Some(resolver) = pending.write().take() {
                        resolver.resolve(token.read().trim().to_string());
                    }
                    token.set(String::new());
                },
                "Continue"
            }
        }
    }
}
