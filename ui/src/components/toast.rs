use std::time::Duration;

use dioxus::prelude::*;

use crate::hooks::use_observable::use_observable;
use crate::state::ObservableRef;

const TOAST_DURATION: Duration = Duration::from_secs(3);

/// A transient message pinned above the bottom navigation.
///
/// Each new message restarts the dismiss timer.
#[component]
pub fn Toast(message: ObservableRef<Option<String>>, on_dismiss: EventHandler<()>) -> Element {
    let message = use_observable(message);
    let mut shown_at = use_signal(|| 0u64);

    use_effect(move || {
        if message.read().is_some() {
            let generation = *shown_at.peek() + 1;
            shown_at.set(generation);
            spawn(async move {
                tokio::time::sleep(TOAST_DURATION).await;
                if *shown_at.peek() == generation {
                    on_dismiss.call(());
                }
            });
        }
    });

    rsx! {
        if let Some(text) = message() {
            div {
                class: "toast",
                role: "status",
                onclick: move |_| on_dismiss.call(()),
                "{text}"
            }
        }
    }
}
