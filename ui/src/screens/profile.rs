use dioxus::prelude::*;

use crate::components::async_view::ErrorCard;
use crate::components::async_view::LoadingCard;
use crate::components::pico::Button;
use crate::components::pico::ButtonType;
use crate::components::pico::Card;
use crate::hooks::use_observable::use_observable;
use crate::hooks::use_view_model::use_view_model;
use crate::state::UiState;
use crate::view_models::profile::ProfileViewModel;
use crate::view_models::session::SessionViewModel;

#[component]
pub fn ProfileScreen() -> Element {
    let vm = use_view_model(|services| {
        let vm = ProfileViewModel::new(services);
        vm.load();
        vm
    });
    let session = use_view_model(SessionViewModel::new);
    let profile = use_observable(vm.profile.watch());
    let logout = use_observable(session.logout.watch());

    let logout_error = logout.read().error().map(str::to_string);

    rsx! {
        match profile() {
            UiState::Idle | UiState::Loading => rsx! {
                LoadingCard { title: "Profile" }
            },
            UiState::Error(message) => rsx! {
                ErrorCard {
                    title: "Profile",
                    message,
                    on_retry: {
                        let vm = vm.clone();
                        move |_| {
                            vm.load();
                        }
                    },
                }
            },
            UiState::Success(found) => rsx! {
                Card {
                    h3 { "Profile" }
                    match found {
                        Some(profile) => rsx! {
                            dl {
                                dt { "Name" }
                                dd { "{profile.name}" }
                                dt { "Email" }
                                dd { "{profile.email}" }
                            }
                        },
                        None => rsx! {
                            p { "No profile saved for this account." }
                        },
                    }
                }
            },
        }
        Card {
            if let Some(message) = logout_error {
                p { class: "error-text", role: "alert", "{message}" }
            }
            Button {
                button_type: ButtonType::Contrast,
                busy: logout.read().is_loading(),
                on_click: move |_| {
                    session.logout();
                },
                "Log out"
            }
        }
    }
}
