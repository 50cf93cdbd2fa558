use api::federated::FederatedResolver;
use api::FederatedProvider;
use dioxus::prelude::*;

use crate::app_state::AppState;
use crate::components::federated_prompt::FederatedPrompt;
use crate::components::pico::Button;
use crate::components::pico::ButtonType;
use crate::components::pico::Card;
use crate::components::pico::TextField;
use crate::hooks::use_observable::use_observable;
use crate::hooks::use_view_model::use_view_model;
use crate::validation::MIN_PASSWORD_LEN;
use crate::view_models::sign_in::SignInEvent;
use crate::view_models::sign_in::SignInViewModel;

#[component]
pub fn SignInScreen() -> Element {
    let app_state = use_context::<AppState>();
    let vm = use_view_model(SignInViewModel::new);
    let form = use_observable(vm.form());
    let submission = use_observable(vm.submission.watch());
    let pending = use_signal(|| None::<FederatedResolver>);

    let federated_enabled = app_state.config.federated_sign_in_enabled();
    let form = form.read().clone();
    let busy = submission.read().is_loading();
    let submission_error = submission.read().error().map(str::to_string);

    rsx! {
        Card {
            h3 { "Welcome back" }
            TextField {
                label: "Email",
                input_type: "email",
                value: form.email.clone(),
                error: form.email_check.error_text("Enter a valid email address"),
                on_input: {
                    let vm = vm.clone();
                    move |v| vm.on_event(SignInEvent::EmailChanged(v))
                },
            }
            TextField {
                label: "Password",
                input_type: "password",
                value: form.password.clone(),
                error: form.password_check.error_text(format!("At least {MIN_PASSWORD_LEN} characters")),
                on_input: {
                    let vm = vm.clone();
                    move |v| vm.on_event(SignInEvent::PasswordChanged(v))
                },
            }
            if let Some(message) = submission_error {
                p { class: "error-text", role: "alert", "{message}" }
            }
            Button {
                busy,
                on_click: {
                    let vm = vm.clone();
                    move |_| vm.on_event(SignInEvent::LoginButtonClicked)
                },
                "Sign in"
            }
            if federated_enabled {
                Button {
                    button_type: ButtonType::Secondary,
                    outline: true,
                    disabled: busy,
                    on_click: {
                        let vm = vm.clone();
                        let mut pending = pending;
                        move |_| {
                            if let Some(resolver) = vm.sign_in_with(FederatedProvider::Google) {
                                pending.set(Some(resolver));
                            }
                        }
                    },
                    "Continue with Google"
                }
            }
            p {
                "New here? "
                a {
                    href: "#",
                    onclick: {
                        let vm = vm.clone();
                        move |evt: MouseEvent| {
                            evt.prevent_default();
                            vm.open_sign_up();
                        }
                    },
                    "Create an account"
                }
            }
        }
        FederatedPrompt { pending }
    }
}
