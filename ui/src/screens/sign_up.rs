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
use crate::validation::MIN_NAME_LEN;
use crate::validation::MIN_PASSWORD_LEN;
use crate::view_models::sign_up::SignUpEvent;
use crate::view_models::sign_up::SignUpViewModel;

#[component]
pub fn SignUpScreen() -> Element {
    let app_state = use_context::<AppState>();
    let vm = use_view_model(SignUpViewModel::new);
    let form = use_observable(vm.form());
    let submission = use_observable(vm.submission.watch());
    let pending = use_signal(|| None::<FederatedResolver>);

    let federated_enabled = app_state.config.federated_sign_in_enabled();
    let form = form.read().clone();
    let busy = submission.read().is_loading();
    let submission_error = submission.read().error().map(str::to_string);
    let can_submit = form.all_validations_passed() && !busy;

    let on_event = {
        let vm = vm.clone();
        move |event: SignUpEvent| vm.on_event(event)
    };

    rsx! {
        Card {
            h3 { "Create your account" }
            TextField {
                label: "Name",
                value: form.name.clone(),
                error: form.name_check.error_text(format!("At least {MIN_NAME_LEN} characters")),
                on_input: {
                    let on_event = on_event.clone();
                    move |v| on_event(SignUpEvent::NameChanged(v))
                },
            }
            TextField {
                label: "Email",
                input_type: "email",
                value: form.email.clone(),
                error: form.email_check.error_text("Enter a valid email address"),
                on_input: {
                    let on_event = on_event.clone();
                    move |v| on_event(SignUpEvent::EmailChanged(v))
                },
            }
            TextField {
                label: "Password",
                input_type: "password",
                value: form.password.clone(),
                error: form.password_check.error_text(format!("At least {MIN_PASSWORD_LEN} characters")),
                on_input: {
                    let on_event = on_event.clone();
                    move |v| on_event(SignUpEvent::PasswordChanged(v))
                },
            }
            if let Some(message) = submission_error {
                p { class: "error-text", role: "alert", "{message}" }
            }
            Button {
                busy,
                disabled: !can_submit,
                on_click: {
                    let on_event = on_event.clone();
                    move |_| on_event(SignUpEvent::RegisterButtonClicked)
                },
                "Register"
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
                            if let Some(resolver) = vm.sign_up_with(FederatedProvider::Google) {
                                pending.set(Some(resolver));
                            }
                        }
                    },
                    "Sign up with Google"
                }
            }
            p {
                "Already registered? "
                a {
                    href: "#",
                    onclick: {
                        let vm = vm.clone();
                        move |evt: MouseEvent| {
                            evt.prevent_default();
                            vm.open_sign_in();
                        }
                    },
                    "Sign in"
                }
            }
        }
        FederatedPrompt { pending }
    }
}
