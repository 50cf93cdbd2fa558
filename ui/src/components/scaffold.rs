//! Chrome shared by the signed-in screens: a top bar and the bottom
//! navigation.

use dioxus::prelude::*;
use dioxus_logger::tracing::info;

use crate::app_state::AppState;
use crate::components::pico::Button;
use crate::components::pico::ButtonType;
use crate::hooks::use_observable::use_observable;
use crate::hooks::use_view_model::use_view_model;
use crate::navigation::BackOutcome;
use crate::navigation::Route;
use crate::navigation::RouteKind;
use crate::navigation::BOTTOM_NAV;
use crate::view_models::session::SessionViewModel;

fn nav_label(kind: RouteKind) -> &'static str {
    match kind {
        RouteKind::Home => "🏠 Home",
        RouteKind::Favourite => "♥ Favourites",
        RouteKind::Cart => "🛒 Cart",
        RouteKind::Profile => "👤 Profile",
        _ => "",
    }
}

/// Leaves the app when there is nothing to go back to.
fn exit_app() {
    info!("back pressed on the last screen, exiting");
    #[cfg(feature = "desktop")]
    dioxus::desktop::window().close();
}

#[component]
pub fn TopBar(route: Route) -> Element {
    let app_state = use_context::<AppState>();
    let session = use_view_model(SessionViewModel::new);
    let logging_out = use_observable(session.logout.watch());

    let navigator = app_state.services.navigator.clone();
    let can_go_back = app_state.services.navigator.back_stack().len() > 1;
    let signed_in = route.kind().requires_session();

    rsx! {
        header {
            class: "top-bar",
            nav {
                ul {
                    if can_go_back || signed_in {
                        li {
                            a {
                                href: "#",
                                "aria-label": "Back",
                                onclick: move |evt| {
                                    evt.prevent_default();
                                    if let BackOutcome::Exit = navigator.pop_back() {
                                        exit_app();
                                    }
                                },
                                "←"
                            }
                        }
                    }
                    li {
                        h1 { class: "top-bar-title", "{route.title()}" }
                    }
                }
                if signed_in {
                    ul {
                        li {
                            Button {
                                button_type: ButtonType::Contrast,
                                outline: true,
                                busy: logging_out.read().is_loading(),
                                on_click: move |_| {
                                    session.logout();
                                },
                                "Log out"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn BottomNav(active: RouteKind) -> Element {
    let app_state = use_context::<AppState>();

    rsx! {
        nav {
            class: "bottom-nav",
            ul {
                for kind in BOTTOM_NAV {
                    li {
                        a {
                            href: "#",
                            class: if kind == active { "active-tab" } else { "" },
                            "aria-current": if kind == active { "page" } else { "false" },
                            onclick: {
                                let services = app_state.services();
                                move |evt: MouseEvent| {
                                    evt.prevent_default();
                                    if kind != active {
                                        if let Some(route) = Route::for_nav(kind) {
                                            services.go(route);
                                        }
                                    }
                                }
                            },
                            "{nav_label(kind)}"
                        }
                    }
                }
            }
        }
    }
}
