// The client-side Dioxus application logic.

use dioxus::prelude::*;

mod app_state;
mod components;
pub mod hooks;
pub mod navigation;
mod screens;
pub mod state;
pub mod validation;
pub mod view_models;

use app_state::AppState;
use components::scaffold::BottomNav;
use components::scaffold::TopBar;
use hooks::use_observable::use_observable;
use navigation::Route;
use screens::billing::BillingScreen;
use screens::cart::CartScreen;
use screens::category::CategoryScreen;
use screens::details::DetailsScreen;
use screens::favourite::FavouriteScreen;
use screens::home::HomeScreen;
use screens::profile::ProfileScreen;
use screens::sign_in::SignInScreen;
use screens::sign_up::SignUpScreen;
use screens::splash::SplashScreen;

const PICO_CSS: &str = "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.cyan.min.css";

const APP_CSS: &str = r#"
    /* --- RESET --- */
    * { box-sizing: border-box; }

    html, body {
        height: 100%;
        width: 100%;
        margin: 0;
        padding: 0;
        overflow: hidden;
    }

    /* --- APP FRAME --- */
    .app-main-container {
        position: fixed;
        top: 0; left: 0; right: 0; bottom: 0;
        display: flex;
        flex-direction: column;
        overflow: hidden;
        background-color: var(--pico-background-color);
    }

    .top-bar {
        flex-shrink: 0;
        padding: 0 1rem;
        border-bottom: 1px solid var(--pico-muted-border-color);
        --pico-nav-element-spacing-vertical: 0.5rem;
    }
    .top-bar-title { margin: 0; font-size: 1.25rem; }

    /* --- CONTENT AREA --- */
    .app-main-container .content {
        flex: 1;
        overflow-y: auto;
        min-height: 0;
        padding: 1rem;
    }

    /* --- BOTTOM NAVIGATION --- */
    .bottom-nav {
        flex-shrink: 0;
        border-top: 1px solid var(--pico-muted-border-color);
        background-color: var(--pico-card-background-color);
    }
    .bottom-nav ul { display: flex; justify-content: space-around; width: 100%; margin: 0; }
    .bottom-nav a:not(.active-tab) { color: var(--pico-muted-color); }
    .bottom-nav a.active-tab {
        color: var(--pico-primary) !important;
        font-weight: bold;
        border-top: 3px solid var(--pico-primary);
    }

    /* --- CATALOG --- */
    .category-grid, .item-grid {
        display: grid;
        grid-template-columns: repeat(auto-fill, minmax(160px, 1fr));
        gap: 1rem;
    }
    .item-card { margin: 0; }
    .item-card footer { display: flex; gap: 0.5rem; }
    .quantity-stepper { display: flex; align-items: center; gap: 1rem; }
    .quantity { min-width: 2ch; text-align: center; font-size: 1.25rem; }

    /* --- CHECKOUT --- */
    .address-item {
        display: block;
        padding: 0.75rem;
        margin-bottom: 0.5rem;
        border: 1px solid var(--pico-muted-border-color);
        border-radius: var(--pico-border-radius);
    }
    .address-item.selected { border-color: var(--pico-primary); }

    /* --- FEEDBACK --- */
    .error-text { color: var(--pico-del-color); }
    .empty-state {
        display: flex;
        flex-direction: column;
        align-items: center;
        padding: 2rem;
        text-align: center;
        color: var(--pico-muted-color);
        border: 2px dashed var(--pico-card-border-color);
        border-radius: var(--pico-border-radius);
        margin: 1rem 0;
    }
    .empty-state-icon { font-size: 20vmin; margin-bottom: 1rem; opacity: 0.8; }
    .toast {
        position: fixed;
        left: 50%;
        bottom: 5rem;
        transform: translateX(-50%);
        padding: 0.75rem 1.25rem;
        border-radius: var(--pico-border-radius);
        background: var(--pico-contrast-background);
        color: var(--pico-contrast-inverse);
        z-index: 200;
        cursor: pointer;
    }
    .splash {
        display: flex;
        flex-direction: column;
        align-items: center;
        justify-content: center;
        height: 100vh;
        padding: 2rem;
    }
"#;

//=============================================================================
// MAIN APPLICATION COMPONENT
//=============================================================================

#[allow(non_snake_case)]
pub fn App() -> Element {
    rsx! {
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1.0",
        }
        document::Stylesheet {
            href: PICO_CSS,
        }
        style {
            "{APP_CSS}"
        }
        AppBody {}
    }
}

#[component]
fn AppBody() -> Element {
    let bootstrap = use_resource(move || async move { AppState::bootstrap().await });

    let body = match &*bootstrap.read() {
        Some(Ok(app_state)) => rsx! {
            LoadedApp {
                app_state: app_state.clone(),
            }
        },
        Some(Err(e)) => {
            dioxus_logger::tracing::error!("startup failed: {e:#}");
            rsx! {
                SplashScreen {
                    error: format!("{e:#}"),
                }
            }
        }
        None => rsx! {
            SplashScreen {}
        },
    };
    body
}

/// This component holds the main app logic and only runs when startup is done.
#[component]
fn LoadedApp(app_state: AppState) -> Element {
    use_context_provider(|| app_state.clone());

    let stack = use_observable(app_state.services.navigator.watch());
    let (route, depth) = {
        let stack = stack.read();
        (stack.last().cloned().unwrap_or(Route::SignIn), stack.len())
    };
    let kind = route.kind();
    // a fresh screen (and view model) whenever the route or stack depth changes
    let key = format!("{depth}-{kind}-{}", route.title());

    rsx! {
        div {
            class: "app-main-container",
            if kind.requires_session() {
                TopBar {
                    route: route.clone(),
                }
            }
            div {
                class: "content",
                match route {
                    Route::SignIn => rsx! {
                        SignInScreen { key: "{key}" }
                    },
                    Route::SignUp => rsx! {
                        SignUpScreen { key: "{key}" }
                    },
                    Route::Home => rsx! {
                        HomeScreen { key: "{key}" }
                    },
                    Route::Category { name } => rsx! {
                        CategoryScreen { key: "{key}", name }
                    },
                    Route::Details { item } => rsx! {
                        DetailsScreen { key: "{key}", item }
                    },
                    Route::Favourite => rsx! {
                        FavouriteScreen { key: "{key}" }
                    },
                    Route::Cart => rsx! {
                        CartScreen { key: "{key}" }
                    },
                    Route::Profile => rsx! {
                        ProfileScreen { key: "{key}" }
                    },
                    Route::Billing => rsx! {
                        BillingScreen { key: "{key}" }
                    },
                }
            }
            if kind.shows_bottom_nav() {
                BottomNav {
                    active: kind,
                }
            }
        }
    }
}
