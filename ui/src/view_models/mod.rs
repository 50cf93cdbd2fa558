//! One controller per screen.
//!
//! A view model owns its screen's observable state and a [`ScreenScope`] for
//! the requests it issues. The rendering layer only reads state through
//! [`ObservableRef`](crate::state::ObservableRef) handles and calls the
//! intent methods.

pub mod billing;
pub mod cart;
pub mod category;
pub mod details;
pub mod favourites;
pub mod home;
pub mod profile;
pub mod session;
pub mod sign_in;
pub mod sign_up;

#[cfg(test)]
pub(crate) mod test_support;

use std::future::Future;
use std::time::Duration;

use api::ApiResult;
use api::Backend;
use api::Session;
use api::UserProfile;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;

use crate::navigation::Navigator;
use crate::navigation::Route;
use crate::state::Observable;
use crate::state::ObservableRef;
use crate::state::ScreenScope;
use crate::validation::validate_name;

/// What every view model is built from.
#[derive(Clone)]
pub struct Services {
    pub backend: Backend,
    pub navigator: Navigator,
    request_timeout: Duration,
}

impl Services {
    pub fn new(backend: Backend, navigator: Navigator, request_timeout: Duration) -> Self {
        Self {
            backend,
            navigator,
            request_timeout,
        }
    }

    /// A fresh scope for a screen that is about to open.
    pub fn scope(&self, name: &'static str) -> ScreenScope {
        ScreenScope::new(name, self.request_timeout)
    }

    /// The signed-in session, refreshed if its token is about to expire.
    pub async fn session(&self) -> ApiResult<Session> {
        self.backend.auth.fresh_session().await
    }

    /// Navigates, logging instead of failing: a refused transition from a
    /// button press leaves the user where they are.
    pub fn go(&self, route: Route) {
        if let Err(e) = self.navigator.navigate(route) {
            warn!("navigation refused: {e}");
        }
    }

    pub fn go_clearing(&self, route: Route) {
        if let Err(e) = self.navigator.navigate_clearing(route) {
            warn!("navigation refused: {e}");
        }
    }
}

/// Implemented by every screen controller so the screen can tear it down.
pub trait ViewModel {
    fn scope(&self) -> &ScreenScope;

    /// Aborts whatever the screen still has in flight.
    fn close(&self) {
        self.scope().close();
    }
}

/// A transient, one-line message for the user (a toast).
#[derive(Clone, Debug)]
pub struct Notice {
    message: Observable<Option<String>>,
}

impl Default for Notice {
    fn default() -> Self {
        Self {
            message: Observable::new(None),
        }
    }
}

impl Notice {
    pub fn show(&self, message: impl Into<String>) {
        self.message.set(Some(message.into()));
    }

    pub fn dismiss(&self) {
        self.message.set(None);
    }

    pub fn watch(&self) -> ObservableRef<Option<String>> {
        self.message.read_only()
    }
}

/// Starts a write whose result is only reported through `notice`.
///
/// These writes are not tracked by an async state: the next read of the
/// affected collection is what reflects them.
pub(crate) fn spawn_write<F>(
    scope: &ScreenScope,
    notice: &Notice,
    done: String,
    failed: &'static str,
    write: F,
) -> bool
where
    F: Future<Output = ApiResult<()>> + Send + 'static,
{
    let notice = notice.clone();
    let guard = scope.guard();
    let timeout = scope.request_timeout();
    scope.spawn(async move {
        let message = match tokio::time::timeout(timeout, write).await {
            Ok(Ok(())) => done,
            Ok(Err(e)) => {
                warn!("{failed}: {e}");
                e.user_detail()
                    .map_or_else(|| failed.to_string(), |d| format!("{failed}: {d}"))
            }
            Err(_) => format!("{failed} (timed out)"),
        };
        if !guard.is_closed() {
            notice.show(message);
        }
    })
}

/// Saves a profile for `session` unless the account already has one.
///
/// The name is `typed_name` when it passes validation, else the provider's
/// display name, else the part of the email before `@`.
pub(crate) async fn ensure_profile(
    services: &Services,
    session: &Session,
    typed_name: &str,
) -> ApiResult<()> {
    let store = &services.backend.store;
    if store.profile(session).await?.is_some() {
        return Ok(());
    }
    let typed_name = typed_name.trim();
    let name = Some(typed_name.to_string())
        .filter(|n| validate_name(n))
        .or_else(|| session.display_name.clone())
        .unwrap_or_else(|| {
            session
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string()
        });
    info!("creating missing profile for {}", session.uid);
    store
        .save_profile(
            session,
            UserProfile {
                uid: session.uid.clone(),
                name,
                email: session.email.clone(),
            },
        )
        .await
}
