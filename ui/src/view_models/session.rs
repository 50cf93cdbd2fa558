use dioxus_logger::tracing::info;

use super::Services;
use super::ViewModel;
use crate::navigation::Route;
use crate::state::AsyncState;
use crate::state::ScreenScope;

/// Ends the session from any signed-in screen.
#[derive(Clone)]
pub struct SessionViewModel {
    services: Services,
    scope: ScreenScope,
    pub logout: AsyncState<()>,
}

impl SessionViewModel {
    pub fn new(services: Services) -> Self {
        Self {
            scope: services.scope("session"),
            services,
            logout: AsyncState::new(),
        }
    }

    /// Signs out, drops cached catalog data, and resets the back stack to
    /// `signin`.
    pub fn logout(&self) -> bool {
        let services = self.services.clone();
        self.logout.issue(&self.scope, "Could not log out", async move {
            services.backend.auth.sign_out().await?;
            services.backend.catalog.invalidate().await;
            info!("signed out");
            services.go_clearing(Route::SignIn);
            Ok(())
        })
    }
}

impl ViewModel for SessionViewModel {
    fn scope(&self) -> &ScreenScope {
        &self.scope
    }
}
