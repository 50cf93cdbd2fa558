use std::ops::Deref;
use std::sync::Arc;

use anyhow::Context;
use api::AppConfig;
use api::Backend;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;

use crate::navigation::Navigator;
use crate::view_models::Services;

pub struct AppStateData {
    pub config: AppConfig,
    pub services: Services,
}

/// Everything the screens share, created once at startup.
#[derive(Clone)]
pub struct AppState(Arc<AppStateData>);

impl PartialEq for AppState {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for AppState {
    type Target = AppStateData;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AppState {
    pub fn new(config: AppConfig, backend: Backend) -> Self {
        let navigator = Navigator::new(backend.auth.clone());
        let services = Services::new(backend, navigator, config.request_timeout());
        Self(Arc::new(AppStateData { config, services }))
    }

    /// Reads the configuration, connects the backend, and checks whether a
    /// previous session is still usable.
    pub async fn bootstrap() -> anyhow::Result<Self> {
        let config = AppConfig::from_env().context("reading configuration")?;
        info!(
            "backend: {}, request timeout: {:?}",
            config.backend(),
            config.request_timeout()
        );
        let backend = Backend::connect(&config).context("connecting to the backend")?;

        if backend.auth.is_signed_in() {
            match backend.auth.fresh_session().await {
                Ok(session) => info!("resuming session for {}", session.uid),
                Err(e) => warn!("stored session is not usable: {e}"),
            }
        }
        Ok(Self::new(config, backend))
    }

    pub fn services(&self) -> Services {
        self.services.clone()
    }
}
