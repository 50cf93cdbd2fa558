//! This crate contains the backend contract shared by every front end: the
//! records, the document store and authentication traits, and their
//! implementations (Firebase over REST, and an in-memory stand-in).

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod federated;
pub mod firebase_auth;
pub mod firestore;
pub mod memory;
pub mod models;
pub mod price;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use dioxus_logger::tracing::info;

pub use auth::AuthProvider;
pub use auth::FederatedProvider;
pub use auth::Session;
pub use catalog::CatalogRepository;
pub use config::AppConfig;
pub use config::BackendKind;
pub use error::ApiResult;
pub use error::AuthFailure;
pub use error::BackendError;
pub use models::*;
pub use price::Price;
pub use store::GroceryStore;

/// Handles to every backend service, cheap to clone.
#[derive(Clone)]
pub struct Backend {
    pub store: Arc<dyn GroceryStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub catalog: CatalogRepository,
}

impl Backend {
    /// Builds the backend selected by `config`.
    pub fn connect(config: &AppConfig) -> ApiResult<Self> {
        match config.backend() {
            BackendKind::Memory => {
                info!("using the in-memory backend");
                let memory = memory::InMemoryBackend::seeded();
                Ok(Self::from_parts(
                    Arc::new(memory.clone()),
                    Arc::new(memory),
                    config.catalog_cache_ttl(),
                ))
            }
            BackendKind::Firebase => {
                let firebase = config.firebase().ok_or_else(|| {
                    BackendError::Config("firebase backend selected without settings".into())
                })?;
                info!("using firebase project '{}'", firebase.project_id);
                let http = reqwest::Client::builder()
                    .timeout(config.request_timeout())
                    .build()?;
                Ok(Self::from_parts(
                    Arc::new(firestore::FirestoreStore::new(firebase, http.clone())),
                    Arc::new(firebase_auth::FirebaseAuth::new(firebase, http)),
                    config.catalog_cache_ttl(),
                ))
            }
        }
    }

    pub fn from_parts(
        store: Arc<dyn GroceryStore>,
        auth: Arc<dyn AuthProvider>,
        catalog_ttl: Duration,
    ) -> Self {
        Self {
            catalog: CatalogRepository::new(store.clone(), catalog_ttl),
            store,
            auth,
        }
    }
}
