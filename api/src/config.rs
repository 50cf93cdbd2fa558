//! Application configuration read from the environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use serde::Serialize;

/// Which backend implementation the app talks to.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Debug,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIs,
    strum::EnumString,
    strum::Display,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum BackendKind {
    /// Seeded, process-local backend. Nothing leaves the device.
    #[default]
    Memory,
    /// Cloud Firestore + Firebase Authentication over REST.
    Firebase,
}

/// Connection settings for the Firebase backend.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub api_key: String,
    /// OAuth client id used to obtain Google ID tokens. The Google button is
    /// hidden when unset.
    pub web_client_id: Option<String>,
    pub firestore_url: String,
    pub auth_url: String,
    pub token_url: String,
    /// Where the signed-in session is persisted between launches.
    pub session_file: Option<PathBuf>,
}

impl FirebaseConfig {
    pub const DEFAULT_FIRESTORE_URL: &'static str = "https://firestore.googleapis.com/v1";
    pub const DEFAULT_AUTH_URL: &'static str = "https://identitytoolkit.googleapis.com/v1";
    pub const DEFAULT_TOKEN_URL: &'static str = "https://securetoken.googleapis.com/v1/token";

    /// Resource name of the default database's documents, the prefix of
    /// every document name in a commit.
    pub fn documents_name(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    /// Root of the default database's documents.
    pub fn documents_url(&self) -> String {
        format!(
            "{}/{}",
            self.firestore_url.trim_end_matches('/'),
            self.documents_name()
        )
    }
}

/// Represents all app settings.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    backend: BackendKind,
    firebase: Option<FirebaseConfig>,
    request_timeout_secs: u64,
    catalog_cache_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            firebase: None,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            catalog_cache_secs: Self::DEFAULT_CATALOG_CACHE_SECS,
        }
    }
}

impl AppConfig {
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
    const DEFAULT_CATALOG_CACHE_SECS: u64 = 300;

    /// Creates an `AppConfig` from environment variables, with in-code defaults.
    ///
    /// # Environment Variables
    /// - `DASHDROP_BACKEND`: "memory" (default) or "firebase".
    /// - `FIREBASE_PROJECT_ID`, `FIREBASE_API_KEY`: required for "firebase".
    /// - `FIREBASE_WEB_CLIENT_ID`: optional, enables Google sign-in.
    /// - `DASHDROP_FIRESTORE_URL`, `DASHDROP_AUTH_URL`, `DASHDROP_TOKEN_URL`:
    ///   endpoint overrides, e.g. for the local emulators.
    /// - `DASHDROP_SESSION_FILE`: optional session persistence path.
    /// - `DASHDROP_REQUEST_TIMEOUT_SECS`: defaults to 15.
    /// - `DASHDROP_CATALOG_CACHE_SECS`: defaults to 300.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading from an arbitrary source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let backend = match lookup("DASHDROP_BACKEND") {
            Some(s) => BackendKind::from_str(s.trim())
                .with_context(|| format!("DASHDROP_BACKEND has unknown value '{s}'"))?,
            None => BackendKind::default(),
        };

        let firebase = if backend.is_firebase() {
            let required = |key: &str| {
                lookup(key)
                    .filter(|v| !v.trim().is_empty())
                    .with_context(|| format!("{key} must be set when DASHDROP_BACKEND=firebase"))
            };
            Some(FirebaseConfig {
                project_id: required("FIREBASE_PROJECT_ID")?,
                api_key: required("FIREBASE_API_KEY")?,
                web_client_id: lookup("FIREBASE_WEB_CLIENT_ID").filter(|v| !v.is_empty()),
                firestore_url: lookup("DASHDROP_FIRESTORE_URL")
                    .unwrap_or_else(|| FirebaseConfig::DEFAULT_FIRESTORE_URL.to_string()),
                auth_url: lookup("DASHDROP_AUTH_URL")
                    .unwrap_or_else(|| FirebaseConfig::DEFAULT_AUTH_URL.to_string()),
                token_url: lookup("DASHDROP_TOKEN_URL")
                    .unwrap_or_else(|| FirebaseConfig::DEFAULT_TOKEN_URL.to_string()),
                session_file: lookup("DASHDROP_SESSION_FILE").map(PathBuf::from),
            })
        } else {
            None
        };

        let secs = |key: &str, default: u64| -> anyhow::Result<u64> {
            match lookup(key) {
                Some(v) => v
                    .trim()
                    .parse()
                    .with_context(|| format!("{key} must be a whole number of seconds")),
                None => Ok(default),
            }
        };

        Ok(Self {
            backend,
            firebase,
            request_timeout_secs: secs(
                "DASHDROP_REQUEST_TIMEOUT_SECS",
                Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            catalog_cache_secs: secs(
                "DASHDROP_CATALOG_CACHE_SECS",
                Self::DEFAULT_CATALOG_CACHE_SECS,
            )?,
        })
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn firebase(&self) -> Option<&FirebaseConfig> {
        self.firebase.as_ref()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn catalog_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_cache_secs)
    }

    /// Whether the federated (Google) sign-in button should be offered.
    pub fn federated_sign_in_enabled(&self) -> bool {
        match self.backend {
            BackendKind::Memory => true,
            BackendKind::Firebase => self
                .firebase
                .as_ref()
                .is_some_and(|f| f.web_client_id.is_some()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_memory_backend() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert!(config.firebase().is_none());
    }

    #[test]
    fn firebase_requires_project_and_key() {
        let err = AppConfig::from_lookup(lookup(&[("DASHDROP_BACKEND", "Firebase")])).unwrap_err();
        assert!(err.to_string().contains("FIREBASE_PROJECT_ID"));

        let config = AppConfig::from_lookup(lookup(&[
            ("DASHDROP_BACKEND", "firebase"),
            ("FIREBASE_PROJECT_ID", "dashdrop-dev"),
            ("FIREBASE_API_KEY", "key"),
            ("DASHDROP_FIRESTORE_URL", "http://localhost:8080/v1/"),
            ("DASHDROP_CATALOG_CACHE_SECS", "60"),
        ]))
        .unwrap();
        let firebase = config.firebase().unwrap();
        assert_eq!(
            firebase.documents_url(),
            "http://localhost:8080/v1/projects/dashdrop-dev/databases/(default)/documents"
        );
        assert_eq!(firebase.auth_url, FirebaseConfig::DEFAULT_AUTH_URL);
        assert_eq!(config.catalog_cache_ttl(), Duration::from_secs(60));
        assert!(!config.federated_sign_in_enabled());
    }

    #[test]
    fn rejects_garbage() {
        assert!(AppConfig::from_lookup(lookup(&[("DASHDROP_BACKEND", "sqlite")])).is_err());
        assert!(
            AppConfig::from_lookup(lookup(&[("DASHDROP_REQUEST_TIMEOUT_SECS", "soon")])).is_err()
        );
    }
}
