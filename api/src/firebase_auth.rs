//! Firebase Authentication over its REST API (Identity Toolkit + Secure Token).

use std::path::Path;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;
use dioxus_logger::tracing::debug;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;

use crate::auth::AuthProvider;
use crate::auth::FederatedProvider;
use crate::auth::Session;
use crate::config::FirebaseConfig;
use crate::error::ApiResult;
use crate::error::AuthFailure;
use crate::error::BackendError;

/// Response of `signInWithPassword`, `signUp` and `signInWithIdp`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

/// Response of the secure token endpoint. Note the snake_case keys.
#[derive(Deserialize, Debug)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: String,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

fn expires_at(expires_in: &str) -> ApiResult<chrono::DateTime<Utc>> {
    let secs: i64 = expires_in
        .parse()
        .map_err(|_| BackendError::Decode(format!("bad expiresIn '{expires_in}'")))?;
    Ok(Utc::now() + Duration::seconds(secs))
}

impl SignInResponse {
    fn into_session(self, fallback_email: &str) -> ApiResult<Session> {
        Ok(Session {
            expires_at: expires_at(&self.expires_in)?,
            uid: self.local_id,
            email: self
                .email
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| fallback_email.to_string()),
            display_name: self.display_name,
            id_token: self.id_token,
            refresh_token: self.refresh_token,
        })
    }
}

/// An [`AuthProvider`] talking to Firebase Authentication.
///
/// The session lives in memory and, when a session file is configured, on
/// disk so that the start-up session check survives restarts.
pub struct FirebaseAuth {
    http: reqwest::Client,
    auth_url: String,
    token_url: String,
    api_key: String,
    session_file: Option<PathBuf>,
    session: RwLock<Option<Session>>,
    refresh_lock: tokio::sync::Mutex<()>,
}

impl FirebaseAuth {
    pub fn new(config: &FirebaseConfig, http: reqwest::Client) -> Self {
        let session = config.session_file.as_ref().and_then(|path| load_session(path));
        if let Some(s) = &session {
            info!("restored session for {}", s.uid);
        }
        Self {
            http,
            auth_url: config.auth_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.clone(),
            api_key: config.api_key.clone(),
            session_file: config.session_file.clone(),
            session: RwLock::new(session),
            refresh_lock: tokio::sync::Mutex::new(()),
        }
    }

    async fn post<T: DeserializeOwned>(&self, url: String, body: &impl Serialize) -> ApiResult<T> {
        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorEnvelope>(&text) {
            Ok(envelope) => Err(AuthFailure::from_provider_code(&envelope.error.message).into()),
            Err(_) => Err(BackendError::Status {
                code: status.as_u16(),
                message: text,
            }),
        }
    }

    async fn accounts(&self, method: &str, body: &impl Serialize) -> ApiResult<SignInResponse> {
        self.post(format!("{}/accounts:{method}", self.auth_url), body)
            .await
    }

    fn store(&self, session: Option<Session>) {
        if let Some(path) = &self.session_file {
            let written = match &session {
                Some(s) => serde_json::to_vec(s)
                    .map_err(|e| e.to_string())
                    .and_then(|bytes| std::fs::write(path, bytes).map_err(|e| e.to_string())),
                None => match std::fs::remove_file(path) {
                    Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.to_string()),
                    _ => Ok(()),
                },
            };
            if let Err(e) = written {
                warn!("could not persist session to {}: {e}", path.display());
            }
        }
        *self.session.write().unwrap_or_else(|p| p.into_inner()) = session;
    }

    async fn refresh(&self, stale: &Session) -> ApiResult<Session> {
        let body = json!({
            "grant_type": "refresh_token",
            "refresh_token": stale.refresh_token,
        });
        let refreshed: RefreshResponse = self.post(self.token_url.clone(), &body).await?;
        Ok(Session {
            uid: refreshed.user_id,
            email: stale.email.clone(),
            display_name: stale.display_name.clone(),
            expires_at: expires_at(&refreshed.expires_in)?,
            id_token: refreshed.id_token,
            refresh_token: refreshed.refresh_token,
        })
    }
}

fn load_session(path: &Path) -> Option<Session> {
    let bytes = std::fs::read(path).ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!("ignoring unreadable session file {}: {e}", path.display());
            None
        }
    }
}

#[async_trait]
impl AuthProvider for FirebaseAuth {
    fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    async fn fresh_session(&self) -> ApiResult<Session> {
        let session = self.current_session().ok_or(BackendError::NotSignedIn)?;
        if !session.needs_refresh(Utc::now()) {
            return Ok(session);
        }

        let _guard = self.refresh_lock.lock().await;
        // someone else may have refreshed while we waited
        let session = self.current_session().ok_or(BackendError::NotSignedIn)?;
        if !session.needs_refresh(Utc::now()) {
            return Ok(session);
        }

        debug!("refreshing id token for {}", session.uid);
        match self.refresh(&session).await {
            Ok(fresh) => {
                self.store(Some(fresh.clone()));
                Ok(fresh)
            }
            Err(e @ BackendError::Auth(_)) => {
                warn!("refresh rejected, dropping session: {e}");
                self.store(None);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> ApiResult<Session> {
        let response = self
            .accounts(
                "signInWithPassword",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        let session = response.into_session(email)?;
        self.store(Some(session.clone()));
        Ok(session)
    }

    async fn sign_in_with_id_token(
        &self,
        provider: FederatedProvider,
        id_token: &str,
    ) -> ApiResult<Session> {
        let body = json!({
            "postBody": format!("id_token={id_token}&providerId={}", provider.provider_id()),
            "requestUri": "http://localhost",
            "returnIdpCredential": true,
            "returnSecureToken": true,
        });
        let session = self.accounts("signInWithIdp", &body).await?.into_session("")?;
        self.store(Some(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> ApiResult<Session> {
        let response = self
            .accounts(
                "signUp",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        let session = response.into_session(email)?;
        self.store(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> ApiResult<()> {
        // Firebase ID tokens cannot be revoked from the client; forgetting
        // them is the sign-out.
        self.store(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_response_becomes_session() {
        let response: SignInResponse = serde_json::from_str(
            r#"{
                "kind": "identitytoolkit#VerifyPasswordResponse",
                "localId": "uid-1",
                "email": "",
                "displayName": "Asha",
                "idToken": "id",
                "refreshToken": "refresh",
                "expiresIn": "3600",
                "registered": true
            }"#,
        )
        .unwrap();
        let session = response.into_session("asha@dashdrop.in").unwrap();
        assert_eq!(session.uid, "uid-1");
        assert_eq!(session.email, "asha@dashdrop.in");
        assert_eq!(session.display_name.as_deref(), Some("Asha"));
        assert!(!session.needs_refresh(Utc::now()));
    }

    #[test]
    fn refresh_response_uses_snake_case() {
        let response: RefreshResponse = serde_json::from_str(
            r#"{"id_token":"a","refresh_token":"b","expires_in":"3600","user_id":"u","token_type":"Bearer"}"#,
        )
        .unwrap();
        assert_eq!(response.user_id, "u");
    }

    #[test]
    fn session_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("dashdrop-session-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("session.json");

        let config = FirebaseConfig {
            project_id: "p".into(),
            api_key: "k".into(),
            web_client_id: None,
            firestore_url: FirebaseConfig::DEFAULT_FIRESTORE_URL.into(),
            auth_url: FirebaseConfig::DEFAULT_AUTH_URL.into(),
            token_url: FirebaseConfig::DEFAULT_TOKEN_URL.into(),
            session_file: Some(file.clone()),
        };
        let auth = FirebaseAuth::new(&config, reqwest::Client::new());
        assert!(auth.current_session().is_none());

        let session = Session {
            uid: "uid-1".into(),
            email: "a@b.in".into(),
            display_name: None,
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            expires_at: Utc::now() + Duration::seconds(3600),
        };
        auth.store(Some(session.clone()));
        let restored = FirebaseAuth::new(&config, reqwest::Client::new());
        assert_eq!(restored.current_session(), Some(session));

        restored.store(None);
        assert!(!file.exists());
        std::fs::remove_dir_all(&dir).ok();
    }
}
