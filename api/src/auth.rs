//! The authentication provider contract.

use std::fmt;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ApiResult;

/// An authenticated user session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Tokens are refreshed this long before they actually expire.
    pub const REFRESH_MARGIN_SECS: i64 = 60;

    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - now < Duration::seconds(Self::REFRESH_MARGIN_SECS)
    }
}

// tokens stay out of logs
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// External identity providers that can vouch for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
pub enum FederatedProvider {
    #[strum(serialize = "google.com")]
    Google,
}

impl FederatedProvider {
    pub fn provider_id(&self) -> &'static str {
        self.into()
    }
}

/// Session management backed by an identity service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The session currently held, without contacting the provider.
    fn current_session(&self) -> Option<Session>;

    /// The current session with a usable ID token, refreshing it first when
    /// it is about to expire. Fails with `NotSignedIn` without a session.
    async fn fresh_session(&self) -> ApiResult<Session>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> ApiResult<Session>;

    /// Exchanges an identity token issued by `provider` for a session.
    async fn sign_in_with_id_token(
        &self,
        provider: FederatedProvider,
        id_token: &str,
    ) -> ApiResult<Session>;

    /// Creates an account and signs it in.
    async fn sign_up(&self, email: &str, password: &str) -> ApiResult<Session>;

    /// Forgets the current session. Signing out without a session is not an
    /// error.
    async fn sign_out(&self) -> ApiResult<()>;

    fn is_signed_in(&self) -> bool {
        self.current_session().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_window() {
        let now = Utc::now();
        let mut session = Session {
            uid: "u1".into(),
            email: "a@b.in".into(),
            display_name: None,
            id_token: "secret-id".into(),
            refresh_token: "secret-refresh".into(),
            expires_at: now + Duration::seconds(3600),
        };
        assert!(!session.needs_refresh(now));
        session.expires_at = now + Duration::seconds(30);
        assert!(session.needs_refresh(now));

        let shown = format!("{session:?}");
        assert!(!shown.contains("secret"));
    }

    #[test]
    fn provider_ids() {
        assert_eq!(FederatedProvider::Google.provider_id(), "google.com");
    }
}
