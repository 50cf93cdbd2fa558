//! Errors raised by the backend clients.

use thiserror::Error;

pub type ApiResult<T> = Result<T, BackendError>;

/// Why the authentication provider refused a request.
///
/// The `Display` text is shown to the user, so it never contains provider
/// codes or token material.
#[derive(Error, Debug, Clone, PartialEq, Eq, strum::EnumIs)]
pub enum AuthFailure {
    #[error("wrong email or password")]
    InvalidCredentials,
    #[error("no account exists for this email")]
    UnknownAccount,
    #[error("an account already exists for this email")]
    EmailTaken,
    #[error("the password is too weak")]
    WeakPassword,
    #[error("this account has been disabled")]
    Disabled,
    #[error("too many attempts, try again later")]
    RateLimited,
    #[error("the session has expired, sign in again")]
    SessionExpired,
    #[error("the identity provider rejected the sign-in")]
    FederatedRejected,
    #[error("authentication failed")]
    Other(String),
}

impl AuthFailure {
    /// Maps a Firebase Auth error code (e.g. `EMAIL_NOT_FOUND`, possibly
    /// followed by ` : details`) to a failure.
    pub fn from_provider_code(message: &str) -> Self {
        let code = message.split(':').next().unwrap_or("").trim();
        match code {
            "EMAIL_NOT_FOUND" => Self::UnknownAccount,
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => {
                Self::InvalidCredentials
            }
            "EMAIL_EXISTS" => Self::EmailTaken,
            "WEAK_PASSWORD" => Self::WeakPassword,
            "USER_DISABLED" => Self::Disabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::RateLimited,
            "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" | "INVALID_ID_TOKEN" => {
                Self::SessionExpired
            }
            "INVALID_IDP_RESPONSE" | "FEDERATED_USER_ID_ALREADY_LINKED" => Self::FederatedRejected,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not decode backend response: {0}")]
    Decode(String),

    #[error("backend returned status {code}: {message}")]
    Status { code: u16, message: String },

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthFailure),

    #[error("no active session")]
    NotSignedIn,

    #[error("federated sign-in was cancelled")]
    FederatedCancelled,

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl BackendError {
    /// Detail that is safe to show next to a screen's own failure message.
    ///
    /// Transport and decoding errors return `None`: those are logged, not shown.
    pub fn user_detail(&self) -> Option<String> {
        match self {
            Self::Auth(failure) => match failure {
                AuthFailure::Other(_) => None,
                known => Some(known.to_string()),
            },
            Self::NotSignedIn => Some("please sign in again".to_string()),
            Self::FederatedCancelled => Some("sign-in was cancelled".to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_codes_map_to_failures() {
        assert_eq!(
            AuthFailure::from_provider_code("INVALID_LOGIN_CREDENTIALS"),
            AuthFailure::InvalidCredentials
        );
        assert_eq!(
            AuthFailure::from_provider_code("WEAK_PASSWORD : Password should be at least 6 characters"),
            AuthFailure::WeakPassword
        );
        assert!(AuthFailure::from_provider_code("SOMETHING_NEW").is_other());
    }

    #[test]
    fn only_presentable_detail_is_exposed() {
        let auth: BackendError = AuthFailure::EmailTaken.into();
        assert_eq!(
            auth.user_detail().as_deref(),
            Some("an account already exists for this email")
        );

        let status = BackendError::Status {
            code: 503,
            message: "backend internals".into(),
        };
        assert_eq!(status.user_detail(), None);
        assert_eq!(
            BackendError::Auth(AuthFailure::Other("X".into())).user_detail(),
            None
        );
    }
}
