//! A single-shot exchange with an external identity flow.
//!
//! The screen that starts a federated sign-in gets a [`FederatedRequest`] to
//! await and hands the [`FederatedResolver`] to whatever drives the external
//! flow (a platform sign-in sheet, a browser redirect, a token prompt). The
//! resolver completes exactly once: `resolve` and `reject` consume it, and
//! dropping it unresolved cancels the request.

use tokio::sync::oneshot;

use crate::auth::FederatedProvider;
use crate::error::ApiResult;
use crate::error::AuthFailure;
use crate::error::BackendError;

type Outcome = Result<String, String>;

/// Creates a linked resolver/request pair for `provider`.
pub fn federated_request(provider: FederatedProvider) -> (FederatedResolver, FederatedRequest) {
    let (tx, rx) = oneshot::channel();
    (
        FederatedResolver { provider, tx },
        FederatedRequest { provider, rx },
    )
}

#[derive(Debug)]
pub struct FederatedResolver {
    provider: FederatedProvider,
    tx: oneshot::Sender<Outcome>,
}

impl FederatedResolver {
    pub fn provider(&self) -> FederatedProvider {
        self.provider
    }

    /// Completes the request with the identity token the provider issued.
    ///
    /// Returns `false` if the requester has already gone away.
    pub fn resolve(self, id_token: String) -> bool {
        self.tx.send(Ok(id_token)).is_ok()
    }

    /// Completes the request with a failure reported by the provider.
    pub fn reject(self, reason: impl Into<String>) -> bool {
        self.tx.send(Err(reason.into())).is_ok()
    }

    /// True once the waiting side has been dropped (e.g. its screen closed).
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

#[derive(Debug)]
pub struct FederatedRequest {
    provider: FederatedProvider,
    rx: oneshot::Receiver<Outcome>,
}

impl FederatedRequest {
    pub fn provider(&self) -> FederatedProvider {
        self.provider
    }

    /// Waits for the identity token.
    pub async fn token(self) -> ApiResult<String> {
        match self.rx.await {
            Ok(Ok(token)) if !token.trim().is_empty() => Ok(token),
            Ok(Ok(_)) => Err(AuthFailure::FederatedRejected.into()),
            Ok(Err(reason)) => {
                dioxus_logger::tracing::warn!("{} sign-in rejected: {reason}", self.provider);
                Err(AuthFailure::FederatedRejected.into())
            }
            Err(_) => Err(BackendError::FederatedCancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_once_with_token() {
        let (resolver, request) = federated_request(FederatedProvider::Google);
        assert!(resolver.resolve("id-token".into()));
        assert_eq!(request.token().await.unwrap(), "id-token");
    }

    #[tokio::test]
    async fn dropped_resolver_cancels() {
        let (resolver, request) = federated_request(FederatedProvider::Google);
        drop(resolver);
        assert!(matches!(
            request.token().await,
            Err(BackendError::FederatedCancelled)
        ));
    }

    #[tokio::test]
    async fn rejection_and_abandonment() {
        let (resolver, request) = federated_request(FederatedProvider::Google);
        resolver.reject("user closed the sheet");
        assert!(matches!(
            request.token().await,
            Err(BackendError::Auth(AuthFailure::FederatedRejected))
        ));

        let (resolver, request) = federated_request(FederatedProvider::Google);
        drop(request);
        assert!(resolver.is_abandoned());
        assert!(!resolver.resolve("late".into()));
    }
}
