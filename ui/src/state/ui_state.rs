//! The lifecycle of one remote fetch or mutation, as seen by a screen.

use std::future::Future;

use api::ApiResult;
use dioxus_logger::tracing::debug;
use dioxus_logger::tracing::warn;

use super::observable::Observable;
use super::observable::ObservableRef;
use super::scope::ScreenScope;

/// Shown when a caller passes an empty failure message.
const FALLBACK_FAILURE: &str = "Something went wrong";

/// Exactly one of the four load states.
#[derive(Debug, Clone, PartialEq)]
pub enum UiState<T> {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight.
    Loading,
    Success(T),
    /// A user-presentable, non-empty description of what failed.
    Error(String),
}

impl<T> Default for UiState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> UiState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// `Success` or `Error`.
    pub fn is_settled(&self) -> bool {
        self.is_success() || self.is_error()
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> UiState<U> {
        match self {
            Self::Idle => UiState::Idle,
            Self::Loading => UiState::Loading,
            Self::Success(v) => UiState::Success(f(v)),
            Self::Error(msg) => UiState::Error(msg),
        }
    }

    /// Converts a finished request into a terminal state.
    ///
    /// Raw errors are logged; the state only ever carries `failure`, plus
    /// whatever detail the error marks as presentable.
    pub fn settle(result: ApiResult<T>, failure: &str) -> Self {
        match result {
            Ok(v) => Self::Success(v),
            Err(e) => {
                warn!("{failure}: {e}");
                let failure = if failure.trim().is_empty() {
                    FALLBACK_FAILURE
                } else {
                    failure
                };
                Self::Error(match e.user_detail() {
                    Some(detail) => format!("{failure}: {detail}"),
                    None => failure.to_string(),
                })
            }
        }
    }
}

/// An observable [`UiState`] together with the rules for moving it.
///
/// `Idle → Loading → {Success, Error}`, and a new request from a terminal
/// state goes back through `Loading`. A request issued while another is in
/// flight is dropped.
#[derive(Debug)]
pub struct AsyncState<T> {
    state: Observable<UiState<T>>,
}

impl<T> Clone for AsyncState<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for AsyncState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> AsyncState<T> {
    pub fn new() -> Self {
        Self {
            state: Observable::new(UiState::Idle),
        }
    }

    pub fn get(&self) -> UiState<T> {
        self.state.get()
    }

    pub fn watch(&self) -> ObservableRef<UiState<T>> {
        self.state.read_only()
    }

    /// Moves to `Loading` and runs `request` on `scope`.
    ///
    /// Returns `false`, leaving everything untouched, when a request is
    /// already in flight or the scope is closed. The outcome lands as
    /// `Success` or `Error(failure…)`; a request that outlives the scope's
    /// timeout lands as `Error` too. Nothing is written after the scope
    /// closes.
    pub fn issue<F>(&self, scope: &ScreenScope, failure: &'static str, request: F) -> bool
    where
        F: Future<Output = ApiResult<T>> + Send + 'static,
    {
        let mut previous = None;
        self.state.update_if(|s| {
            if s.is_loading() {
                false
            } else {
                previous = Some(std::mem::replace(s, UiState::Loading));
                true
            }
        });
        let Some(previous) = previous else {
            debug!("{}: '{failure}' request already in flight", scope.name());
            return false;
        };

        let state = self.state.clone();
        let guard = scope.guard();
        let timeout = scope.request_timeout();
        let spawned = scope.spawn(async move {
            let outcome = match tokio::time::timeout(timeout, request).await {
                Ok(result) => UiState::settle(result, failure),
                Err(_) => {
                    warn!("{failure}: no response after {timeout:?}");
                    UiState::Error(format!("{failure} (timed out)"))
                }
            };
            if guard.is_closed() {
                debug!("dropping '{failure}' outcome, screen is gone");
                return;
            }
            state.set(outcome);
        });
        if !spawned {
            // the scope is closed; nothing was requested
            self.state.set(previous);
        }
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::AuthFailure;
    use api::BackendError;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn scope() -> ScreenScope {
        ScreenScope::new("test", Duration::from_secs(5))
    }

    #[tokio::test]
    async fn passes_through_loading() {
        let scope = scope();
        let state = AsyncState::<Vec<u32>>::new();
        assert_eq!(state.get(), UiState::Idle);

        let (release, gate) = oneshot::channel::<()>();
        assert!(state.issue(&scope, "Error fetching numbers", async move {
            gate.await.ok();
            Ok(vec![1, 2, 3])
        }));
        assert_eq!(state.get(), UiState::Loading);

        release.send(()).unwrap();
        let settled = state.watch().wait_for(UiState::is_settled).await;
        assert_eq!(settled, UiState::Success(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn failure_resolves_to_non_empty_error() {
        let scope = scope();
        let state = AsyncState::<Vec<u32>>::new();
        state.issue(&scope, "Error fetching cart items", async {
            Err(BackendError::Status {
                code: 500,
                message: "internal".into(),
            })
        });
        let settled = state.watch().wait_for(UiState::is_settled).await;
        assert_eq!(settled.error(), Some("Error fetching cart items"));

        state.issue(&scope, "", async {
            Err::<Vec<u32>, _>(BackendError::Decode("bad".into()))
        });
        let settled = state.watch().wait_for(UiState::is_settled).await;
        assert_eq!(settled.error(), Some(FALLBACK_FAILURE));
    }

    #[tokio::test]
    async fn auth_detail_is_appended() {
        let settled: UiState<()> =
            UiState::settle(Err(AuthFailure::InvalidCredentials.into()), "Sign in failed");
        assert_eq!(settled.error(), Some("Sign in failed: wrong email or password"));
    }

    #[tokio::test]
    async fn duplicate_issue_is_suppressed() {
        let scope = scope();
        let state = AsyncState::<u32>::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let (release, gate) = oneshot::channel::<()>();

        let c = calls.clone();
        assert!(state.issue(&scope, "first", async move {
            c.fetch_add(1, Ordering::SeqCst);
            gate.await.ok();
            Ok(1)
        }));
        let c = calls.clone();
        assert!(!state.issue(&scope, "second", async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(2)
        }));

        release.send(()).unwrap();
        let settled = state.watch().wait_for(UiState::is_settled).await;
        assert_eq!(settled, UiState::Success(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // a terminal state may be re-issued and goes back through Loading
        let (release, gate) = oneshot::channel::<()>();
        assert!(state.issue(&scope, "retry", async move {
            gate.await.ok();
            Ok(3)
        }));
        assert!(state.get().is_loading());
        release.send(()).unwrap();
        assert_eq!(
            state.watch().wait_for(UiState::is_settled).await,
            UiState::Success(3)
        );
    }

    #[tokio::test]
    async fn completion_after_close_is_ignored() {
        let scope = scope();
        let state = AsyncState::<u32>::new();
        let (release, gate) = oneshot::channel::<()>();
        state.issue(&scope, "late", async move {
            gate.await.ok();
            Ok(7)
        });

        scope.close();
        let _ = release.send(());
        tokio::task::yield_now().await;
        assert!(state.get().is_loading());
        assert!(!state.issue(&scope, "after close", async { Ok(8) }));
    }

    #[tokio::test]
    async fn issue_on_closed_scope_keeps_last_outcome() {
        let scope = scope();
        let state = AsyncState::<u32>::new();
        state.issue(&scope, "first", async { Ok(3) });
        state.watch().wait_for(UiState::is_settled).await;

        scope.close();
        assert!(!state.issue(&scope, "after close", async { Ok(4) }));
        assert_eq!(state.get(), UiState::Success(3));

        let fresh = AsyncState::<u32>::new();
        assert!(!fresh.issue(&scope, "never started", async { Ok(5) }));
        assert!(fresh.get().is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_resolves_to_error() {
        let scope = ScreenScope::new("test", Duration::from_secs(2));
        let state = AsyncState::<u32>::new();
        state.issue(&scope, "Error fetching favourites", async {
            std::future::pending::<()>().await;
            Ok(0)
        });
        let settled = state.watch().wait_for(UiState::is_settled).await;
        assert_eq!(
            settled.error(),
            Some("Error fetching favourites (timed out)")
        );
    }
}
