//! Task ownership for a single screen.

use std::future::Future;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use dioxus_logger::tracing::debug;
use tokio::task::JoinHandle;

#[derive(Debug)]
struct ScopeInner {
    name: &'static str,
    closed: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    request_timeout: Duration,
}

impl ScopeInner {
    fn abort_all(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(|p| p.into_inner()));
        let running = tasks.iter().filter(|t| !t.is_finished()).count();
        for task in tasks {
            task.abort();
        }
        if running > 0 {
            debug!("{}: aborted {running} in-flight task(s)", self.name);
        }
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        self.abort_all();
    }
}

/// Owns the background work a screen starts.
///
/// Closing the scope (or dropping its last handle) aborts every task still
/// running, and [`ScopeGuard::is_closed`] lets a task that already finished
/// its I/O discard a result nobody will see.
#[derive(Clone, Debug)]
pub struct ScreenScope {
    inner: Arc<ScopeInner>,
}

/// Cheap token a spawned task uses to check whether its screen still exists.
#[derive(Clone, Debug)]
pub struct ScopeGuard {
    inner: std::sync::Weak<ScopeInner>,
}

impl ScopeGuard {
    pub fn is_closed(&self) -> bool {
        self.inner
            .upgrade()
            .map_or(true, |inner| inner.closed.load(Ordering::SeqCst))
    }
}

impl ScreenScope {
    pub fn new(name: &'static str, request_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                name,
                closed: AtomicBool::new(false),
                tasks: Mutex::new(Vec::new()),
                request_timeout,
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Upper bound for a single backend request started from this screen.
    pub fn request_timeout(&self) -> Duration {
        self.inner.request_timeout
    }

    pub fn guard(&self) -> ScopeGuard {
        ScopeGuard {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Runs `task` on the runtime until it finishes or the scope closes.
    ///
    /// Returns `false` without running anything once the scope is closed.
    pub fn spawn<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.inner.tasks.lock().unwrap_or_else(|p| p.into_inner());
        if self.is_closed() {
            debug!("{}: scope closed, not starting task", self.name());
            return false;
        }
        tasks.retain(|t| !t.is_finished());
        tasks.push(tokio::spawn(task));
        true
    }

    /// Tears the scope down. Idempotent.
    pub fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::SeqCst) {
            self.inner.abort_all();
        }
    }
}
