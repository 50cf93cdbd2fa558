//! A single-owner value cell that publishes every change.

use std::sync::Arc;

use tokio::sync::watch;

/// Mutable, observable state owned by one controller.
///
/// Only the owner holds an `Observable`; everyone else gets an
/// [`ObservableRef`], which can read and subscribe but never write.
#[derive(Debug)]
pub struct Observable<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Replaces the value and notifies subscribers, even if nobody listens yet.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Runs `f` on the value and notifies only if it returns `true`.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    pub fn read_only(&self) -> ObservableRef<T> {
        ObservableRef {
            tx: self.tx.clone(),
        }
    }
}

/// Read-only view of an [`Observable`].
#[derive(Debug)]
pub struct ObservableRef<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for ObservableRef<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> PartialEq for ObservableRef<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tx, &other.tx)
    }
}

impl<T: Clone> ObservableRef<T> {
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// A receiver that sees every value published from now on.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Waits until the value satisfies `predicate` and returns it.
    pub async fn wait_for(&self, mut predicate: impl FnMut(&T) -> bool) -> T {
        let mut rx = self.subscribe();
        let value = rx
            .wait_for(|v| predicate(v))
            .await
            .map(|v| v.clone());
        // the sender lives in self, so the channel cannot close under us
        match value {
            Ok(v) => v,
            Err(_) => self.get(),
        }
    }
}
