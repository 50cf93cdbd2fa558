use dioxus::prelude::*;

use crate::state::ObservableRef;

/// Mirrors an observable into a signal, so a component re-renders whenever
/// the owning view model publishes a new value.
pub fn use_observable<T: Clone + 'static>(source: ObservableRef<T>) -> Signal<T> {
    let mut value = use_signal(|| source.get());

    use_future(move || {
        let source = source.clone();
        async move {
            let mut rx = source.subscribe();
            // catch anything published between use_signal and subscribe
            value.set(rx.borrow_and_update().clone());
            while rx.changed().await.is_ok() {
                value.set(rx.borrow_and_update().clone());
            }
        }
    });

    value
}
