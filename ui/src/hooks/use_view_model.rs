use dioxus::prelude::*;

use crate::app_state::AppState;
use crate::view_models::Services;
use crate::view_models::ViewModel;

/// Creates the screen's view model once and closes it when the screen
/// unmounts, aborting anything it still has in flight.
///
/// `init` receives the shared services and runs only on first render.
pub fn use_view_model<V>(init: impl FnOnce(Services) -> V) -> V
where
    V: ViewModel + Clone + 'static,
{
    let app_state = use_context::<AppState>();
    let vm = use_hook(move || init(app_state.services()));

    use_drop({
        let vm = vm.clone();
        move || vm.close()
    });

    vm
}
