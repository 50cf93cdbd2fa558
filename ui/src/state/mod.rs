//! Screen-level state plumbing shared by every view model.

pub mod observable;
pub mod scope;
pub mod ui_state;

pub use observable::Observable;
pub use observable::ObservableRef;
pub use scope::ScopeGuard;
pub use scope::ScreenScope;
pub use ui_state::AsyncState;
pub use ui_state::UiState;
