pub mod use_observable;
pub mod use_view_model;
