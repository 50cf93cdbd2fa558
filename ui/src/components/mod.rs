//! Shared building blocks for the screens.
pub mod address_item;
pub mod async_view;
pub mod cart_line;
pub mod empty_state;
pub mod federated_prompt;
pub mod item_card;
pub mod pico;
pub mod scaffold;
pub mod toast;
