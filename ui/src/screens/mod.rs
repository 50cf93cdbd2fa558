pub mod billing;
pub mod cart;
pub mod category;
pub mod details;
pub mod favourite;
pub mod home;
pub mod profile;
pub mod sign_in;
pub mod sign_up;
pub mod splash;
