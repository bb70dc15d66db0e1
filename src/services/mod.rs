pub mod auth;
pub mod gate;
pub mod orders;
