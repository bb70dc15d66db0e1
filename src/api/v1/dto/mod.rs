pub mod orders;
pub mod tokens;
