//! Authentication module: login, registration, profile, staff accounts

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
