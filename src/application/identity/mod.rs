//! Identity bounded context: accounts and authentication

pub mod service;

pub use service::{AuthResult, IdentityService, Registration, UserStats};
