//! # Car Rental Service
//!
//! Backend for a car-rental business: fleet, customers, reservations,
//! rentals and payments behind a JWT-protected REST API.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Entities, state machines, pricing and repository traits
//! - **application**: Use cases that run inside a single transaction
//! - **infrastructure**: SeaORM persistence, JWT and password hashing
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Errors, clock and shutdown plumbing

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
