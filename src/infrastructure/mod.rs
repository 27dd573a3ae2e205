//! Infrastructure layer: persistence and crypto.

pub mod crypto;
pub mod database;

pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{init_database, DatabaseConfig, PoolConfig};
