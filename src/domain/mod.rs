//! Domain layer: entities, booking rules and repository interfaces.

pub mod car;
pub mod customer;
pub mod insurance;
pub mod location;
pub mod maintenance;
pub mod overlap;
pub mod payment;
pub mod pricing;
pub mod principal;
pub mod rental;
pub mod repositories;
pub mod reservation;
pub mod user;

pub use overlap::{find_conflict, has_conflict, Claim, ClaimSource, DateRange};
pub use pricing::{rental_days, PricingPolicy};
pub use principal::{Access, AccessPolicy, CustomerScope, Principal, UserRole};
pub use repositories::{RepositoryProvider, UnitOfWork};

pub use crate::shared::{DomainError, DomainResult};
