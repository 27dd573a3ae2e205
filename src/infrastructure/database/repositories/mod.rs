//! SeaORM repository implementations

pub mod car_repository;
pub mod customer_repository;
pub mod insurance_repository;
pub mod location_repository;
pub mod maintenance_repository;
pub mod payment_repository;
pub mod rental_repository;
pub mod repository_provider;
pub mod reservation_repository;
pub mod unit_of_work;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
pub use unit_of_work::SeaOrmUnitOfWork;
