//! SeaORM implementation of RepositoryProvider

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::domain::car::CarRepository;
use crate::domain::customer::CustomerRepository;
use crate::domain::insurance::InsuranceRepository;
use crate::domain::location::LocationRepository;
use crate::domain::maintenance::MaintenanceRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::rental::RentalRepository;
use crate::domain::repositories::{RepositoryProvider, UnitOfWork};
use crate::domain::reservation::ReservationRepository;
use crate::domain::user::UserRepository;
use crate::shared::{db_err, DomainResult};

use super::car_repository::SeaOrmCarRepository;
use super::customer_repository::SeaOrmCustomerRepository;
use super::insurance_repository::SeaOrmInsuranceRepository;
use super::location_repository::SeaOrmLocationRepository;
use super::maintenance_repository::SeaOrmMaintenanceRepository;
use super::payment_repository::SeaOrmPaymentRepository;
use super::rental_repository::SeaOrmRentalRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::unit_of_work::SeaOrmUnitOfWork;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let car = repos.cars().find_by_id(1).await?;
///
/// let uow = repos.begin().await?;
/// let car = uow.cars().find_by_id_for_update(1).await?;
/// uow.commit().await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    cars: SeaOrmCarRepository,
    customers: SeaOrmCustomerRepository,
    locations: SeaOrmLocationRepository,
    reservations: SeaOrmReservationRepository,
    rentals: SeaOrmRentalRepository,
    payments: SeaOrmPaymentRepository,
    users: SeaOrmUserRepository,
    maintenance: SeaOrmMaintenanceRepository,
    insurance: SeaOrmInsuranceRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        let shared = Arc::new(db.clone());
        Self {
            cars: SeaOrmCarRepository::new(shared.clone()),
            customers: SeaOrmCustomerRepository::new(shared.clone()),
            locations: SeaOrmLocationRepository::new(shared.clone()),
            reservations: SeaOrmReservationRepository::new(shared.clone()),
            rentals: SeaOrmRentalRepository::new(shared.clone()),
            payments: SeaOrmPaymentRepository::new(shared.clone()),
            users: SeaOrmUserRepository::new(shared.clone()),
            maintenance: SeaOrmMaintenanceRepository::new(shared.clone()),
            insurance: SeaOrmInsuranceRepository::new(shared),
            db,
        }
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn cars(&self) -> &dyn CarRepository {
        &self.cars
    }

    fn customers(&self) -> &dyn CustomerRepository {
        &self.customers
    }

    fn locations(&self) -> &dyn LocationRepository {
        &self.locations
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn rentals(&self) -> &dyn RentalRepository {
        &self.rentals
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn maintenance(&self) -> &dyn MaintenanceRepository {
        &self.maintenance
    }

    fn insurance(&self) -> &dyn InsuranceRepository {
        &self.insurance
    }

    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let txn = self.db.begin().await.map_err(db_err)?;
        Ok(Box::new(SeaOrmUnitOfWork::new(txn)))
    }
}
