//! Transaction-scoped repositories

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseTransaction;
use tracing::debug;

use crate::domain::car::CarRepository;
use crate::domain::customer::CustomerRepository;
use crate::domain::insurance::InsuranceRepository;
use crate::domain::location::LocationRepository;
use crate::domain::maintenance::MaintenanceRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::rental::RentalRepository;
use crate::domain::repositories::UnitOfWork;
use crate::domain::reservation::ReservationRepository;
use crate::domain::user::UserRepository;
use crate::shared::{db_err, DomainError, DomainResult};

use super::car_repository::SeaOrmCarRepository;
use super::customer_repository::SeaOrmCustomerRepository;
use super::insurance_repository::SeaOrmInsuranceRepository;
use super::location_repository::SeaOrmLocationRepository;
use super::maintenance_repository::SeaOrmMaintenanceRepository;
use super::payment_repository::SeaOrmPaymentRepository;
use super::rental_repository::SeaOrmRentalRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::user_repository::SeaOrmUserRepository;

/// Every repository here shares one `DatabaseTransaction`. Dropping the
/// unit of work drops the transaction, which rolls it back.
pub struct SeaOrmUnitOfWork {
    txn: Arc<DatabaseTransaction>,
    cars: SeaOrmCarRepository<DatabaseTransaction>,
    customers: SeaOrmCustomerRepository<DatabaseTransaction>,
    locations: SeaOrmLocationRepository<DatabaseTransaction>,
    reservations: SeaOrmReservationRepository<DatabaseTransaction>,
    rentals: SeaOrmRentalRepository<DatabaseTransaction>,
    payments: SeaOrmPaymentRepository<DatabaseTransaction>,
    users: SeaOrmUserRepository<DatabaseTransaction>,
    maintenance: SeaOrmMaintenanceRepository<DatabaseTransaction>,
    insurance: SeaOrmInsuranceRepository<DatabaseTransaction>,
}

impl SeaOrmUnitOfWork {
    pub fn new(txn: DatabaseTransaction) -> Self {
        let txn = Arc::new(txn);
        Self {
            cars: SeaOrmCarRepository::new(txn.clone()),
            customers: SeaOrmCustomerRepository::new(txn.clone()),
            locations: SeaOrmLocationRepository::new(txn.clone()),
            reservations: SeaOrmReservationRepository::new(txn.clone()),
            rentals: SeaOrmRentalRepository::new(txn.clone()),
            payments: SeaOrmPaymentRepository::new(txn.clone()),
            users: SeaOrmUserRepository::new(txn.clone()),
            maintenance: SeaOrmMaintenanceRepository::new(txn.clone()),
            insurance: SeaOrmInsuranceRepository::new(txn.clone()),
            txn,
        }
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
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

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let Self {
            txn,
            cars,
            customers,
            locations,
            reservations,
            rentals,
            payments,
            users,
            maintenance,
            insurance,
        } = *self;
        drop((cars, customers, locations, reservations, rentals, payments, users));
        drop((maintenance, insurance));

        let txn = Arc::try_unwrap(txn).map_err(|_| {
            DomainError::Internal("transaction still borrowed at commit".to_string())
        })?;
        txn.commit().await.map_err(db_err)?;
        debug!("Transaction committed");
        Ok(())
    }
}
