//! Persistence seams: plain reads through [`RepositoryProvider`], atomic
//! state changes through a [`UnitOfWork`].

use async_trait::async_trait;

use super::car::CarRepository;
use super::customer::CustomerRepository;
use super::insurance::InsuranceRepository;
use super::location::LocationRepository;
use super::maintenance::MaintenanceRepository;
use super::payment::PaymentRepository;
use super::rental::RentalRepository;
use super::reservation::ReservationRepository;
use super::user::UserRepository;
use crate::shared::DomainResult;

/// Per-aggregate repository accessors over the shared connection pool.
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn cars(&self) -> &dyn CarRepository;
    fn customers(&self) -> &dyn CustomerRepository;
    fn locations(&self) -> &dyn LocationRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn rentals(&self) -> &dyn RentalRepository;
    fn payments(&self) -> &dyn PaymentRepository;
    fn users(&self) -> &dyn UserRepository;
    fn maintenance(&self) -> &dyn MaintenanceRepository;
    fn insurance(&self) -> &dyn InsuranceRepository;

    /// Open a transaction. Everything read or written through the returned
    /// unit of work is committed together or not at all.
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>>;
}

/// Repositories bound to one open transaction.
///
/// Dropping without calling [`UnitOfWork::commit`] rolls back. While a unit
/// of work is open, reads must go through it rather than the provider.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn cars(&self) -> &dyn CarRepository;
    fn customers(&self) -> &dyn CustomerRepository;
    fn locations(&self) -> &dyn LocationRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn rentals(&self) -> &dyn RentalRepository;
    fn payments(&self) -> &dyn PaymentRepository;
    fn users(&self) -> &dyn UserRepository;
    fn maintenance(&self) -> &dyn MaintenanceRepository;
    fn insurance(&self) -> &dyn InsuranceRepository;

    async fn commit(self: Box<Self>) -> DomainResult<()>;
}
