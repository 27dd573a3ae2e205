//! Reservation lifecycle: Pending → Confirmed → Completed, or → Cancelled.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::application::context::{blocking_claims, ServiceContext};
use crate::application::fleet::service::{apply_availability, require_active};
use crate::application::locations::service::require_locations;
use crate::domain::car::{Car, CarAvailability, CarRepository};
use crate::domain::overlap::{find_conflict, has_conflict, ClaimSource};
use crate::domain::reservation::{
    validate_booking_window, NewReservation, RentalHandoff, Reservation, ReservationChanges,
    ReservationRepository, ReservationStatus,
};
use crate::domain::{AccessPolicy, CustomerScope, Principal, UnitOfWork};
use crate::shared::{DomainError, DomainResult};

pub struct ReservationService {
    ctx: ServiceContext,
}

impl ReservationService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Book a car. The car flips to Reserved in the same transaction.
    pub async fn create(
        &self,
        new: NewReservation,
        principal: &Principal,
    ) -> DomainResult<Reservation> {
        principal.ensure(
            AccessPolicy::OwnerOrStaff(new.customer_id),
            "create reservation for another customer",
        )?;
        let now = self.ctx.now();
        let range = new.range();
        validate_booking_window(&range, now)?;

        let reservation = self
            .ctx
            .atomically("create reservation", async {
                let uow = self.ctx.repos.begin().await?;
                let mut car = require_active(
                    uow.cars().find_by_id_for_update(new.car_id).await?,
                    new.car_id,
                )?;
                let customer = uow
                    .customers()
                    .find_by_id(new.customer_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Customer", new.customer_id))?;
                if !customer.can_book() {
                    return Err(DomainError::Validation(
                        "Customer must have a valid driver license to make reservations".into(),
                    ));
                }
                require_locations(
                    uow.locations(),
                    &[new.pickup_location_id, new.return_location_id],
                )
                .await?;

                if car.availability != CarAvailability::Available {
                    return Err(DomainError::Conflict(format!(
                        "Car {} is not available for reservation ({})",
                        car.id, car.availability
                    )));
                }
                let claims = blocking_claims(uow.reservations(), uow.rentals(), car.id).await?;
                if let Some(clash) = find_conflict(&range, &claims, None) {
                    debug!(car_id = car.id, held_by = ?clash.source, "Booking window overlaps");
                    return Err(DomainError::Conflict(format!(
                        "Car {} is already booked for the selected dates",
                        car.id
                    )));
                }

                let reservation = uow.reservations().insert(new, now).await?;
                apply_availability(uow.cars(), &mut car, CarAvailability::Reserved, now).await?;
                uow.commit().await?;
                Ok(reservation)
            })
            .await?;

        metrics::counter!("reservations_created_total").increment(1);
        info!(
            reservation_id = reservation.id,
            car_id = reservation.car_id,
            customer_id = reservation.customer_id,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// Staff confirmation. Availability is checked again, ignoring this
    /// reservation's own hold.
    pub async fn confirm(
        &self,
        reservation_id: i32,
        principal: &Principal,
    ) -> DomainResult<Reservation> {
        principal.ensure(AccessPolicy::StaffOnly, "confirm reservation")?;

        let reservation = self
            .ctx
            .atomically("confirm reservation", async {
                let uow = self.ctx.repos.begin().await?;
                let (mut reservation, _car) = lock_reservation(uow.as_ref(), reservation_id).await?;
                if reservation.status != ReservationStatus::Pending {
                    return Err(DomainError::Validation(format!(
                        "Only pending reservations can be confirmed (status: {})",
                        reservation.status
                    )));
                }

                let claims =
                    blocking_claims(uow.reservations(), uow.rentals(), reservation.car_id).await?;
                let own = Some(ClaimSource::Reservation(reservation.id));
                if has_conflict(&reservation.range(), &claims, own) {
                    return Err(DomainError::Conflict(format!(
                        "Car {} is no longer available for the selected dates",
                        reservation.car_id
                    )));
                }

                reservation.confirm()?;
                uow.reservations().update(&reservation).await?;
                uow.commit().await?;
                Ok(reservation)
            })
            .await?;

        info!(reservation_id, car_id = reservation.car_id, "Reservation confirmed");
        Ok(reservation)
    }

    /// Owner or staff cancellation, at least 24h before pickup.
    pub async fn cancel(
        &self,
        reservation_id: i32,
        principal: &Principal,
    ) -> DomainResult<Reservation> {
        let reservation = self
            .ctx
            .atomically("cancel reservation", async {
                let uow = self.ctx.repos.begin().await?;
                let (mut reservation, mut car) =
                    lock_reservation(uow.as_ref(), reservation_id).await?;
                principal.ensure(
                    AccessPolicy::OwnerOrStaff(reservation.customer_id),
                    "cancel reservation",
                )?;

                let now = self.ctx.now();
                reservation.cancel(now)?;
                uow.reservations().update(&reservation).await?;
                release_hold(uow.cars(), &mut car, now).await?;
                uow.commit().await?;
                Ok(reservation)
            })
            .await?;

        metrics::counter!("reservations_cancelled_total").increment(1);
        info!(reservation_id, car_id = reservation.car_id, "Reservation cancelled");
        Ok(reservation)
    }

    /// Pickup precondition check. Nothing is written; the reservation only
    /// becomes Completed when the rental is actually created.
    pub async fn convert_to_rental(
        &self,
        reservation_id: i32,
        principal: &Principal,
    ) -> DomainResult<RentalHandoff> {
        principal.ensure(AccessPolicy::StaffOnly, "convert reservation to rental")?;
        let reservation = self.find(reservation_id).await?;

        if reservation.status != ReservationStatus::Confirmed {
            return Err(DomainError::Validation(format!(
                "Only confirmed reservations can be converted to rentals (status: {})",
                reservation.status
            )));
        }
        if reservation.pickup_date > self.ctx.now() {
            return Err(DomainError::Validation(
                "Cannot convert reservation to rental before pickup date".into(),
            ));
        }
        Ok(RentalHandoff::from_reservation(&reservation))
    }

    pub async fn get(&self, reservation_id: i32, principal: &Principal) -> DomainResult<Reservation> {
        let reservation = self.find(reservation_id).await?;
        principal.ensure(
            AccessPolicy::OwnerOrStaff(reservation.customer_id),
            "view reservation",
        )?;
        Ok(reservation)
    }

    pub async fn list(
        &self,
        principal: &Principal,
        customer_id: Option<i32>,
    ) -> DomainResult<Vec<Reservation>> {
        let repo = self.ctx.repos.reservations();
        match principal.scope_customer_filter(customer_id, "list reservations")? {
            CustomerScope::All => repo.find_all(None).await,
            CustomerScope::Only(id) => repo.find_all(Some(id)).await,
            CustomerScope::Nothing => Ok(Vec::new()),
        }
    }

    /// Change locations or advance payment of a live reservation.
    pub async fn amend(
        &self,
        reservation_id: i32,
        changes: ReservationChanges,
        principal: &Principal,
    ) -> DomainResult<Reservation> {
        self.ctx
            .atomically("update reservation", async {
                let uow = self.ctx.repos.begin().await?;
                let mut reservation = uow
                    .reservations()
                    .find_by_id(reservation_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Reservation", reservation_id))?;
                principal.ensure(
                    AccessPolicy::OwnerOrStaff(reservation.customer_id),
                    "update reservation",
                )?;
                require_locations(
                    uow.locations(),
                    &[changes.pickup_location_id, changes.return_location_id],
                )
                .await?;
                changes.apply(&mut reservation)?;
                uow.reservations().update(&reservation).await?;
                uow.commit().await?;
                info!(reservation_id, "Reservation updated");
                Ok(reservation)
            })
            .await
    }

    /// Hard delete. A reservation that still held its car releases it.
    pub async fn remove(&self, reservation_id: i32, principal: &Principal) -> DomainResult<()> {
        self.ctx
            .atomically("delete reservation", async {
                let uow = self.ctx.repos.begin().await?;
                let (reservation, mut car) = lock_reservation(uow.as_ref(), reservation_id).await?;
                principal.ensure(
                    AccessPolicy::OwnerOrStaff(reservation.customer_id),
                    "delete reservation",
                )?;
                if reservation.status == ReservationStatus::Completed {
                    return Err(DomainError::Validation(
                        "Cannot delete a completed reservation".into(),
                    ));
                }

                uow.reservations().delete(reservation.id).await?;
                if reservation.status.is_blocking() {
                    release_hold(uow.cars(), &mut car, self.ctx.now()).await?;
                }
                uow.commit().await?;
                info!(reservation_id, car_id = reservation.car_id, "Reservation deleted");
                Ok(())
            })
            .await
    }

    async fn find(&self, reservation_id: i32) -> DomainResult<Reservation> {
        self.ctx
            .repos
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", reservation_id))
    }
}

/// Load a reservation, lock its car, then read the reservation again so
/// the status seen is the one current under the lock.
pub(crate) async fn lock_reservation(
    uow: &dyn UnitOfWork,
    reservation_id: i32,
) -> DomainResult<(Reservation, Car)> {
    let peek = fetch(uow.reservations(), reservation_id).await?;
    let car = uow
        .cars()
        .find_by_id_for_update(peek.car_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Car", peek.car_id))?;
    let reservation = fetch(uow.reservations(), reservation_id).await?;
    Ok((reservation, car))
}

async fn fetch(repo: &dyn ReservationRepository, id: i32) -> DomainResult<Reservation> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Reservation", id))
}

/// Return a Reserved car to Available. A car that staff moved elsewhere in
/// the meantime (Rented, Maintenance) keeps its state.
async fn release_hold(
    cars: &dyn CarRepository,
    car: &mut Car,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    if car.availability == CarAvailability::Reserved {
        apply_availability(cars, car, CarAvailability::Available, now).await?;
    }
    Ok(())
}
