//! Rental lifecycle: Active → Completed.
//!
//! Rentals start either from a confirmed reservation or as a staff walk-in.
//! Amounts always come from [`PricingPolicy`].

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::info;

use crate::application::context::{rental_claims, ServiceContext};
use crate::application::fleet::service::{apply_availability, require_active};
use crate::application::locations::service::require_locations;
use crate::application::reservations::service::lock_reservation;
use crate::domain::car::CarAvailability;
use crate::domain::overlap::has_conflict;
use crate::domain::rental::{DirectRentalRequest, NewRental, Rental, RentalStatus};
use crate::domain::reservation::ReservationStatus;
use crate::domain::{AccessPolicy, CustomerScope, PricingPolicy, Principal};
use crate::shared::{DomainError, DomainResult};

/// Return details supplied by staff when the car comes back
#[derive(Debug, Clone)]
pub struct RentalReturn {
    /// Defaults to the current time
    pub actual_return_date: Option<DateTime<Utc>>,
    pub final_mileage: Option<i32>,
}

pub struct RentalService {
    ctx: ServiceContext,
    pricing: PricingPolicy,
}

impl RentalService {
    pub fn new(ctx: ServiceContext, pricing: PricingPolicy) -> Self {
        Self { ctx, pricing }
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    /// Consume a confirmed reservation. Only the reservation status and the
    /// car's Reserved flag are checked here; the pickup-date gate lives in
    /// `ReservationService::convert_to_rental`.
    pub async fn create_from_reservation(
        &self,
        reservation_id: i32,
        principal: &Principal,
    ) -> DomainResult<Rental> {
        principal.ensure(AccessPolicy::StaffOnly, "create rental")?;

        let rental = self
            .ctx
            .atomically("create rental", async {
                let uow = self.ctx.repos.begin().await?;
                let (mut reservation, mut car) =
                    lock_reservation(uow.as_ref(), reservation_id).await?;

                if reservation.status != ReservationStatus::Confirmed {
                    return Err(DomainError::Validation(format!(
                        "Only confirmed reservations can be converted to rentals (status: {})",
                        reservation.status
                    )));
                }
                if car.availability != CarAvailability::Reserved {
                    return Err(DomainError::Conflict(format!(
                        "Car {} is not reserved ({})",
                        car.id, car.availability
                    )));
                }
                let claims = rental_claims(uow.rentals(), car.id).await?;
                if has_conflict(&reservation.range(), &claims, None) {
                    return Err(DomainError::Conflict(format!(
                        "Car {} already has an active rental in this period",
                        car.id
                    )));
                }

                let now = self.ctx.now();
                let total = self.pricing.total_for_range(
                    reservation.pickup_date,
                    reservation.return_date,
                    car.rental_rate,
                );
                let rental = uow
                    .rentals()
                    .insert(
                        NewRental {
                            car_id: car.id,
                            customer_id: reservation.customer_id,
                            reservation_id: Some(reservation.id),
                            rental_start_date: reservation.pickup_date,
                            rental_end_date: reservation.return_date,
                            total_amount: total,
                            pickup_location_id: reservation.pickup_location_id,
                            return_location_id: reservation.return_location_id,
                        },
                        now,
                    )
                    .await?;

                reservation.complete()?;
                uow.reservations().update(&reservation).await?;
                apply_availability(uow.cars(), &mut car, CarAvailability::Rented, now).await?;
                uow.commit().await?;
                Ok(rental)
            })
            .await?;

        metrics::counter!("rentals_started_total", "source" => "reservation").increment(1);
        info!(
            rental_id = rental.id,
            reservation_id,
            car_id = rental.car_id,
            total = %rental.total_amount,
            "Rental started from reservation"
        );
        Ok(rental)
    }

    /// Walk-in rental. Only other active rentals block it; pending and
    /// confirmed reservations on the same dates do not.
    pub async fn create_direct(
        &self,
        request: DirectRentalRequest,
        principal: &Principal,
    ) -> DomainResult<Rental> {
        principal.ensure(AccessPolicy::StaffOnly, "create rental")?;
        let now = self.ctx.now();
        request.validate(now)?;
        let range = request.range();

        let rental = self
            .ctx
            .atomically("create rental", async {
                let uow = self.ctx.repos.begin().await?;
                let mut car = require_active(
                    uow.cars().find_by_id_for_update(request.car_id).await?,
                    request.car_id,
                )?;
                if uow.customers().find_by_id(request.customer_id).await?.is_none() {
                    return Err(DomainError::not_found("Customer", request.customer_id));
                }
                require_locations(
                    uow.locations(),
                    &[request.pickup_location_id, request.return_location_id],
                )
                .await?;

                if car.availability != CarAvailability::Available {
                    return Err(DomainError::Conflict(format!(
                        "Car {} is not available for rental ({})",
                        car.id, car.availability
                    )));
                }
                let claims = rental_claims(uow.rentals(), car.id).await?;
                if has_conflict(&range, &claims, None) {
                    return Err(DomainError::Conflict(format!(
                        "Car {} already has an active rental in this period",
                        car.id
                    )));
                }

                let total = self.pricing.total_for_range(
                    request.rental_start_date,
                    request.rental_end_date,
                    car.rental_rate,
                );
                let rental = uow
                    .rentals()
                    .insert(
                        NewRental {
                            car_id: car.id,
                            customer_id: request.customer_id,
                            reservation_id: None,
                            rental_start_date: request.rental_start_date,
                            rental_end_date: request.rental_end_date,
                            total_amount: total,
                            pickup_location_id: request.pickup_location_id,
                            return_location_id: request.return_location_id,
                        },
                        now,
                    )
                    .await?;
                apply_availability(uow.cars(), &mut car, CarAvailability::Rented, now).await?;
                uow.commit().await?;
                Ok(rental)
            })
            .await?;

        metrics::counter!("rentals_started_total", "source" => "direct").increment(1);
        info!(
            rental_id = rental.id,
            car_id = rental.car_id,
            customer_id = rental.customer_id,
            total = %rental.total_amount,
            "Direct rental started"
        );
        Ok(rental)
    }

    /// Close an active rental, charge any late fee once and free the car.
    pub async fn complete(
        &self,
        rental_id: i32,
        details: RentalReturn,
        principal: &Principal,
    ) -> DomainResult<Rental> {
        principal.ensure(AccessPolicy::StaffOnly, "complete rental")?;

        let (rental, fee) = self
            .ctx
            .atomically("complete rental", async {
                let uow = self.ctx.repos.begin().await?;
                let peek = uow
                    .rentals()
                    .find_by_id(rental_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Rental", rental_id))?;
                let mut car = uow
                    .cars()
                    .find_by_id_for_update(peek.car_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Car", peek.car_id))?;
                // Re-read under the car lock so a concurrent completion is seen.
                let mut rental = uow
                    .rentals()
                    .find_by_id(rental_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Rental", rental_id))?;

                let now = self.ctx.now();
                let returned_at = details.actual_return_date.unwrap_or(now);
                let fee = rental.complete(returned_at, &self.pricing)?;

                if let Some(mileage) = details.final_mileage {
                    if mileage < car.mileage {
                        return Err(DomainError::Validation(format!(
                            "Final mileage {} is below the car's recorded mileage {}",
                            mileage, car.mileage
                        )));
                    }
                    car.mileage = mileage;
                }

                uow.rentals().update(&rental).await?;
                apply_availability(uow.cars(), &mut car, CarAvailability::Available, now).await?;
                uow.commit().await?;
                Ok((rental, fee))
            })
            .await?;

        metrics::counter!("rentals_completed_total").increment(1);
        if fee > Decimal::ZERO {
            metrics::counter!("rental_late_fees_total").increment(fee.trunc().to_u64().unwrap_or(0));
        }
        info!(
            rental_id,
            car_id = rental.car_id,
            late_fee = %fee,
            total = %rental.total_amount,
            "Rental completed"
        );
        Ok(rental)
    }

    pub async fn get(&self, rental_id: i32, principal: &Principal) -> DomainResult<Rental> {
        let rental = self.find(rental_id).await?;
        principal.ensure(AccessPolicy::OwnerOrStaff(rental.customer_id), "view rental")?;
        Ok(rental)
    }

    pub async fn list(
        &self,
        principal: &Principal,
        customer_id: Option<i32>,
    ) -> DomainResult<Vec<Rental>> {
        let repo = self.ctx.repos.rentals();
        match principal.scope_customer_filter(customer_id, "list rentals")? {
            CustomerScope::All => repo.find_all(None).await,
            CustomerScope::Only(id) => repo.find_all(Some(id)).await,
            CustomerScope::Nothing => Ok(Vec::new()),
        }
    }

    /// Admin-only hard delete of a finished rental.
    pub async fn remove(&self, rental_id: i32, principal: &Principal) -> DomainResult<()> {
        principal.ensure(AccessPolicy::AdminOnly, "delete rental")?;

        self.ctx
            .atomically("delete rental", async {
                let uow = self.ctx.repos.begin().await?;
                let rental = uow
                    .rentals()
                    .find_by_id(rental_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Rental", rental_id))?;
                if rental.status == RentalStatus::Active {
                    return Err(DomainError::Validation(
                        "Cannot delete an active rental".into(),
                    ));
                }
                uow.rentals().delete(rental_id).await?;
                uow.commit().await?;
                info!(rental_id, "Rental deleted");
                Ok(())
            })
            .await
    }

    async fn find(&self, rental_id: i32) -> DomainResult<Rental> {
        self.ctx
            .repos
            .rentals()
            .find_by_id(rental_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Rental", rental_id))
    }
}
