//! Car registry: fleet records and the availability flag.
//!
//! The availability flag has exactly one writer, [`apply_availability`].
//! Reservation and rental services call it inside their own transaction so
//! the flag and their status always change together.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::application::context::ServiceContext;
use crate::application::locations::service::require_locations;
use crate::domain::car::{Car, CarAvailability, CarChanges, CarRepository, NewCar};
use crate::domain::overlap::{has_conflict, Claim, DateRange};
use crate::domain::{AccessPolicy, Principal};
use crate::shared::{DomainError, DomainResult};

/// Move `car` to `next` and persist it.
pub(crate) async fn apply_availability(
    cars: &dyn CarRepository,
    car: &mut Car,
    next: CarAvailability,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    let previous = car.availability;
    car.transition_to(next, now)?;
    cars.update(car).await?;
    info!(car_id = car.id, from = %previous, to = %next, "Car availability changed");
    Ok(())
}

/// Active car or NotFound.
pub(crate) fn require_active(car: Option<Car>, car_id: i32) -> DomainResult<Car> {
    match car {
        Some(car) if car.is_active => Ok(car),
        _ => Err(DomainError::not_found("Car", car_id)),
    }
}

pub struct CarRegistry {
    ctx: ServiceContext,
}

impl CarRegistry {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    // ── Commands ────────────────────────────────────────────────

    pub async fn create(&self, new: NewCar, principal: &Principal) -> DomainResult<Car> {
        principal.ensure(AccessPolicy::ManagerOrAdmin, "register car")?;
        let now = self.ctx.now();
        new.validate(now)?;

        let repos = &self.ctx.repos;
        if repos.cars().find_by_license_plate(&new.license_plate).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Car with license plate {} already exists",
                new.license_plate
            )));
        }
        require_locations(repos.locations(), &[new.current_location_id]).await?;

        let car = repos.cars().insert(new, now).await?;
        info!(car_id = car.id, plate = %car.license_plate, "Car registered");
        Ok(car)
    }

    pub async fn update(
        &self,
        car_id: i32,
        changes: CarChanges,
        principal: &Principal,
    ) -> DomainResult<Car> {
        principal.ensure(AccessPolicy::ManagerOrAdmin, "update car")?;

        self.ctx
            .atomically("update car", async {
                let uow = self.ctx.repos.begin().await?;
                let mut car = require_active(uow.cars().find_by_id_for_update(car_id).await?, car_id)?;

                if let Some(plate) = changes.license_plate.as_deref() {
                    if plate != car.license_plate
                        && uow.cars().find_by_license_plate(plate).await?.is_some()
                    {
                        return Err(DomainError::Conflict(format!(
                            "Car with license plate {} already exists",
                            plate
                        )));
                    }
                }

                require_locations(uow.locations(), &[changes.current_location_id]).await?;
                changes.apply(&mut car, self.ctx.now())?;
                uow.cars().update(&car).await?;
                uow.commit().await?;
                info!(car_id, "Car updated");
                Ok(car)
            })
            .await
    }

    /// Staff override of the availability flag.
    pub async fn set_availability(
        &self,
        car_id: i32,
        next: CarAvailability,
        principal: &Principal,
    ) -> DomainResult<Car> {
        principal.ensure(AccessPolicy::StaffOnly, "change car availability")?;

        self.ctx
            .atomically("set car availability", async {
                let uow = self.ctx.repos.begin().await?;
                let mut car = require_active(uow.cars().find_by_id_for_update(car_id).await?, car_id)?;
                apply_availability(uow.cars(), &mut car, next, self.ctx.now()).await?;
                uow.commit().await?;
                Ok(car)
            })
            .await
    }

    pub async fn soft_delete(&self, car_id: i32, principal: &Principal) -> DomainResult<()> {
        principal.ensure(AccessPolicy::AdminOnly, "delete car")?;

        self.ctx
            .atomically("delete car", async {
                let uow = self.ctx.repos.begin().await?;
                let mut car = require_active(uow.cars().find_by_id_for_update(car_id).await?, car_id)?;
                car.soft_delete(self.ctx.now())?;
                uow.cars().update(&car).await?;
                uow.commit().await?;
                info!(car_id, "Car retired");
                Ok(())
            })
            .await
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get(&self, car_id: i32) -> DomainResult<Car> {
        require_active(self.ctx.repos.cars().find_by_id(car_id).await?, car_id)
    }

    pub async fn find_by_license_plate(&self, plate: &str) -> DomainResult<Car> {
        match self.ctx.repos.cars().find_by_license_plate(plate).await? {
            Some(car) if car.is_active => Ok(car),
            _ => Err(DomainError::NotFound {
                entity: "Car",
                field: "license_plate",
                value: plate.to_string(),
            }),
        }
    }

    pub async fn list_active(&self) -> DomainResult<Vec<Car>> {
        self.ctx.repos.cars().find_active(None).await
    }

    pub async fn list_available(&self) -> DomainResult<Vec<Car>> {
        self.ctx
            .repos
            .cars()
            .find_active(Some(CarAvailability::Available))
            .await
    }

    /// Available cars with nothing booked over `[start, end]`.
    pub async fn find_available_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Car>> {
        let range = checked_range(start, end)?;
        let repos = &self.ctx.repos;

        let cars = repos.cars().find_active(Some(CarAvailability::Available)).await?;
        let ids: Vec<i32> = cars.iter().map(|c| c.id).collect();

        let mut claims: HashMap<i32, Vec<Claim>> = HashMap::new();
        for r in repos.reservations().find_blocking_for_cars(&ids).await? {
            claims.entry(r.car_id).or_default().push(r.claim());
        }
        for r in repos.rentals().find_active_for_cars(&ids).await? {
            claims.entry(r.car_id).or_default().push(r.claim());
        }

        Ok(cars
            .into_iter()
            .filter(|car| {
                let held = claims.get(&car.id).map(Vec::as_slice).unwrap_or(&[]);
                !has_conflict(&range, held, None)
            })
            .collect())
    }

    /// Whether `car_id` has no pending/confirmed reservation or active
    /// rental overlapping `[start, end]`.
    pub async fn is_free_between(
        &self,
        car_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let range = checked_range(start, end)?;
        self.get(car_id).await?;
        let repos = &self.ctx.repos;
        let claims =
            crate::application::context::blocking_claims(repos.reservations(), repos.rentals(), car_id)
                .await?;
        Ok(!has_conflict(&range, &claims, None))
    }
}

fn checked_range(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<DateRange> {
    if start >= end {
        return Err(DomainError::Validation(
            "Start date must be before end date".into(),
        ));
    }
    Ok(DateRange::new(start, end))
}
