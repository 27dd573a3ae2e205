//! Branch locations

use tracing::info;

use crate::application::context::ServiceContext;
use crate::domain::location::{Location, LocationChanges, LocationRepository, NewLocation};
use crate::domain::{AccessPolicy, Principal};
use crate::shared::{DomainError, DomainResult};

/// Every referenced location exists and is active, else NotFound.
pub(crate) async fn require_locations(
    locations: &dyn LocationRepository,
    ids: &[Option<i32>],
) -> DomainResult<()> {
    for id in ids.iter().flatten().copied() {
        match locations.find_by_id(id).await? {
            Some(location) if location.is_active => {}
            _ => return Err(DomainError::not_found("Location", id)),
        }
    }
    Ok(())
}

pub struct LocationService {
    ctx: ServiceContext,
}

impl LocationService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn create(&self, new: NewLocation, principal: &Principal) -> DomainResult<Location> {
        principal.ensure(AccessPolicy::ManagerOrAdmin, "create location")?;
        new.validate()?;
        let location = self.ctx.repos.locations().insert(new).await?;
        info!(location_id = location.id, name = %location.name, "Location created");
        Ok(location)
    }

    pub async fn get(&self, location_id: i32) -> DomainResult<Location> {
        match self.ctx.repos.locations().find_by_id(location_id).await? {
            Some(location) if location.is_active => Ok(location),
            _ => Err(DomainError::not_found("Location", location_id)),
        }
    }

    pub async fn list(&self) -> DomainResult<Vec<Location>> {
        self.ctx.repos.locations().find_active().await
    }

    pub async fn update(
        &self,
        location_id: i32,
        changes: LocationChanges,
        principal: &Principal,
    ) -> DomainResult<Location> {
        principal.ensure(AccessPolicy::ManagerOrAdmin, "update location")?;
        let mut location = self.get(location_id).await?;
        changes.apply(&mut location)?;
        self.ctx.repos.locations().update(&location).await?;
        info!(location_id, "Location updated");
        Ok(location)
    }

    pub async fn deactivate(&self, location_id: i32, principal: &Principal) -> DomainResult<()> {
        principal.ensure(AccessPolicy::ManagerOrAdmin, "deactivate location")?;
        let mut location = self.get(location_id).await?;
        location.is_active = false;
        self.ctx.repos.locations().update(&location).await?;
        info!(location_id, "Location deactivated");
        Ok(())
    }
}
