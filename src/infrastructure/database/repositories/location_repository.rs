//! SeaORM implementation of LocationRepository

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::location::{Location, LocationRepository, NewLocation};
use crate::infrastructure::database::entities::location;
use crate::shared::{db_err, DomainError, DomainResult};

pub struct SeaOrmLocationRepository<C = DatabaseConnection> {
    conn: Arc<C>,
}

impl<C> SeaOrmLocationRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

fn model_to_domain(m: location::Model) -> Location {
    Location {
        id: m.id,
        name: m.location_name,
        address: m.address,
        contact_number: m.contact_number,
        manager_name: m.manager_name,
        opening_time: m.opening_time,
        closing_time: m.closing_time,
        is_active: m.is_active,
    }
}

#[async_trait]
impl<C> LocationRepository for SeaOrmLocationRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, new: NewLocation) -> DomainResult<Location> {
        let model = location::ActiveModel {
            location_name: Set(new.name),
            address: Set(new.address),
            contact_number: Set(new.contact_number),
            manager_name: Set(new.manager_name),
            opening_time: Set(new.opening_time),
            closing_time: Set(new.closing_time),
            is_active: Set(true),
            ..Default::default()
        };
        let saved = model.insert(self.conn.as_ref()).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Location>> {
        let model = location::Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_active(&self) -> DomainResult<Vec<Location>> {
        let models = location::Entity::find()
            .filter(location::Column::IsActive.eq(true))
            .order_by_asc(location::Column::LocationName)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, l: &Location) -> DomainResult<()> {
        let model = location::ActiveModel {
            id: Set(l.id),
            location_name: Set(l.name.clone()),
            address: Set(l.address.clone()),
            contact_number: Set(l.contact_number.clone()),
            manager_name: Set(l.manager_name.clone()),
            opening_time: Set(l.opening_time),
            closing_time: Set(l.closing_time),
            is_active: Set(l.is_active),
        };
        model.update(self.conn.as_ref()).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => DomainError::not_found("Location", l.id),
            other => db_err(other),
        })?;
        Ok(())
    }
}
