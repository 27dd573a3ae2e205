//! SeaORM implementation of CustomerRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, Set,
};

use crate::domain::customer::{Customer, CustomerRepository, NewCustomer};
use crate::infrastructure::database::entities::customer;
use crate::shared::{db_err, DomainError, DomainResult};

pub struct SeaOrmCustomerRepository<C = DatabaseConnection> {
    conn: Arc<C>,
}

impl<C> SeaOrmCustomerRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

fn model_to_domain(m: customer::Model) -> Customer {
    Customer {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        phone_number: m.phone_number,
        address: m.address,
        driver_license: m.driver_license,
        created_at: m.created_at,
    }
}

#[async_trait]
impl<C> CustomerRepository for SeaOrmCustomerRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, new: NewCustomer, now: DateTime<Utc>) -> DomainResult<Customer> {
        let model = customer::ActiveModel {
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            phone_number: Set(new.phone_number),
            address: Set(new.address),
            driver_license: Set(new.driver_license),
            created_at: Set(now),
            ..Default::default()
        };
        let saved = model.insert(self.conn.as_ref()).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Customer>> {
        let model = customer::Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Customer>> {
        let models = customer::Entity::find()
            .order_by_asc(customer::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, c: &Customer) -> DomainResult<()> {
        let model = customer::ActiveModel {
            id: Set(c.id),
            first_name: Set(c.first_name.clone()),
            last_name: Set(c.last_name.clone()),
            phone_number: Set(c.phone_number.clone()),
            address: Set(c.address.clone()),
            driver_license: Set(c.driver_license.clone()),
            created_at: Set(c.created_at),
        };
        model.update(self.conn.as_ref()).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => DomainError::not_found("Customer", c.id),
            other => db_err(other),
        })?;
        Ok(())
    }
}
