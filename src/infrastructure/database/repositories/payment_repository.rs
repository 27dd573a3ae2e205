//! SeaORM implementation of PaymentRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::payment::{NewPayment, Payment, PaymentMethod, PaymentRepository, PaymentStatus};
use crate::domain::pricing::round_money;
use crate::infrastructure::database::entities::payment;
use crate::shared::{db_err, DomainError, DomainResult};

pub struct SeaOrmPaymentRepository<C = DatabaseConnection> {
    conn: Arc<C>,
}

impl<C> SeaOrmPaymentRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

fn model_to_domain(m: payment::Model) -> DomainResult<Payment> {
    let method = PaymentMethod::from_str(&m.payment_method).ok_or_else(|| {
        DomainError::Internal(format!("payment {} has unknown method '{}'", m.id, m.payment_method))
    })?;
    let status = PaymentStatus::from_str(&m.status).ok_or_else(|| {
        DomainError::Internal(format!("payment {} has unknown status '{}'", m.id, m.status))
    })?;
    Ok(Payment {
        id: m.id,
        rental_id: m.rental_id,
        amount: round_money(m.amount),
        payment_method: method,
        status,
        transaction_id: m.transaction_id,
        notes: m.notes,
        payment_date: m.payment_date,
        refunded_amount: round_money(m.refunded_amount),
    })
}

#[async_trait]
impl<C> PaymentRepository for SeaOrmPaymentRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, new: NewPayment, now: DateTime<Utc>) -> DomainResult<Payment> {
        let model = payment::ActiveModel {
            rental_id: Set(new.rental_id),
            amount: Set(round_money(new.amount)),
            payment_method: Set(new.payment_method.as_str().to_string()),
            status: Set(new.status.as_str().to_string()),
            transaction_id: Set(new.transaction_id),
            notes: Set(new.notes),
            payment_date: Set(now),
            refunded_amount: Set(Decimal::ZERO),
            ..Default::default()
        };
        let saved = model.insert(self.conn.as_ref()).await.map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Payment>> {
        payment::Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_for_rental(&self, rental_id: i32) -> DomainResult<Vec<Payment>> {
        let models = payment::Entity::find()
            .filter(payment::Column::RentalId.eq(rental_id))
            .order_by_asc(payment::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn update(&self, p: &Payment) -> DomainResult<()> {
        let model = payment::ActiveModel {
            id: Set(p.id),
            rental_id: Set(p.rental_id),
            amount: Set(p.amount),
            payment_method: Set(p.payment_method.as_str().to_string()),
            status: Set(p.status.as_str().to_string()),
            transaction_id: Set(p.transaction_id.clone()),
            notes: Set(p.notes.clone()),
            payment_date: Set(p.payment_date),
            refunded_amount: Set(round_money(p.refunded_amount)),
        };
        model.update(self.conn.as_ref()).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => DomainError::not_found("Payment", p.id),
            other => db_err(other),
        })?;
        Ok(())
    }
}
