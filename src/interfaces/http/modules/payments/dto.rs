//! Payment DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::RentalBalance;
use crate::domain::payment::{NewPayment, Payment, PaymentMethod, PaymentStatus};
use crate::shared::{DomainError, DomainResult};

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentDto {
    pub id: i32,
    pub rental_id: i32,
    pub amount: Decimal,
    /// Cash, Credit Card, Debit Card, Mpesa, Paypal
    pub payment_method: String,
    /// pending, completed, failed, refunded
    pub status: String,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub payment_date: DateTime<Utc>,
    /// Part of `amount` paid back
    pub refunded_amount: Decimal,
}

impl From<Payment> for PaymentDto {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            rental_id: p.rental_id,
            amount: p.amount,
            payment_method: p.payment_method.as_str().to_string(),
            status: p.status.as_str().to_string(),
            transaction_id: p.transaction_id,
            notes: p.notes,
            payment_date: p.payment_date,
            refunded_amount: p.refunded_amount,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordPaymentRequest {
    pub rental_id: i32,
    pub amount: Decimal,
    pub payment_method: String,
    /// Defaults to completed
    pub status: Option<String>,
    #[validate(length(max = 100))]
    pub transaction_id: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl RecordPaymentRequest {
    pub fn into_domain(self) -> DomainResult<NewPayment> {
        let payment_method = PaymentMethod::from_str(&self.payment_method).ok_or_else(|| {
            DomainError::Validation(format!("Unknown payment method '{}'", self.payment_method))
        })?;
        let status = match self.status.as_deref() {
            Some(s) => parse_status(s)?,
            None => PaymentStatus::Completed,
        };
        Ok(NewPayment {
            rental_id: self.rental_id,
            amount: self.amount,
            payment_method,
            status,
            transaction_id: self.transaction_id,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePaymentStatusRequest {
    pub status: String,
}

impl UpdatePaymentStatusRequest {
    pub fn parse(&self) -> DomainResult<PaymentStatus> {
        parse_status(&self.status)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefundPaymentRequest {
    /// At most the amount originally paid
    pub amount: Decimal,
    #[validate(length(min = 1, max = 255, message = "reason is required"))]
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceDto {
    pub rental_id: i32,
    pub total_amount: Decimal,
    pub paid: Decimal,
    pub outstanding: Decimal,
}

impl From<RentalBalance> for BalanceDto {
    fn from(b: RentalBalance) -> Self {
        Self {
            rental_id: b.rental_id,
            total_amount: b.total_amount,
            paid: b.paid,
            outstanding: b.outstanding,
        }
    }
}

fn parse_status(s: &str) -> DomainResult<PaymentStatus> {
    PaymentStatus::from_str(s)
        .ok_or_else(|| DomainError::Validation(format!("Unknown payment status '{}'", s)))
}
