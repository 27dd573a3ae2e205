//! Payment records against rentals. Nothing is charged here; staff record
//! what the till or gateway reported.

use rust_decimal::Decimal;
use tracing::info;

use crate::application::context::ServiceContext;
use crate::domain::payment::{outstanding_balance, NewPayment, Payment, PaymentStatus};
use crate::domain::rental::Rental;
use crate::domain::{AccessPolicy, Principal};
use crate::shared::{DomainError, DomainResult};

/// What a rental has cost and what is still owed
#[derive(Debug, Clone, PartialEq)]
pub struct RentalBalance {
    pub rental_id: i32,
    pub total_amount: Decimal,
    pub paid: Decimal,
    pub outstanding: Decimal,
}

pub struct PaymentService {
    ctx: ServiceContext,
}

impl PaymentService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn record_payment(
        &self,
        payment: NewPayment,
        principal: &Principal,
    ) -> DomainResult<Payment> {
        principal.ensure(AccessPolicy::StaffOnly, "record payment")?;
        payment.validate()?;
        self.rental(payment.rental_id).await?;

        let payment = self.ctx.repos.payments().insert(payment, self.ctx.now()).await?;
        info!(
            payment_id = payment.id,
            rental_id = payment.rental_id,
            amount = %payment.amount,
            status = %payment.status,
            "Payment recorded"
        );
        Ok(payment)
    }

    pub async fn list_for_rental(
        &self,
        rental_id: i32,
        principal: &Principal,
    ) -> DomainResult<Vec<Payment>> {
        let rental = self.rental(rental_id).await?;
        principal.ensure(AccessPolicy::OwnerOrStaff(rental.customer_id), "view payments")?;
        self.ctx.repos.payments().find_for_rental(rental_id).await
    }

    pub async fn update_status(
        &self,
        payment_id: i32,
        status: PaymentStatus,
        principal: &Principal,
    ) -> DomainResult<Payment> {
        principal.ensure(AccessPolicy::StaffOnly, "update payment")?;
        let mut payment = self
            .ctx
            .repos
            .payments()
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment", payment_id))?;

        if !payment.status.can_transition_to(status) {
            return Err(DomainError::Validation(format!(
                "Payment cannot move from {} to {}",
                payment.status, status
            )));
        }
        let previous = payment.status;
        if status == PaymentStatus::Refunded {
            payment.refunded_amount = payment.amount;
        }
        payment.status = status;
        self.ctx.repos.payments().update(&payment).await?;
        info!(payment_id, from = %previous, to = %status, "Payment status changed");
        Ok(payment)
    }

    /// Pay back part or all of a completed payment. Never more than was paid.
    pub async fn refund(
        &self,
        payment_id: i32,
        amount: Decimal,
        reason: &str,
        principal: &Principal,
    ) -> DomainResult<Payment> {
        principal.ensure(AccessPolicy::StaffOnly, "refund payment")?;
        let mut payment = self
            .ctx
            .repos
            .payments()
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment", payment_id))?;

        payment.refund(amount, reason)?;
        self.ctx.repos.payments().update(&payment).await?;
        metrics::counter!("payments_refunded_total").increment(1);
        info!(payment_id, rental_id = payment.rental_id, refunded = %amount, "Payment refunded");
        Ok(payment)
    }

    pub async fn balance(&self, rental_id: i32, principal: &Principal) -> DomainResult<RentalBalance> {
        let rental = self.rental(rental_id).await?;
        principal.ensure(AccessPolicy::OwnerOrStaff(rental.customer_id), "view balance")?;
        let payments = self.ctx.repos.payments().find_for_rental(rental_id).await?;
        let outstanding = outstanding_balance(rental.total_amount, &payments);
        Ok(RentalBalance {
            rental_id,
            total_amount: rental.total_amount,
            paid: rental.total_amount - outstanding,
            outstanding,
        })
    }

    async fn rental(&self, rental_id: i32) -> DomainResult<Rental> {
        self.ctx
            .repos
            .rentals()
            .find_by_id(rental_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Rental", rental_id))
    }
}
