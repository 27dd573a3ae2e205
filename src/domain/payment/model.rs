//! Payment records against a rental

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::shared::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Mpesa,
    Paypal,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::Mpesa => "Mpesa",
            Self::Paypal => "Paypal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Cash" => Some(Self::Cash),
            "Credit Card" => Some(Self::CreditCard),
            "Debit Card" => Some(Self::DebitCard),
            "Mpesa" => Some(Self::Mpesa),
            "Paypal" => Some(Self::Paypal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }

    /// Refunds only apply to money actually received.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        match next {
            PaymentStatus::Refunded => *self == PaymentStatus::Completed,
            _ => !matches!(self, PaymentStatus::Refunded),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Payment {
    pub id: i32,
    pub rental_id: i32,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub payment_date: DateTime<Utc>,
    pub refunded_amount: Decimal,
}

impl Payment {
    /// Money kept after refunds. Only completed or refunded payments count.
    pub fn retained(&self) -> Decimal {
        match self.status {
            PaymentStatus::Completed => self.amount,
            PaymentStatus::Refunded => self.amount - self.refunded_amount,
            PaymentStatus::Pending | PaymentStatus::Failed => Decimal::ZERO,
        }
    }

    /// Refund part or all of a completed payment.
    pub fn refund(&mut self, amount: Decimal, reason: &str) -> DomainResult<()> {
        if self.status != PaymentStatus::Completed {
            return Err(DomainError::Validation(format!(
                "Only completed payments can be refunded (payment is {})",
                self.status
            )));
        }
        if amount <= Decimal::ZERO {
            return Err(DomainError::Validation(
                "Refund amount must be positive".into(),
            ));
        }
        if amount > self.amount {
            return Err(DomainError::Validation(format!(
                "Refund amount {} exceeds paid amount {}",
                amount, self.amount
            )));
        }
        self.refunded_amount = amount;
        self.status = PaymentStatus::Refunded;
        let line = format!("Refunded: {}. Reason: {}", amount, reason.trim());
        self.notes = Some(match self.notes.take() {
            Some(existing) if !existing.is_empty() => format!("{existing}\n{line}"),
            _ => line,
        });
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub rental_id: i32,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
}

impl NewPayment {
    pub fn validate(&self) -> DomainResult<()> {
        if self.amount <= Decimal::ZERO {
            return Err(DomainError::Validation(
                "Payment amount must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Amount still owed: total minus money retained after refunds.
pub fn outstanding_balance(total_amount: Decimal, payments: &[Payment]) -> Decimal {
    let paid: Decimal = payments.iter().map(Payment::retained).sum();
    total_amount - paid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(amount: i64, status: PaymentStatus) -> Payment {
        Payment {
            id: 1,
            rental_id: 1,
            amount: Decimal::from(amount),
            payment_method: PaymentMethod::Mpesa,
            status,
            transaction_id: None,
            notes: None,
            payment_date: Utc::now(),
            refunded_amount: if status == PaymentStatus::Refunded {
                Decimal::from(amount)
            } else {
                Decimal::ZERO
            },
        }
    }

    #[test]
    fn balance_counts_completed_only() {
        let payments = vec![
            payment(100, PaymentStatus::Completed),
            payment(50, PaymentStatus::Pending),
            payment(70, PaymentStatus::Refunded),
        ];
        assert_eq!(outstanding_balance(Decimal::from(300), &payments), Decimal::from(200));
    }

    #[test]
    fn partial_refund_keeps_the_rest_on_the_books() {
        let mut p = payment(100, PaymentStatus::Completed);
        p.refund(Decimal::from(30), "scratched bumper waived").unwrap();
        assert_eq!(p.status, PaymentStatus::Refunded);
        assert_eq!(p.refunded_amount, Decimal::from(30));
        assert_eq!(p.notes.as_deref(), Some("Refunded: 30. Reason: scratched bumper waived"));
        assert_eq!(outstanding_balance(Decimal::from(100), &[p]), Decimal::from(30));
    }

    #[test]
    fn refund_is_capped_at_paid_amount() {
        let mut p = payment(100, PaymentStatus::Completed);
        assert!(matches!(
            p.refund(Decimal::new(10001, 2), "too much"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(p.refund(Decimal::ZERO, "nothing"), Err(DomainError::Validation(_))));
        assert_eq!(p.status, PaymentStatus::Completed);

        let mut pending = payment(100, PaymentStatus::Pending);
        assert!(pending.refund(Decimal::from(10), "early").is_err());
    }

    #[test]
    fn refund_requires_completed() {
        assert!(PaymentStatus::Completed.can_transition_to(PaymentStatus::Refunded));
        assert!(!PaymentStatus::Pending.can_transition_to(PaymentStatus::Refunded));
        assert!(!PaymentStatus::Refunded.can_transition_to(PaymentStatus::Completed));
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Failed));
    }

    #[test]
    fn non_positive_amount_rejected() {
        let p = NewPayment {
            rental_id: 1,
            amount: Decimal::ZERO,
            payment_method: PaymentMethod::Cash,
            status: PaymentStatus::Completed,
            transaction_id: None,
            notes: None,
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn method_labels() {
        assert_eq!(PaymentMethod::from_str("Credit Card"), Some(PaymentMethod::CreditCard));
        assert_eq!(PaymentMethod::DebitCard.as_str(), "Debit Card");
    }
}
