//! Insurance policy covering one car for a period

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::overlap::DateRange;
use crate::shared::{DomainError, DomainResult};

const MAX_POLICY_NUMBER_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsuranceStatus {
    Active,
    Expired,
    Cancelled,
}

impl InsuranceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "expired" => Some(Self::Expired),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for InsuranceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Insurance {
    pub id: i32,
    pub car_id: i32,
    pub provider: String,
    pub policy_number: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub premium_amount: Decimal,
    pub status: InsuranceStatus,
    pub coverage_details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Insurance {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    pub fn in_force(&self, at: DateTime<Utc>) -> bool {
        self.status == InsuranceStatus::Active && self.start_date <= at && at <= self.end_date
    }

    fn ensure_editable(&self, action: &str) -> DomainResult<()> {
        if self.status != InsuranceStatus::Active {
            return Err(DomainError::Validation(format!(
                "Cannot {} {} insurance",
                action, self.status
            )));
        }
        Ok(())
    }

    /// Push the end date out. A lapsed policy that was never marked expired
    /// can still be renewed.
    pub fn renew(
        &mut self,
        new_end_date: DateTime<Utc>,
        new_premium: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_editable("renew")?;
        if new_end_date <= self.end_date {
            return Err(DomainError::Validation(
                "New end date must be after current end date".into(),
            ));
        }
        if let Some(premium) = new_premium {
            validate_premium(premium)?;
            self.premium_amount = premium;
        }
        self.end_date = new_end_date;
        self.updated_at = now;
        Ok(())
    }
}

/// Input for a new policy
#[derive(Debug, Clone)]
pub struct NewInsurance {
    pub car_id: i32,
    pub provider: String,
    pub policy_number: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub premium_amount: Decimal,
    pub coverage_details: Option<String>,
}

impl NewInsurance {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_period(self.start_date, self.end_date)?;
        validate_premium(self.premium_amount)?;
        if self.provider.trim().is_empty() {
            return Err(DomainError::Validation("Insurance provider is required".into()));
        }
        let number = self.policy_number.trim();
        if number.is_empty() || number.len() > MAX_POLICY_NUMBER_LEN {
            return Err(DomainError::Validation(format!(
                "Policy number must be 1 to {} characters",
                MAX_POLICY_NUMBER_LEN
            )));
        }
        Ok(())
    }
}

/// Editable fields of an active policy. The policy number is fixed.
#[derive(Debug, Clone, Default)]
pub struct InsuranceChanges {
    pub provider: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub premium_amount: Option<Decimal>,
    pub coverage_details: Option<String>,
}

impl InsuranceChanges {
    pub fn apply(self, policy: &mut Insurance, now: DateTime<Utc>) -> DomainResult<()> {
        policy.ensure_editable("update")?;
        let start = self.start_date.unwrap_or(policy.start_date);
        let end = self.end_date.unwrap_or(policy.end_date);
        validate_period(start, end)?;
        if let Some(premium) = self.premium_amount {
            validate_premium(premium)?;
            policy.premium_amount = premium;
        }

        policy.start_date = start;
        policy.end_date = end;
        if let Some(v) = self.provider {
            policy.provider = v;
        }
        if let Some(v) = self.coverage_details {
            policy.coverage_details = Some(v);
        }
        policy.updated_at = now;
        Ok(())
    }

    pub fn moves_period(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

fn validate_period(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<()> {
    if start >= end {
        return Err(DomainError::Validation(
            "End date must be after start date".into(),
        ));
    }
    Ok(())
}

fn validate_premium(premium: Decimal) -> DomainResult<()> {
    if premium <= Decimal::ZERO {
        return Err(DomainError::Validation(
            "Premium amount must be positive".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap()
    }

    fn policy(status: InsuranceStatus) -> Insurance {
        Insurance {
            id: 1,
            car_id: 1,
            provider: "Jubilee".into(),
            policy_number: "JUB-001".into(),
            start_date: now(),
            end_date: now() + Duration::days(365),
            premium_amount: Decimal::from(900),
            status,
            coverage_details: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn in_force_needs_active_status_and_date() {
        let p = policy(InsuranceStatus::Active);
        assert!(p.in_force(now()));
        assert!(p.in_force(p.end_date));
        assert!(!p.in_force(p.end_date + Duration::seconds(1)));
        assert!(!policy(InsuranceStatus::Cancelled).in_force(now()));
    }

    #[test]
    fn renewal_extends_forward_only() {
        let mut p = policy(InsuranceStatus::Active);
        let end = p.end_date;
        assert!(p.renew(end, None, now()).is_err());
        assert!(p.renew(end + Duration::days(1), Some(Decimal::ZERO), now()).is_err());

        p.renew(end + Duration::days(365), Some(Decimal::from(950)), now()).unwrap();
        assert_eq!(p.end_date, end + Duration::days(365));
        assert_eq!(p.premium_amount, Decimal::from(950));
    }

    #[test]
    fn expired_policy_cannot_be_renewed_or_edited() {
        let mut p = policy(InsuranceStatus::Expired);
        assert!(p.renew(now() + Duration::days(800), None, now()).is_err());
        let changes = InsuranceChanges {
            provider: Some("Britam".into()),
            ..Default::default()
        };
        assert!(changes.apply(&mut p, now()).is_err());
    }

    #[test]
    fn partial_period_change_checked_against_existing() {
        let mut p = policy(InsuranceStatus::Active);
        let changes = InsuranceChanges {
            start_date: Some(p.end_date + Duration::days(1)),
            ..Default::default()
        };
        assert!(changes.apply(&mut p, now()).is_err());
        assert_eq!(p.start_date, now());
    }

    #[test]
    fn new_policy_rules() {
        let valid = NewInsurance {
            car_id: 1,
            provider: "Jubilee".into(),
            policy_number: "JUB-002".into(),
            start_date: now(),
            end_date: now() + Duration::days(30),
            premium_amount: Decimal::from(100),
            coverage_details: None,
        };
        assert!(valid.validate().is_ok());
        assert!(NewInsurance { end_date: now(), ..valid.clone() }.validate().is_err());
        assert!(NewInsurance { premium_amount: Decimal::ZERO, ..valid.clone() }.validate().is_err());
        assert!(NewInsurance { policy_number: " ".into(), ..valid }.validate().is_err());
    }
}
