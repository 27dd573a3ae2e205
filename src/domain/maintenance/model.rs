//! Service and repair work on a car.
//!
//! Scheduled → InProgress → Completed, with Cancelled reachable from either
//! open state. While a record is in progress the car sits in Maintenance.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::shared::{DomainError, DomainResult};

const MAX_DESCRIPTION_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceType {
    Routine,
    Repair,
    Accident,
    Upgrade,
}

impl MaintenanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Routine => "routine",
            Self::Repair => "repair",
            Self::Accident => "accident",
            Self::Upgrade => "upgrade",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "routine" => Some(Self::Routine),
            "repair" => Some(Self::Repair),
            "accident" => Some(Self::Accident),
            "upgrade" => Some(Self::Upgrade),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(Self::Scheduled),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Maintenance {
    pub id: i32,
    pub car_id: i32,
    pub maintenance_type: MaintenanceType,
    pub status: MaintenanceStatus,
    pub maintenance_date: DateTime<Utc>,
    pub description: String,
    pub cost: Decimal,
    pub completed_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Maintenance {
    pub fn day(&self) -> NaiveDate {
        self.maintenance_date.date_naive()
    }

    fn ensure_open(&self) -> DomainResult<()> {
        if self.status.is_closed() {
            return Err(DomainError::Validation(format!(
                "Cannot modify {} maintenance",
                self.status
            )));
        }
        Ok(())
    }

    /// Work begins; only scheduled records can start.
    pub fn start(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != MaintenanceStatus::Scheduled {
            return Err(DomainError::Validation(format!(
                "Only scheduled maintenance can be started (status: {})",
                self.status
            )));
        }
        self.status = MaintenanceStatus::InProgress;
        self.updated_at = now;
        Ok(())
    }

    /// Finish in-progress work, optionally with the final bill.
    pub fn complete(
        &mut self,
        actual_cost: Option<Decimal>,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.status != MaintenanceStatus::InProgress {
            return Err(DomainError::Validation(
                "Can only complete maintenance that is in progress".into(),
            ));
        }
        if let Some(cost) = actual_cost {
            validate_cost(cost)?;
            self.cost = cost;
        }
        if notes.is_some() {
            self.notes = notes;
        }
        self.status = MaintenanceStatus::Completed;
        self.completed_date = Some(now);
        self.updated_at = now;
        Ok(())
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_open()?;
        self.status = MaintenanceStatus::Cancelled;
        self.updated_at = now;
        Ok(())
    }
}

/// Input for scheduling maintenance
#[derive(Debug, Clone)]
pub struct NewMaintenance {
    pub car_id: i32,
    pub maintenance_type: MaintenanceType,
    pub maintenance_date: DateTime<Utc>,
    pub description: String,
    pub cost: Decimal,
    pub notes: Option<String>,
}

impl NewMaintenance {
    pub fn validate(&self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.maintenance_type == MaintenanceType::Routine && self.maintenance_date < now {
            return Err(DomainError::Validation(
                "Routine maintenance cannot be scheduled in the past".into(),
            ));
        }
        validate_cost(self.cost)?;
        validate_description(&self.description)
    }
}

/// Editable fields of an open record
#[derive(Debug, Clone, Default)]
pub struct MaintenanceChanges {
    pub maintenance_type: Option<MaintenanceType>,
    pub maintenance_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub cost: Option<Decimal>,
    pub notes: Option<String>,
}

impl MaintenanceChanges {
    pub fn apply(self, record: &mut Maintenance, now: DateTime<Utc>) -> DomainResult<()> {
        record.ensure_open()?;
        if let Some(cost) = self.cost {
            validate_cost(cost)?;
        }
        if let Some(description) = self.description.as_deref() {
            validate_description(description)?;
        }

        if let Some(v) = self.maintenance_type {
            record.maintenance_type = v;
        }
        if let Some(v) = self.maintenance_date {
            record.maintenance_date = v;
        }
        if let Some(v) = self.description {
            record.description = v;
        }
        if let Some(v) = self.cost {
            record.cost = v;
        }
        if let Some(v) = self.notes {
            record.notes = Some(v);
        }
        record.updated_at = now;
        Ok(())
    }

    pub fn moves_date(&self) -> bool {
        self.maintenance_date.is_some()
    }
}

fn validate_cost(cost: Decimal) -> DomainResult<()> {
    if cost <= Decimal::ZERO {
        return Err(DomainError::Validation(
            "Maintenance cost must be positive".into(),
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> DomainResult<()> {
    if description.trim().is_empty() || description.len() > MAX_DESCRIPTION_LEN {
        return Err(DomainError::Validation(format!(
            "Description must be 1 to {} characters",
            MAX_DESCRIPTION_LEN
        )));
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

    fn record(status: MaintenanceStatus) -> Maintenance {
        Maintenance {
            id: 1,
            car_id: 1,
            maintenance_type: MaintenanceType::Repair,
            status,
            maintenance_date: now(),
            description: "Brake pads".into(),
            cost: Decimal::from(120),
            completed_date: None,
            notes: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn new_record(kind: MaintenanceType, at: DateTime<Utc>, cost: i64) -> NewMaintenance {
        NewMaintenance {
            car_id: 1,
            maintenance_type: kind,
            maintenance_date: at,
            description: "Oil change".into(),
            cost: Decimal::from(cost),
            notes: None,
        }
    }

    #[test]
    fn routine_work_is_not_backdated() {
        let yesterday = now() - Duration::days(1);
        assert!(new_record(MaintenanceType::Routine, yesterday, 50).validate(now()).is_err());
        assert!(new_record(MaintenanceType::Accident, yesterday, 50).validate(now()).is_ok());
    }

    #[test]
    fn cost_must_be_positive() {
        let tomorrow = now() + Duration::days(1);
        assert!(new_record(MaintenanceType::Routine, tomorrow, 0).validate(now()).is_err());
        assert!(new_record(MaintenanceType::Routine, tomorrow, 1).validate(now()).is_ok());
    }

    #[test]
    fn lifecycle() {
        let mut m = record(MaintenanceStatus::Scheduled);
        assert!(m.complete(None, None, now()).is_err());

        m.start(now()).unwrap();
        assert_eq!(m.status, MaintenanceStatus::InProgress);
        assert!(m.start(now()).is_err());

        m.complete(Some(Decimal::from(180)), Some("Rotors too".into()), now()).unwrap();
        assert_eq!(m.status, MaintenanceStatus::Completed);
        assert_eq!(m.cost, Decimal::from(180));
        assert_eq!(m.completed_date, Some(now()));
        assert!(m.cancel(now()).is_err());
    }

    #[test]
    fn closed_records_are_frozen() {
        let mut m = record(MaintenanceStatus::Cancelled);
        let changes = MaintenanceChanges {
            description: Some("Tyres".into()),
            ..Default::default()
        };
        assert!(changes.apply(&mut m, now()).is_err());
    }

    #[test]
    fn status_labels() {
        assert_eq!(MaintenanceStatus::from_str("in_progress"), Some(MaintenanceStatus::InProgress));
        assert_eq!(MaintenanceType::Upgrade.as_str(), "upgrade");
        assert!(MaintenanceStatus::Completed.is_closed());
        assert!(!MaintenanceStatus::Scheduled.is_closed());
    }
}
