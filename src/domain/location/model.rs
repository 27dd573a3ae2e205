//! Pickup / return location

use chrono::NaiveTime;

use crate::shared::{DomainError, DomainResult};

#[derive(Debug, Clone)]
pub struct Location {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub contact_number: String,
    pub manager_name: Option<String>,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewLocation {
    pub name: String,
    pub address: String,
    pub contact_number: String,
    pub manager_name: Option<String>,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
}

impl NewLocation {
    pub fn validate(&self) -> DomainResult<()> {
        validate_hours(self.opening_time, self.closing_time)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocationChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub manager_name: Option<String>,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
}

impl LocationChanges {
    pub fn apply(self, location: &mut Location) -> DomainResult<()> {
        let opening = self.opening_time.unwrap_or(location.opening_time);
        let closing = self.closing_time.unwrap_or(location.closing_time);
        validate_hours(opening, closing)?;
        location.opening_time = opening;
        location.closing_time = closing;
        if let Some(v) = self.name {
            location.name = v;
        }
        if let Some(v) = self.address {
            location.address = v;
        }
        if let Some(v) = self.contact_number {
            location.contact_number = v;
        }
        if let Some(v) = self.manager_name {
            location.manager_name = Some(v);
        }
        Ok(())
    }
}

fn validate_hours(opening: NaiveTime, closing: NaiveTime) -> DomainResult<()> {
    if opening >= closing {
        return Err(DomainError::Validation(
            "Opening time must be before closing time".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn hours_must_be_ordered() {
        let loc = NewLocation {
            name: "Airport".into(),
            address: "JKIA".into(),
            contact_number: "0700".into(),
            manager_name: None,
            opening_time: t(18),
            closing_time: t(8),
        };
        assert!(loc.validate().is_err());
    }

    #[test]
    fn partial_hour_change_is_checked_against_existing() {
        let mut loc = Location {
            id: 1,
            name: "Airport".into(),
            address: "JKIA".into(),
            contact_number: "0700".into(),
            manager_name: None,
            opening_time: t(8),
            closing_time: t(18),
            is_active: true,
        };
        let bad = LocationChanges {
            opening_time: Some(t(19)),
            ..Default::default()
        };
        assert!(bad.apply(&mut loc).is_err());
        assert_eq!(loc.opening_time, t(8));
    }
}
