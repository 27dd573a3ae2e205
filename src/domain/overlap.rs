//! Date-range conflict detection for a single car.
//!
//! Ranges are closed on both ends: a booking that ends at the exact instant
//! another one starts still conflicts with it.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Inclusive interval intersection.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Something that currently holds a car for a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimSource {
    Reservation(i32),
    Rental(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    pub source: ClaimSource,
    pub range: DateRange,
}

/// First claim overlapping `candidate`, skipping `ignore` (the record being
/// re-validated, e.g. a reservation on confirmation).
pub fn find_conflict<'a>(
    candidate: &DateRange,
    claims: &'a [Claim],
    ignore: Option<ClaimSource>,
) -> Option<&'a Claim> {
    claims
        .iter()
        .filter(|c| Some(c.source) != ignore)
        .find(|c| c.range.overlaps(candidate))
}

pub fn has_conflict(candidate: &DateRange, claims: &[Claim], ignore: Option<ClaimSource>) -> bool {
    find_conflict(candidate, claims, ignore).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, d, 10, 0, 0).unwrap()
    }

    fn range(a: u32, b: u32) -> DateRange {
        DateRange::new(day(a), day(b))
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        assert!(!range(1, 3).overlaps(&range(4, 6)));
        assert!(!range(4, 6).overlaps(&range(1, 3)));
    }

    #[test]
    fn partial_and_enclosing_overlap() {
        assert!(range(1, 5).overlaps(&range(4, 8)));
        assert!(range(4, 8).overlaps(&range(1, 5)));
        assert!(range(1, 10).overlaps(&range(3, 4)));
        assert!(range(3, 4).overlaps(&range(1, 10)));
    }

    #[test]
    fn touching_boundaries_conflict() {
        assert!(range(1, 3).overlaps(&range(3, 5)));
        assert!(range(3, 5).overlaps(&range(1, 3)));
    }

    #[test]
    fn conflict_search_skips_ignored_claim() {
        let claims = vec![
            Claim {
                source: ClaimSource::Reservation(1),
                range: range(10, 12),
            },
            Claim {
                source: ClaimSource::Rental(4),
                range: range(20, 22),
            },
        ];

        assert!(has_conflict(&range(11, 13), &claims, None));
        assert!(!has_conflict(&range(11, 13), &claims, Some(ClaimSource::Reservation(1))));
        assert_eq!(
            find_conflict(&range(21, 25), &claims, None).map(|c| c.source),
            Some(ClaimSource::Rental(4))
        );
        assert!(!has_conflict(&range(13, 19), &claims, None));
    }

    #[test]
    fn rental_and_reservation_ids_are_distinct_sources() {
        let claims = vec![Claim {
            source: ClaimSource::Rental(1),
            range: range(10, 12),
        }];
        assert!(has_conflict(&range(10, 11), &claims, Some(ClaimSource::Reservation(1))));
    }
}
