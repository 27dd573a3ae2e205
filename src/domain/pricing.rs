//! Rental amount and late-fee rules

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Discount tiers and the flat late fee.
///
/// Discounts compound: a 30-day booking gets the weekly discount and then
/// the monthly discount on the already-discounted figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    pub weekly_threshold_days: i64,
    pub weekly_discount: Decimal,
    pub monthly_threshold_days: i64,
    pub monthly_discount: Decimal,
    pub late_fee_per_day: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            weekly_threshold_days: 7,
            weekly_discount: Decimal::new(10, 2),
            monthly_threshold_days: 30,
            monthly_discount: Decimal::new(20, 2),
            late_fee_per_day: Decimal::from(50),
        }
    }
}

/// Whole days covered by `[start, end]`, any started day counts.
pub fn rental_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    ceil_days((end - start).num_milliseconds())
}

fn ceil_days(millis: i64) -> i64 {
    if millis <= 0 {
        return 0;
    }
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// Round to cents, halves away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl PricingPolicy {
    pub fn total_amount(&self, days: i64, daily_rate: Decimal) -> Decimal {
        let mut amount = Decimal::from(days) * daily_rate;
        if days >= self.weekly_threshold_days {
            amount *= Decimal::ONE - self.weekly_discount;
        }
        if days >= self.monthly_threshold_days {
            amount *= Decimal::ONE - self.monthly_discount;
        }
        round_money(amount)
    }

    pub fn total_for_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        daily_rate: Decimal,
    ) -> Decimal {
        self.total_amount(rental_days(start, end), daily_rate)
    }

    /// Days late, rounded up; returning on or before the scheduled end is free.
    pub fn days_late(&self, scheduled_end: DateTime<Utc>, actual_return: DateTime<Utc>) -> i64 {
        if actual_return <= scheduled_end {
            return 0;
        }
        ceil_days((actual_return - scheduled_end).num_milliseconds())
    }

    pub fn late_fee(&self, scheduled_end: DateTime<Utc>, actual_return: DateTime<Utc>) -> Decimal {
        let days = self.days_late(scheduled_end, actual_return);
        round_money(Decimal::from(days) * self.late_fee_per_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
    }

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn no_discount_under_a_week() {
        let p = PricingPolicy::default();
        assert_eq!(p.total_amount(6, Decimal::from(100)), d("600"));
    }

    #[test]
    fn weekly_discount() {
        let p = PricingPolicy::default();
        assert_eq!(p.total_amount(7, Decimal::from(100)), d("630"));
    }

    #[test]
    fn monthly_discount_compounds() {
        let p = PricingPolicy::default();
        assert_eq!(p.total_amount(30, Decimal::from(100)), d("2160"));
    }

    #[test]
    fn amounts_round_to_cents() {
        let p = PricingPolicy::default();
        // 7 * 33.33 * 0.9 = 209.979
        assert_eq!(p.total_amount(7, d("33.33")), d("209.98"));
        // 1 * 0.005 rounds half away from zero
        assert_eq!(p.total_amount(1, d("0.005")), d("0.01"));
    }

    #[test]
    fn partial_days_round_up() {
        assert_eq!(rental_days(day0(), day0() + Duration::hours(1)), 1);
        assert_eq!(rental_days(day0(), day0() + Duration::days(3)), 3);
        assert_eq!(rental_days(day0(), day0() + Duration::days(3) + Duration::seconds(1)), 4);
        assert_eq!(rental_days(day0(), day0()), 0);
    }

    #[test]
    fn late_fees() {
        let p = PricingPolicy::default();
        assert_eq!(p.late_fee(day0(), day0()), Decimal::ZERO);
        assert_eq!(p.late_fee(day0(), day0() - Duration::hours(3)), Decimal::ZERO);
        assert_eq!(p.late_fee(day0(), day0() + Duration::days(1)), d("50"));
        assert_eq!(p.late_fee(day0(), day0() + Duration::hours(60)), d("150"));
    }

    #[test]
    fn policy_deserializes_partially() {
        let p: PricingPolicy = toml::from_str("late_fee_per_day = \"75\"").unwrap();
        assert_eq!(p.late_fee_per_day, d("75"));
        assert_eq!(p.weekly_discount, d("0.10"));
    }
}
