use super::super::charge::BillingPeriod;
use super::super::interval::{days_in_month, days_in_year, DateInterval};
use chrono::Datelike;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Prorated share of a charge for one window/charge overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProrationResult {
    pub amount: Decimal,
    pub overlap_days: i64,
}

impl ProrationResult {
    pub const fn zero() -> Self {
        Self {
            amount: Decimal::ZERO,
            overlap_days: 0,
        }
    }
}

/// Share of the reporting window a unit was occupied, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OccupancyResult {
    pub fraction: f64,
}

impl OccupancyResult {
    pub const fn vacant() -> Self {
        Self { fraction: 0.0 }
    }
}

const DAYS_PER_WEEK: Decimal = Decimal::from_parts(7, 0, 0, false, 0);

/// Prorates `amount` over the overlap of `window` and `validity`.
///
/// The daily rate is derived from the period: daily amounts apply as-is,
/// weekly amounts divide by seven, and monthly/yearly amounts divide by the
/// actual day count of the calendar month/year containing each overlap day.
/// Overlaps crossing a month or year boundary are split at the boundary and
/// each chunk prorated against its own divisor.
///
/// Currency math stays in `Decimal` end to end; the result is rounded once,
/// to cents, half away from zero.
pub fn prorate(
    window: &DateInterval,
    validity: &DateInterval,
    period: BillingPeriod,
    amount: Decimal,
) -> ProrationResult {
    let overlap = match window.intersect(validity) {
        Some(overlap) => overlap,
        None => return ProrationResult::zero(),
    };
    let overlap_days = match overlap.length_in_days() {
        Some(days) => days,
        None => return ProrationResult::zero(),
    };

    let raw = match period {
        BillingPeriod::Daily => amount * Decimal::from(overlap_days),
        BillingPeriod::Weekly => amount / DAYS_PER_WEEK * Decimal::from(overlap_days),
        BillingPeriod::Monthly => overlap
            .split_by_month()
            .into_iter()
            .filter_map(|chunk| {
                let days = chunk.length_in_days()?;
                let divisor = days_in_month(chunk.start().year(), chunk.start().month());
                Some(amount / Decimal::from(divisor) * Decimal::from(days))
            })
            .sum(),
        BillingPeriod::Yearly => overlap
            .split_by_year()
            .into_iter()
            .filter_map(|chunk| {
                let days = chunk.length_in_days()?;
                let divisor = days_in_year(chunk.start().year());
                Some(amount / Decimal::from(divisor) * Decimal::from(days))
            })
            .sum(),
    };

    ProrationResult {
        amount: raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        overlap_days,
    }
}

/// Fraction of the reporting window covered by the charge's validity.
pub fn occupancy(window: &DateInterval, validity: &DateInterval) -> OccupancyResult {
    let window_days = match window.length_in_days() {
        Some(days) if days > 0 => days,
        _ => return OccupancyResult::vacant(),
    };

    let overlap_days = window
        .intersect(validity)
        .and_then(|overlap| overlap.length_in_days())
        .unwrap_or(0);

    OccupancyResult {
        fraction: (overlap_days as f64 / window_days as f64).clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    fn money(raw: &str) -> Decimal {
        raw.parse().expect("valid decimal literal")
    }

    fn march() -> DateInterval {
        DateInterval::calendar_month(2024, 3).expect("march 2024 builds")
    }

    #[test]
    fn monthly_charge_covering_the_whole_month_is_not_prorated() {
        let validity = DateInterval::range(day(2024, 3, 1), day(2024, 3, 31)).expect("builds");
        let result = prorate(&march(), &validity, BillingPeriod::Monthly, money("3100.00"));
        assert_eq!(result.amount, money("3100.00"));
        assert_eq!(result.overlap_days, 31);
    }

    #[test]
    fn monthly_charge_admitted_mid_month_is_prorated_by_actual_days() {
        let validity = DateInterval::from_admission(day(2024, 3, 15), None).expect("builds");
        let result = prorate(&march(), &validity, BillingPeriod::Monthly, money("3100.00"));
        // 3100 / 31 * 17
        assert_eq!(result.amount, money("1700.00"));
        assert_eq!(result.overlap_days, 17);
    }

    #[test]
    fn monthly_proration_splits_across_month_boundaries() {
        let window = DateInterval::range(day(2024, 2, 25), day(2024, 3, 5)).expect("builds");
        let validity = DateInterval::from_admission(day(2024, 1, 1), None).expect("builds");
        let result = prorate(&window, &validity, BillingPeriod::Monthly, money("2900.00"));
        // 5 days of leap February (29 days) plus 5 days of March (31 days).
        let expected = (money("2900.00") / Decimal::from(29) * Decimal::from(5)
            + money("2900.00") / Decimal::from(31) * Decimal::from(5))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        assert_eq!(result.amount, expected);
        assert_eq!(result.overlap_days, 10);
    }

    #[test]
    fn yearly_proration_splits_at_the_year_boundary() {
        let window = DateInterval::range(day(2023, 12, 31), day(2024, 1, 1)).expect("builds");
        let validity = DateInterval::from_admission(day(2023, 1, 1), None).expect("builds");
        let result = prorate(&window, &validity, BillingPeriod::Yearly, money("36500.00"));
        // One day at /365 and one day at /366.
        let expected = (money("36500.00") / Decimal::from(365)
            + money("36500.00") / Decimal::from(366))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        assert_eq!(result.amount, expected);
        assert_eq!(result.overlap_days, 2);
    }

    #[test]
    fn daily_charge_multiplies_by_overlap_days() {
        let window = DateInterval::single_day(day(2024, 4, 1));
        let validity = DateInterval::range(day(2024, 3, 30), day(2024, 4, 2)).expect("builds");
        let result = prorate(&window, &validity, BillingPeriod::Daily, money("100.00"));
        assert_eq!(result.amount, money("100.00"));
        assert_eq!(result.overlap_days, 1);
    }

    #[test]
    fn weekly_charge_divides_by_seven() {
        let window = DateInterval::range(day(2024, 3, 1), day(2024, 3, 7)).expect("builds");
        let validity = DateInterval::from_admission(day(2024, 3, 1), None).expect("builds");
        let result = prorate(&window, &validity, BillingPeriod::Weekly, money("700.00"));
        assert_eq!(result.amount, money("700.00"));

        let partial_window = DateInterval::range(day(2024, 3, 1), day(2024, 3, 3)).expect("builds");
        let partial = prorate(
            &partial_window,
            &validity,
            BillingPeriod::Weekly,
            money("700.00"),
        );
        assert_eq!(partial.amount, money("300.00"));
    }

    #[test]
    fn disjoint_charge_yields_zero_without_error() {
        let validity = DateInterval::range(day(2024, 5, 1), day(2024, 5, 31)).expect("builds");
        let result = prorate(&march(), &validity, BillingPeriod::Monthly, money("3100.00"));
        assert_eq!(result, ProrationResult::zero());
        assert_eq!(occupancy(&march(), &validity), OccupancyResult::vacant());
    }

    #[test]
    fn rounding_is_half_away_from_zero_at_two_decimals() {
        // 1000 / 31 * 7 = 225.80645...
        let validity = DateInterval::range(day(2024, 3, 1), day(2024, 3, 7)).expect("builds");
        let result = prorate(&march(), &validity, BillingPeriod::Monthly, money("1000.00"));
        assert_eq!(result.amount, money("225.81"));
    }

    #[test]
    fn occupancy_is_overlap_share_of_the_window() {
        let validity = DateInterval::from_admission(day(2024, 3, 15), None).expect("builds");
        let result = occupancy(&march(), &validity);
        assert!((result.fraction - 17.0 / 31.0).abs() < 1e-12);
    }

    #[test]
    fn occupancy_is_clamped_to_one_for_full_coverage() {
        let validity = DateInterval::from_admission(day(2020, 1, 1), None).expect("builds");
        let result = occupancy(&march(), &validity);
        assert!((result.fraction - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn full_month_occupancy_of_single_day_window_is_one() {
        let window = DateInterval::single_day(day(2024, 4, 1));
        let validity = DateInterval::range(day(2024, 3, 30), day(2024, 4, 2)).expect("builds");
        let result = occupancy(&window, &validity);
        assert!((result.fraction - 1.0).abs() < f64::EPSILON);
    }
}
