use super::charge::GroupKey;
use super::proration::RecordOutcome;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Fixed revenue distribution brackets used on room-rent master reports.
/// `Vacant` is derived from the occupancy percentage, never counted from
/// records, so the seven shares always total 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueBracket {
    Vacant,
    UnderOneThousand,
    OneToTwoThousand,
    TwoToThreeThousand,
    ThreeToFourThousand,
    FourToFiveThousand,
    OverFiveThousand,
}

impl RevenueBracket {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Vacant,
            Self::UnderOneThousand,
            Self::OneToTwoThousand,
            Self::TwoToThreeThousand,
            Self::ThreeToFourThousand,
            Self::FourToFiveThousand,
            Self::OverFiveThousand,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Vacant => "Vacant",
            Self::UnderOneThousand => "< 1k",
            Self::OneToTwoThousand => "1k-2k",
            Self::TwoToThreeThousand => "2k-3k",
            Self::ThreeToFourThousand => "3k-4k",
            Self::FourToFiveThousand => "4k-5k",
            Self::OverFiveThousand => "> 5k",
        }
    }

    /// Bracket for a positive prorated amount. Boundaries are inclusive on
    /// the lower bound, so exactly 1000 lands in `1k-2k`.
    pub fn classify(amount: Decimal) -> Self {
        if amount < Decimal::from(1000) {
            Self::UnderOneThousand
        } else if amount < Decimal::from(2000) {
            Self::OneToTwoThousand
        } else if amount < Decimal::from(3000) {
            Self::TwoToThreeThousand
        } else if amount < Decimal::from(4000) {
            Self::ThreeToFourThousand
        } else if amount < Decimal::from(5000) {
            Self::FourToFiveThousand
        } else {
            Self::OverFiveThousand
        }
    }
}

/// Per-group revenue and occupancy statistics, built fresh per report.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub group_key: GroupKey,
    pub available_units: u32,
    pub gross_revenue: Decimal,
    pub average_rate: Decimal,
    pub paying_records: usize,
    pub occupancy_percent: f64,
    pub vacancy_percent: f64,
    pub bracket_percentages: HashMap<RevenueBracket, f64>,
}

#[derive(Debug, Default)]
struct GroupAccumulator {
    gross_revenue: Decimal,
    paying_records: usize,
    occupied_fractions: f64,
    bracket_counts: HashMap<RevenueBracket, usize>,
}

/// Folds per-record proration results into per-group summaries.
///
/// Groups listed in `capacities` always appear in the output, all-zero when
/// nothing matched. Records for a group without a known capacity still
/// aggregate revenue, but the unit-denominated percentages stay at zero.
/// Per-record error outcomes are excluded; the caller reports them
/// separately.
pub fn aggregate(
    capacities: &BTreeMap<GroupKey, u32>,
    outcomes: &[RecordOutcome],
) -> BTreeMap<GroupKey, GroupSummary> {
    let mut accumulators: BTreeMap<GroupKey, GroupAccumulator> = BTreeMap::new();

    for entry in outcomes {
        let prorated = match &entry.outcome {
            Ok(prorated) => prorated,
            Err(_) => continue,
        };

        let bucket = accumulators
            .entry(entry.record.group_key.clone())
            .or_default();
        bucket.gross_revenue += prorated.proration.amount;
        bucket.occupied_fractions += prorated.occupancy.fraction;
        if prorated.proration.amount > Decimal::ZERO {
            bucket.paying_records += 1;
            let bracket = RevenueBracket::classify(prorated.proration.amount);
            *bucket.bracket_counts.entry(bracket).or_default() += 1;
        }
    }

    let mut summaries = BTreeMap::new();
    let group_keys: Vec<GroupKey> = capacities
        .keys()
        .chain(accumulators.keys())
        .cloned()
        .collect();

    for group_key in group_keys {
        if summaries.contains_key(&group_key) {
            continue;
        }
        let capacity = capacities.get(&group_key).copied().unwrap_or(0);
        let accumulator = accumulators.remove(&group_key).unwrap_or_default();
        summaries.insert(
            group_key.clone(),
            summarize_group(group_key, capacity, accumulator),
        );
    }

    summaries
}

fn summarize_group(
    group_key: GroupKey,
    available_units: u32,
    accumulator: GroupAccumulator,
) -> GroupSummary {
    let average_rate = if accumulator.paying_records > 0 {
        (accumulator.gross_revenue / Decimal::from(accumulator.paying_records as u64))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };

    // With an unknown capacity there is no unit denominator, so every
    // unit-denominated percentage stays zero, vacancy included.
    let (occupancy_percent, vacancy_percent) = if available_units > 0 {
        let occupancy =
            (accumulator.occupied_fractions / f64::from(available_units) * 100.0).min(100.0);
        (occupancy, 100.0 - occupancy)
    } else {
        (0.0, 0.0)
    };

    let raw_shares: Vec<(RevenueBracket, f64)> = RevenueBracket::ordered()
        .into_iter()
        .filter(|bracket| *bracket != RevenueBracket::Vacant)
        .map(|bracket| {
            let count = accumulator.bracket_counts.get(&bracket).copied().unwrap_or(0);
            let share = if available_units > 0 {
                count as f64 / f64::from(available_units) * 100.0
            } else {
                0.0
            };
            (bracket, share)
        })
        .collect();

    // Over-occupied groups (records beyond capacity) would push the raw
    // count-based shares past the capped occupancy; scale them back so the
    // seven shares still total 100 with the derived `Vacant`.
    let raw_total: f64 = raw_shares.iter().map(|(_, share)| share).sum();
    let scale = if raw_total > occupancy_percent && raw_total > 0.0 {
        occupancy_percent / raw_total
    } else {
        1.0
    };

    let mut bracket_percentages = HashMap::new();
    bracket_percentages.insert(RevenueBracket::Vacant, vacancy_percent);
    for (bracket, share) in raw_shares {
        bracket_percentages.insert(bracket, share * scale);
    }

    GroupSummary {
        group_key,
        available_units,
        gross_revenue: accumulator.gross_revenue,
        average_rate,
        paying_records: accumulator.paying_records,
        occupancy_percent,
        vacancy_percent,
        bracket_percentages,
    }
}
