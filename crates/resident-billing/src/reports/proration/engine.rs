use super::super::charge::{BillingPeriod, ChargeRecord, UnrecognizedBillingPeriod};
use super::super::interval::{month_end, DateInterval, IntervalError};
use super::strategy::{self, OccupancyResult, ProrationResult};
use chrono::Datelike;
use serde::Serialize;
use tracing::debug;

/// Shape of the reporting window, classified once per batch. The shape
/// drives the occupancy denominator (a month-shaped window divides by the
/// month's actual day count) and report labeling; the proration math is
/// shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowShape {
    SingleDay,
    CalendarMonth,
    Range,
}

impl WindowShape {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SingleDay => "Single Day",
            Self::CalendarMonth => "Calendar Month",
            Self::Range => "Date Range",
        }
    }

    pub fn classify(window: &DateInterval) -> Self {
        let end = match window.end() {
            Some(end) => end,
            None => return Self::Range,
        };

        if window.start() == end {
            return Self::SingleDay;
        }

        let is_month = window.start().day() == 1
            && window.start().month() == end.month()
            && window.start().year() == end.year()
            && end == month_end(window.start());
        if is_month {
            Self::CalendarMonth
        } else {
            Self::Range
        }
    }
}

/// Proration and occupancy for one successfully processed record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProratedCharge {
    pub period: BillingPeriod,
    pub proration: ProrationResult,
    pub occupancy: OccupancyResult,
}

/// Per-record outcome; a record with a bad period code carries its error
/// here instead of aborting the batch.
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    pub record: ChargeRecord,
    pub outcome: Result<ProratedCharge, UnrecognizedBillingPeriod>,
}

/// Batch output, one entry per input record in input order.
#[derive(Debug)]
pub struct BatchResult {
    pub window: DateInterval,
    pub shape: WindowShape,
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchResult {
    pub fn failed_records(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.outcomes.iter().filter(|entry| entry.outcome.is_err())
    }
}

/// Stateless dispatcher prorating a batch of charge records against one
/// reporting window.
pub struct ProrationEngine;

impl ProrationEngine {
    /// Prorates every record against `window`, preserving input order so
    /// callers can re-associate results with resident and bed identities.
    ///
    /// The window must be bounded; a record with an unrecognized period
    /// code is reported in its own outcome and the batch continues.
    pub fn prorate_batch(
        window: DateInterval,
        records: Vec<ChargeRecord>,
    ) -> Result<BatchResult, IntervalError> {
        if !window.is_bounded() {
            return Err(IntervalError::OpenWindow);
        }

        let shape = WindowShape::classify(&window);
        debug!(
            shape = shape.label(),
            records = records.len(),
            "classified reporting window"
        );

        let outcomes = records
            .into_iter()
            .map(|record| {
                let outcome = BillingPeriod::parse(&record.period_code).map(|period| {
                    let proration =
                        strategy::prorate(&window, &record.validity, period, record.amount);
                    let occupancy = strategy::occupancy(&window, &record.validity);
                    ProratedCharge {
                        period,
                        proration,
                        occupancy,
                    }
                });

                if let Err(err) = &outcome {
                    debug!(charge_id = %record.charge_id, %err, "skipping unprocessable record");
                }

                RecordOutcome { record, outcome }
            })
            .collect();

        Ok(BatchResult {
            window,
            shape,
            outcomes,
        })
    }
}
