use super::charge::GroupKey;
use super::proration::{BatchResult, RecordOutcome};
use super::summary::{GroupSummary, RevenueBracket};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct BracketShareEntry {
    pub bracket: RevenueBracket,
    pub bracket_label: &'static str,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSummaryView {
    pub group_key: String,
    pub available_units: u32,
    pub gross_revenue: Decimal,
    pub average_rate: Decimal,
    pub paying_records: usize,
    pub occupancy_percent: f64,
    pub vacancy_percent: f64,
    pub revenue_brackets: Vec<BracketShareEntry>,
}

impl GroupSummary {
    pub fn to_view(&self) -> GroupSummaryView {
        let revenue_brackets = RevenueBracket::ordered()
            .into_iter()
            .map(|bracket| BracketShareEntry {
                bracket,
                bracket_label: bracket.label(),
                percent: self
                    .bracket_percentages
                    .get(&bracket)
                    .copied()
                    .unwrap_or_default(),
            })
            .collect();

        GroupSummaryView {
            group_key: self.group_key.to_string(),
            available_units: self.available_units,
            gross_revenue: self.gross_revenue,
            average_rate: self.average_rate,
            paying_records: self.paying_records,
            occupancy_percent: self.occupancy_percent,
            vacancy_percent: self.vacancy_percent,
            revenue_brackets,
        }
    }
}

/// A record the batch could not process, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct RecordErrorView {
    pub charge_id: String,
    pub group_key: String,
    pub error: String,
}

impl RecordOutcome {
    pub fn to_error_view(&self) -> Option<RecordErrorView> {
        self.outcome.as_ref().err().map(|err| RecordErrorView {
            charge_id: self.record.charge_id.clone(),
            group_key: self.record.group_key.to_string(),
            error: err.to_string(),
        })
    }
}

/// Report-level view combining the window, group summaries, and any
/// records skipped over a bad period code.
#[derive(Debug, Clone, Serialize)]
pub struct OccupancyReportView {
    pub window_start: NaiveDate,
    pub window_end: Option<NaiveDate>,
    pub window_shape: &'static str,
    pub groups: Vec<GroupSummaryView>,
    pub record_errors: Vec<RecordErrorView>,
}

impl OccupancyReportView {
    pub fn build(batch: &BatchResult, summaries: &BTreeMap<GroupKey, GroupSummary>) -> Self {
        Self {
            window_start: batch.window.start(),
            window_end: batch.window.end(),
            window_shape: batch.shape.label(),
            groups: summaries.values().map(GroupSummary::to_view).collect(),
            record_errors: batch
                .outcomes
                .iter()
                .filter_map(RecordOutcome::to_error_view)
                .collect(),
        }
    }
}
