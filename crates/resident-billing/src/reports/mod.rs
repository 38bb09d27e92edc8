mod charge;
mod interval;
pub mod proration;
mod summary;
pub mod views;

pub use charge::{BillingPeriod, ChargeRecord, GroupKey, UnrecognizedBillingPeriod};
pub use interval::{DateInterval, IntervalError};
pub use proration::{
    BatchResult, OccupancyResult, ProratedCharge, ProrationEngine, ProrationResult, RecordOutcome,
    WindowShape,
};
pub use summary::{aggregate, GroupSummary, RevenueBracket};
