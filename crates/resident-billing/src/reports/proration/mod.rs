mod engine;
mod strategy;

pub use engine::{BatchResult, ProratedCharge, ProrationEngine, RecordOutcome, WindowShape};
pub use strategy::{occupancy, prorate, OccupancyResult, ProrationResult};
