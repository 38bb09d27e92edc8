use super::interval::DateInterval;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Granularity a recurring charge amount is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl BillingPeriod {
    pub const fn ordered() -> [Self; 4] {
        [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }

    /// Resolves a persisted period code. Accepts the spelled-out codes and
    /// the legacy single-letter codes still present in older rate records.
    pub fn parse(code: &str) -> Result<Self, UnrecognizedBillingPeriod> {
        match code.trim().to_ascii_lowercase().as_str() {
            "daily" | "d" => Ok(Self::Daily),
            "weekly" | "w" => Ok(Self::Weekly),
            "monthly" | "m" => Ok(Self::Monthly),
            "yearly" | "annual" | "y" => Ok(Self::Yearly),
            _ => Err(UnrecognizedBillingPeriod {
                code: code.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized billing period code '{code}'")]
pub struct UnrecognizedBillingPeriod {
    pub code: String,
}

/// Aggregation key for a facility, apartment building, or region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey(pub String);

impl GroupKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A recurring charge as fetched by upstream persistence collaborators.
/// The engine reads these, it never creates or stores them.
#[derive(Debug, Clone, Serialize)]
pub struct ChargeRecord {
    pub charge_id: String,
    pub group_key: GroupKey,
    /// Non-negative currency amount, denominated by `period_code`.
    pub amount: Decimal,
    /// Raw period code as persisted; resolved per record during proration.
    pub period_code: String,
    /// Validity of the charge, open-ended while the resident is not
    /// discharged.
    pub validity: DateInterval,
}
