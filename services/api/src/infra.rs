use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Report month as `YYYY-MM`, e.g. `2024-03`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReportMonth {
    pub(crate) year: i32,
    pub(crate) month: u32,
}

pub(crate) fn parse_month(raw: &str) -> Result<ReportMonth, String> {
    let raw = raw.trim();
    let (year, month) = raw
        .split_once('-')
        .ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM"))?;
    let year = year
        .parse::<i32>()
        .map_err(|err| format!("failed to parse year in '{raw}' ({err})"))?;
    let month = month
        .parse::<u32>()
        .map_err(|err| format!("failed to parse month in '{raw}' ({err})"))?;
    Ok(ReportMonth { year, month })
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
