use crate::infra::{deserialize_date, deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use resident_billing::error::AppError;
use resident_billing::reports::views::OccupancyReportView;
use resident_billing::reports::{
    aggregate, ChargeRecord, DateInterval, GroupKey, ProrationEngine,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum WindowParam {
    SingleDay {
        #[serde(deserialize_with = "deserialize_date")]
        date: NaiveDate,
    },
    CalendarMonth {
        year: i32,
        month: u32,
    },
    Range {
        #[serde(deserialize_with = "deserialize_date")]
        from: NaiveDate,
        #[serde(deserialize_with = "deserialize_date")]
        to: NaiveDate,
    },
}

impl WindowParam {
    fn resolve(&self) -> Result<DateInterval, AppError> {
        let window = match self {
            WindowParam::SingleDay { date } => DateInterval::single_day(*date),
            WindowParam::CalendarMonth { year, month } => {
                DateInterval::calendar_month(*year, *month)?
            }
            WindowParam::Range { from, to } => DateInterval::range(*from, *to)?,
        };
        Ok(window)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChargeRecordParam {
    pub(crate) charge_id: String,
    pub(crate) group_key: String,
    pub(crate) amount: Decimal,
    pub(crate) period_code: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub(crate) admitted: NaiveDate,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) discharged: Option<NaiveDate>,
}

impl ChargeRecordParam {
    fn into_record(self) -> Result<ChargeRecord, AppError> {
        let validity = DateInterval::from_admission(self.admitted, self.discharged)?;
        Ok(ChargeRecord {
            charge_id: self.charge_id,
            group_key: GroupKey::new(self.group_key),
            amount: self.amount,
            period_code: self.period_code,
            validity,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OccupancyReportRequest {
    pub(crate) window: WindowParam,
    #[serde(default)]
    pub(crate) capacities: BTreeMap<String, u32>,
    pub(crate) records: Vec<ChargeRecordParam>,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/reports/occupancy",
            post(occupancy_report_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn occupancy_report_endpoint(
    Json(payload): Json<OccupancyReportRequest>,
) -> Result<Json<OccupancyReportView>, AppError> {
    let window = payload.window.resolve()?;

    let records = payload
        .records
        .into_iter()
        .map(ChargeRecordParam::into_record)
        .collect::<Result<Vec<_>, AppError>>()?;

    let capacities: BTreeMap<GroupKey, u32> = payload
        .capacities
        .into_iter()
        .map(|(key, units)| (GroupKey::new(key), units))
        .collect();

    let batch = ProrationEngine::prorate_batch(window, records)?;
    let summaries = aggregate(&capacities, &batch.outcomes);

    Ok(Json(OccupancyReportView::build(&batch, &summaries)))
}
