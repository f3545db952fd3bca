use crate::models::DateRange;
use crate::reports::{AccountingReport, ProductionReport, QuarryReport, SalesReport};
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use service_core::error::AppError;

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`, both optional and inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl From<RangeParams> for DateRange {
    fn from(params: RangeParams) -> Self {
        DateRange::new(params.from, params.to)
    }
}

pub async fn accounting_report(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<AccountingReport>, AppError> {
    Ok(Json(state.reports.accounting(params.into()).await?))
}

pub async fn production_report(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<ProductionReport>, AppError> {
    Ok(Json(state.reports.production(params.into()).await?))
}

pub async fn quarry_report(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<QuarryReport>, AppError> {
    Ok(Json(state.reports.quarry(params.into()).await?))
}

pub async fn sales_report(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<SalesReport>, AppError> {
    Ok(Json(state.reports.sales(params.into()).await?))
}
