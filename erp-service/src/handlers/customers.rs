use crate::directory::{CustomerDetail, Page};
use crate::models::{Customer, CustomerInput};
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CustomerListParams {
    pub q: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirm: bool,
}

pub async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<CustomerListParams>,
) -> Result<Json<Page<Customer>>, AppError> {
    let page = params.page.unwrap_or(1);
    let customers = state.customers.list(params.q.as_deref(), page).await?;
    Ok(Json(customers))
}

pub async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<CustomerInput>,
) -> Result<impl IntoResponse, AppError> {
    let customer = state.customers.create(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<Customer>, AppError> {
    Ok(Json(state.customers.get(customer_id).await?))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<Customer>, AppError> {
    Ok(Json(state.customers.update(customer_id, input).await?))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, AppError> {
    state.customers.delete(customer_id, params.confirm).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Invoices issued to the customer over the trailing window, with the
/// outstanding balance across them.
pub async fn customer_invoices(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<CustomerDetail>, AppError> {
    Ok(Json(state.customers.detail(customer_id).await?))
}
