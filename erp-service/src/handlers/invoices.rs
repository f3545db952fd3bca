use crate::documents::PrintLayout;
use crate::models::{
    CreateInvoiceRequest, DateRange, Invoice, InvoiceStatus, ListInvoicesFilter, PaymentInput,
};
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use service_core::error::AppError;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct InvoiceListParams {
    pub status: Option<InvoiceStatus>,
    pub customer_name: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PrintParams {
    pub layout: Option<String>,
    pub show_company_name: Option<bool>,
}

/// Invoice with its current balance.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub balance_due: Decimal,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            balance_due: invoice.balance_due(),
            invoice,
        }
    }
}

pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<InvoiceListParams>,
) -> Result<Json<Vec<InvoiceResponse>>, AppError> {
    let filter = ListInvoicesFilter {
        status: params.status,
        customer_name: params
            .customer_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        range: DateRange::new(params.from, params.to),
        limit: params.limit,
    };
    let invoices = state.invoices.list(filter).await?;
    Ok(Json(invoices.into_iter().map(InvoiceResponse::from).collect()))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state.invoices.create(request).await?;
    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(invoice))))
}

pub async fn next_invoice_number(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let number = state.invoices.next_number().await?;
    Ok(Json(json!({ "invoice_number": number })))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, AppError> {
    Ok(Json(state.invoices.get(invoice_id).await?.into()))
}

pub async fn record_payment(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(input): Json<PaymentInput>,
) -> Result<Json<InvoiceResponse>, AppError> {
    Ok(Json(state.invoices.record_payment(invoice_id, input).await?.into()))
}

pub async fn print_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Query(params): Query<PrintParams>,
) -> Result<Html<String>, AppError> {
    let layout = match params.layout.as_deref() {
        Some(name) => name.parse::<PrintLayout>()?,
        None => PrintLayout::default(),
    };
    let html = state
        .invoices
        .print(invoice_id, layout, params.show_company_name.unwrap_or(true))
        .await?;
    Ok(Html(html))
}
