//! Invoice model for erp-service.

use super::DateRange;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Invoice payment status, always derived from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Unpaid,
    Partial,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "unpaid",
            InvoiceStatus::Partial => "partial",
            InvoiceStatus::Paid => "paid",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "partial" => InvoiceStatus::Partial,
            "paid" => InvoiceStatus::Paid,
            _ => InvoiceStatus::Unpaid,
        }
    }
}

/// Line on an invoice. `rate` is tax-inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub material: String,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
}

/// One payment applied to an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub amount: Decimal,
    pub mode: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Invoice document.
///
/// `customer_name` is copied at creation time and is not a reference to the
/// customer row, so later renames leave issued invoices untouched.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub invoice_id: Uuid,
    pub invoice_number: String,
    pub customer_name: String,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub items: Json<Vec<InvoiceItem>>,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub status: String,
    pub amount_paid: Decimal,
    pub payment_mode: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub payment_history: Json<Vec<PaymentEvent>>,
    pub notes: Option<String>,
    pub terms_conditions: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Invoice {
    pub fn status(&self) -> InvoiceStatus {
        InvoiceStatus::from_string(&self.status)
    }

    pub fn balance_due(&self) -> Decimal {
        crate::invoicing::balance_due(self.total_amount, self.amount_paid)
    }
}

/// Fully computed invoice ready to be stored.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub customer_name: String,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub items: Vec<InvoiceItem>,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub status: InvoiceStatus,
    pub amount_paid: Decimal,
    pub payment_mode: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub payment_history: Vec<PaymentEvent>,
    pub notes: Option<String>,
    pub terms_conditions: Option<String>,
}

/// Payment fields written together in a single conditional update.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentUpdate {
    pub amount_paid: Decimal,
    pub status: InvoiceStatus,
    pub payment_mode: String,
    pub payment_date: NaiveDate,
    pub payment_history: Vec<PaymentEvent>,
}

/// Filter parameters for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct ListInvoicesFilter {
    pub status: Option<InvoiceStatus>,
    pub customer_name: Option<String>,
    pub range: DateRange,
    /// `None` returns every match.
    pub limit: Option<i64>,
}

/// Requested line, before amounts are computed.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
    pub material: String,
    pub quantity: Decimal,
    pub rate: Decimal,
}

/// Payment as entered by the user.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentInput {
    pub amount: Decimal,
    pub mode: String,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Input for creating an invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceRequest {
    pub customer_name: String,
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub items: Vec<ItemInput>,
    #[serde(default)]
    pub tax_rate: Decimal,
    pub initial_payment: Option<PaymentInput>,
    pub notes: Option<String>,
    pub terms_conditions: Option<String>,
}
