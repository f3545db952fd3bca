//! Store contract consumed by the application services.

use crate::models::{
    AccountingTransaction, BlastingRecord, Customer, CustomerInput, DateRange, DispatchRecord,
    DrillingRecord, Invoice, ListInvoicesFilter, LoadingRecord, NewInvoice, PaymentUpdate,
    ProductionRecord, TransportRecord,
};
use crate::services::metrics::ERRORS_TOTAL;
use async_trait::async_trait;
use rust_decimal::Decimal;
use service_core::error::AppError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

/// Persistence operations. Every call either returns its full result or an
/// error; there is no partial-success shape.
#[async_trait]
pub trait ErpStore: Send + Sync {
    // Customers
    async fn insert_customer(&self, input: &CustomerInput) -> Result<Customer, AppError>;
    async fn get_customer(&self, customer_id: Uuid) -> Result<Option<Customer>, AppError>;
    /// All customers ordered by company name.
    async fn list_customers(&self) -> Result<Vec<Customer>, AppError>;
    async fn update_customer(
        &self,
        customer_id: Uuid,
        input: &CustomerInput,
    ) -> Result<Option<Customer>, AppError>;
    /// Returns `false` when no row matched.
    async fn delete_customer(&self, customer_id: Uuid) -> Result<bool, AppError>;

    // Invoices
    /// Fails with `AppError::Conflict` if the invoice number is taken.
    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, AppError>;
    async fn get_invoice(&self, invoice_id: Uuid) -> Result<Option<Invoice>, AppError>;
    /// Newest first.
    async fn list_invoices(&self, filter: &ListInvoicesFilter) -> Result<Vec<Invoice>, AppError>;
    /// Highest invoice number starting with `prefix`.
    async fn latest_invoice_number(&self, prefix: &str) -> Result<Option<String>, AppError>;
    /// Write `update` only if the stored `amount_paid` still equals
    /// `expected_amount_paid`. `None` means the row changed (or vanished)
    /// since it was read.
    async fn apply_payment(
        &self,
        invoice_id: Uuid,
        expected_amount_paid: Decimal,
        update: &PaymentUpdate,
    ) -> Result<Option<Invoice>, AppError>;

    // Report sources
    async fn list_transactions(
        &self,
        range: DateRange,
    ) -> Result<Vec<AccountingTransaction>, AppError>;
    async fn list_production(&self, range: DateRange) -> Result<Vec<ProductionRecord>, AppError>;
    async fn list_drilling(&self, range: DateRange) -> Result<Vec<DrillingRecord>, AppError>;
    async fn list_blasting(&self, range: DateRange) -> Result<Vec<BlastingRecord>, AppError>;
    async fn list_loading(&self, range: DateRange) -> Result<Vec<LoadingRecord>, AppError>;
    async fn list_transport(&self, range: DateRange) -> Result<Vec<TransportRecord>, AppError>;
    async fn list_dispatches(&self, range: DateRange) -> Result<Vec<DispatchRecord>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// Run one store call under `limit`. Expiry becomes `AppError::Timeout`.
pub async fn with_timeout<T, F>(
    limit: Duration,
    operation: &'static str,
    call: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            let err = AppError::Timeout(format!(
                "{} did not complete within {}ms",
                operation,
                limit.as_millis()
            ));
            ERRORS_TOTAL.with_label_values(&[err.kind()]).inc();
            warn!(
                operation,
                timeout_ms = limit.as_millis() as u64,
                "Store call timed out"
            );
            Err(err)
        }
    }
}
