//! Invoice lifecycle service: numbering, creation, payments and printing.

use crate::documents::{render_invoice, CompanyProfile, PrintLayout};
use crate::invoicing::{
    self, build_items, compute_totals, derive_status, invoice_prefix, next_invoice_number,
    LifecycleError, Payment,
};
use crate::models::{
    CreateInvoiceRequest, Invoice, ListInvoicesFilter, NewInvoice, PaymentInput,
};
use crate::services::clock::BusinessClock;
use crate::services::metrics::{ERRORS_TOTAL, INVOICES_CREATED_TOTAL, PAYMENTS_RECORDED_TOTAL};
use crate::services::store::{with_timeout, ErpStore};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Default and maximum page size for invoice listings.
pub const DEFAULT_INVOICE_LIMIT: i64 = 100;
pub const MAX_INVOICE_LIMIT: i64 = 500;

#[derive(Clone)]
pub struct InvoiceService {
    store: Arc<dyn ErpStore>,
    timeout: Duration,
    clock: BusinessClock,
    company: Arc<CompanyProfile>,
}

impl InvoiceService {
    pub fn new(
        store: Arc<dyn ErpStore>,
        timeout: Duration,
        clock: BusinessClock,
        company: Arc<CompanyProfile>,
    ) -> Self {
        Self {
            store,
            timeout,
            clock,
            company,
        }
    }

    /// Number the next invoice created today would receive.
    #[instrument(skip(self))]
    pub async fn next_number(&self) -> Result<String, AppError> {
        let year = self.clock.today().year();
        let prefix = invoice_prefix(year);
        let latest = with_timeout(
            self.timeout,
            "latest_invoice_number",
            self.store.latest_invoice_number(&prefix),
        )
        .await?;
        Ok(next_invoice_number(year, latest.as_deref()))
    }

    #[instrument(skip(self, request), fields(customer_name = %request.customer_name))]
    pub async fn create(&self, request: CreateInvoiceRequest) -> Result<Invoice, AppError> {
        let customer_name = request.customer_name.trim();
        if customer_name.is_empty() {
            return Err(LifecycleError::MissingCustomer.into());
        }

        let items = build_items(&request.items)?;
        let totals = compute_totals(&items, request.tax_rate)?;
        let invoice_date = request.invoice_date.unwrap_or_else(|| self.clock.today());

        let (status, amount_paid, payment_mode, payment_date, payment_history) =
            match &request.initial_payment {
                Some(input) => {
                    let payment = to_payment(input, invoice_date);
                    let update = invoicing::apply_payment(
                        totals.total_amount,
                        Decimal::ZERO,
                        &[],
                        &payment,
                        Utc::now(),
                    )?;
                    (
                        update.status,
                        update.amount_paid,
                        Some(update.payment_mode),
                        Some(update.payment_date),
                        update.payment_history,
                    )
                }
                None => (
                    derive_status(totals.total_amount, Decimal::ZERO),
                    Decimal::ZERO,
                    None,
                    None,
                    Vec::new(),
                ),
            };

        let invoice_number = self.next_number().await?;

        let new_invoice = NewInvoice {
            invoice_number,
            customer_name: customer_name.to_string(),
            invoice_date,
            due_date: request.due_date,
            items,
            subtotal: totals.subtotal,
            tax_rate: request.tax_rate,
            tax_amount: totals.tax_amount,
            total_amount: totals.total_amount,
            status,
            amount_paid,
            payment_mode,
            payment_date,
            payment_history,
            notes: clean(request.notes),
            terms_conditions: clean(request.terms_conditions),
        };

        let invoice = with_timeout(
            self.timeout,
            "insert_invoice",
            self.store.insert_invoice(&new_invoice),
        )
        .await
        .inspect_err(|e| {
            if matches!(e, AppError::Conflict(_)) {
                ERRORS_TOTAL.with_label_values(&[e.kind()]).inc();
            }
        })?;

        INVOICES_CREATED_TOTAL
            .with_label_values(&[invoice.status().as_str()])
            .inc();

        info!(
            invoice_id = %invoice.invoice_id,
            invoice_number = %invoice.invoice_number,
            total_amount = %invoice.total_amount,
            status = invoice.status().as_str(),
            "Invoice issued"
        );

        Ok(invoice)
    }

    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn get(&self, invoice_id: Uuid) -> Result<Invoice, AppError> {
        with_timeout(self.timeout, "get_invoice", self.store.get_invoice(invoice_id))
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice {} not found", invoice_id)))
    }

    #[instrument(skip(self, filter))]
    pub async fn list(&self, mut filter: ListInvoicesFilter) -> Result<Vec<Invoice>, AppError> {
        if filter.range.is_inverted() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "'from' must not be after 'to'"
            )));
        }
        filter.limit = Some(
            filter
                .limit
                .unwrap_or(DEFAULT_INVOICE_LIMIT)
                .clamp(1, MAX_INVOICE_LIMIT),
        );

        with_timeout(self.timeout, "list_invoices", self.store.list_invoices(&filter)).await
    }

    /// Apply a payment with a conditional write keyed on the `amount_paid`
    /// that was read. A concurrent payment in between yields `Conflict`.
    #[instrument(skip(self, input), fields(invoice_id = %invoice_id, amount = %input.amount))]
    pub async fn record_payment(
        &self,
        invoice_id: Uuid,
        input: PaymentInput,
    ) -> Result<Invoice, AppError> {
        let invoice = self.get(invoice_id).await?;
        let payment = to_payment(&input, self.clock.today());

        let update = invoicing::apply_payment(
            invoice.total_amount,
            invoice.amount_paid,
            &invoice.payment_history,
            &payment,
            Utc::now(),
        )?;

        if update.amount_paid > invoice.total_amount {
            warn!(
                invoice_number = %invoice.invoice_number,
                total_amount = %invoice.total_amount,
                amount_paid = %update.amount_paid,
                "Payment exceeds invoice total"
            );
        }

        let updated = with_timeout(
            self.timeout,
            "apply_payment",
            self.store
                .apply_payment(invoice_id, invoice.amount_paid, &update),
        )
        .await?
        .ok_or_else(|| {
            ERRORS_TOTAL.with_label_values(&["conflict"]).inc();
            AppError::Conflict(anyhow::anyhow!(
                "Invoice {} was modified concurrently, reload and retry",
                invoice.invoice_number
            ))
        })?;

        PAYMENTS_RECORDED_TOTAL
            .with_label_values(&[update.payment_mode.as_str()])
            .inc();

        info!(
            invoice_number = %updated.invoice_number,
            amount_paid = %updated.amount_paid,
            status = updated.status().as_str(),
            "Payment recorded"
        );

        Ok(updated)
    }

    #[instrument(skip(self), fields(invoice_id = %invoice_id, layout = %layout))]
    pub async fn print(
        &self,
        invoice_id: Uuid,
        layout: PrintLayout,
        show_company_name: bool,
    ) -> Result<String, AppError> {
        let invoice = self.get(invoice_id).await?;
        render_invoice(&invoice, layout, show_company_name, &self.company)
    }
}

fn to_payment(input: &PaymentInput, default_date: chrono::NaiveDate) -> Payment {
    Payment {
        amount: input.amount,
        mode: input.mode.clone(),
        date: input.date.unwrap_or(default_date),
        notes: input.notes.clone(),
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
