//! Common test utilities for erp-service integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use erp_service::documents::CompanyProfile;
use erp_service::models::{
    AccountingTransaction, BlastingRecord, CreateInvoiceRequest, Customer, CustomerInput,
    CustomerType, DateRange, DispatchRecord, DrillingRecord, Invoice, ItemInput,
    ListInvoicesFilter, LoadingRecord, NewInvoice, PaymentInput, PaymentTerms, PaymentUpdate,
    ProductionRecord, TransportRecord,
};
use erp_service::services::{BusinessClock, ErpStore};
use erp_service::startup::AppState;
use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::types::Json;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::sync::Barrier;
use uuid::Uuid;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,erp_service=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const TEST_TIMEOUT: Duration = Duration::from_millis(200);

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The day every test treats as "today".
pub fn today() -> NaiveDate {
    date(2025, 6, 15)
}

#[derive(Default)]
struct Tables {
    customers: Vec<Customer>,
    invoices: Vec<Invoice>,
    transactions: Vec<AccountingTransaction>,
    production: Vec<ProductionRecord>,
    drilling: Vec<DrillingRecord>,
    blasting: Vec<BlastingRecord>,
    loading: Vec<LoadingRecord>,
    transport: Vec<TransportRecord>,
    dispatches: Vec<DispatchRecord>,
}

/// In-memory `ErpStore` with knobs for latency, failures and interleaving.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    delay: Mutex<Option<Duration>>,
    failing: Mutex<HashSet<&'static str>>,
    read_barrier: Mutex<Option<Arc<Barrier>>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every call sleeps for `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Calls to `operation` fail with a database error.
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    /// `get_invoice` waits until `parties` readers have all read before
    /// returning, so concurrent payments observe the same `amount_paid`.
    pub fn sync_invoice_reads(&self, parties: usize) {
        *self.read_barrier.lock().unwrap() = Some(Arc::new(Barrier::new(parties)));
    }

    pub fn invoice_count(&self) -> usize {
        self.tables.lock().unwrap().invoices.len()
    }

    pub fn seed_invoice(&self, invoice: Invoice) {
        self.tables.lock().unwrap().invoices.push(invoice);
    }

    pub fn seed_transactions(&self, rows: Vec<AccountingTransaction>) {
        self.tables.lock().unwrap().transactions.extend(rows);
    }

    pub fn seed_production(&self, rows: Vec<ProductionRecord>) {
        self.tables.lock().unwrap().production.extend(rows);
    }

    pub fn seed_drilling(&self, rows: Vec<DrillingRecord>) {
        self.tables.lock().unwrap().drilling.extend(rows);
    }

    pub fn seed_blasting(&self, rows: Vec<BlastingRecord>) {
        self.tables.lock().unwrap().blasting.extend(rows);
    }

    pub fn seed_loading(&self, rows: Vec<LoadingRecord>) {
        self.tables.lock().unwrap().loading.extend(rows);
    }

    pub fn seed_transport(&self, rows: Vec<TransportRecord>) {
        self.tables.lock().unwrap().transport.extend(rows);
    }

    pub fn seed_dispatches(&self, rows: Vec<DispatchRecord>) {
        self.tables.lock().unwrap().dispatches.extend(rows);
    }

    async fn enter(&self, operation: &'static str) -> Result<(), AppError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(operation) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "{} failed: connection refused",
                operation
            )));
        }
        Ok(())
    }

    fn in_range<T: Clone>(
        rows: &[T],
        range: DateRange,
        date_of: impl Fn(&T) -> NaiveDate,
    ) -> Vec<T> {
        rows.iter()
            .filter(|r| range.contains(date_of(r)))
            .cloned()
            .collect()
    }
}

fn customer_from(input: &CustomerInput, customer_id: Uuid, created_utc: chrono::DateTime<Utc>) -> Customer {
    Customer {
        customer_id,
        company_name: input.company_name.clone(),
        contact_person: input.contact_person.clone(),
        email: input.email.clone(),
        phone: input.phone.clone(),
        address_line1: input.address_line1.clone(),
        address_line2: input.address_line2.clone(),
        city: input.city.clone(),
        state: input.state.clone(),
        postal_code: input.postal_code.clone(),
        tax_id: input.tax_id.clone(),
        customer_type: input.customer_type.as_str().to_string(),
        payment_terms: input.payment_terms.as_str().to_string(),
        credit_limit: input.credit_limit,
        notes: input.notes.clone(),
        created_utc,
        updated_utc: Utc::now(),
    }
}

#[async_trait]
impl ErpStore for MemoryStore {
    async fn insert_customer(&self, input: &CustomerInput) -> Result<Customer, AppError> {
        self.enter("insert_customer").await?;
        let customer = customer_from(input, Uuid::new_v4(), Utc::now());
        self.tables.lock().unwrap().customers.push(customer.clone());
        Ok(customer)
    }

    async fn get_customer(&self, customer_id: Uuid) -> Result<Option<Customer>, AppError> {
        self.enter("get_customer").await?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .customers
            .iter()
            .find(|c| c.customer_id == customer_id)
            .cloned())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        self.enter("list_customers").await?;
        let mut customers = self.tables.lock().unwrap().customers.clone();
        customers.sort_by_key(|c| c.company_name.to_lowercase());
        Ok(customers)
    }

    async fn update_customer(
        &self,
        customer_id: Uuid,
        input: &CustomerInput,
    ) -> Result<Option<Customer>, AppError> {
        self.enter("update_customer").await?;
        let mut tables = self.tables.lock().unwrap();
        let Some(slot) = tables
            .customers
            .iter_mut()
            .find(|c| c.customer_id == customer_id)
        else {
            return Ok(None);
        };
        *slot = customer_from(input, customer_id, slot.created_utc);
        Ok(Some(slot.clone()))
    }

    async fn delete_customer(&self, customer_id: Uuid) -> Result<bool, AppError> {
        self.enter("delete_customer").await?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.customers.len();
        tables.customers.retain(|c| c.customer_id != customer_id);
        Ok(tables.customers.len() < before)
    }

    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, AppError> {
        self.enter("insert_invoice").await?;
        let mut tables = self.tables.lock().unwrap();
        if tables
            .invoices
            .iter()
            .any(|i| i.invoice_number == invoice.invoice_number)
        {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Invoice number '{}' already exists",
                invoice.invoice_number
            )));
        }

        let now = Utc::now();
        let created = Invoice {
            invoice_id: Uuid::new_v4(),
            invoice_number: invoice.invoice_number.clone(),
            customer_name: invoice.customer_name.clone(),
            invoice_date: invoice.invoice_date,
            due_date: invoice.due_date,
            items: Json(invoice.items.clone()),
            subtotal: invoice.subtotal,
            tax_rate: invoice.tax_rate,
            tax_amount: invoice.tax_amount,
            total_amount: invoice.total_amount,
            status: invoice.status.as_str().to_string(),
            amount_paid: invoice.amount_paid,
            payment_mode: invoice.payment_mode.clone(),
            payment_date: invoice.payment_date,
            payment_history: Json(invoice.payment_history.clone()),
            notes: invoice.notes.clone(),
            terms_conditions: invoice.terms_conditions.clone(),
            created_utc: now,
            updated_utc: now,
        };
        tables.invoices.push(created.clone());
        Ok(created)
    }

    async fn get_invoice(&self, invoice_id: Uuid) -> Result<Option<Invoice>, AppError> {
        self.enter("get_invoice").await?;
        let found = self
            .tables
            .lock()
            .unwrap()
            .invoices
            .iter()
            .find(|i| i.invoice_id == invoice_id)
            .cloned();

        let barrier = self.read_barrier.lock().unwrap().clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }

        Ok(found)
    }

    async fn list_invoices(&self, filter: &ListInvoicesFilter) -> Result<Vec<Invoice>, AppError> {
        self.enter("list_invoices").await?;
        let mut invoices: Vec<Invoice> = self
            .tables
            .lock()
            .unwrap()
            .invoices
            .iter()
            .filter(|i| filter.status.map_or(true, |s| i.status == s.as_str()))
            .filter(|i| {
                filter
                    .customer_name
                    .as_deref()
                    .map_or(true, |name| i.customer_name == name)
            })
            .filter(|i| filter.range.contains(i.invoice_date))
            .cloned()
            .collect();

        invoices.sort_by(|a, b| {
            b.invoice_date
                .cmp(&a.invoice_date)
                .then(b.created_utc.cmp(&a.created_utc))
        });
        if let Some(limit) = filter.limit {
            invoices.truncate(usize::try_from(limit).unwrap_or(0));
        }
        Ok(invoices)
    }

    async fn latest_invoice_number(&self, prefix: &str) -> Result<Option<String>, AppError> {
        self.enter("latest_invoice_number").await?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .invoices
            .iter()
            .map(|i| i.invoice_number.as_str())
            .filter(|n| n.starts_with(prefix))
            .max_by(|a, b| a.len().cmp(&b.len()).then(a.cmp(b)))
            .map(str::to_string))
    }

    async fn apply_payment(
        &self,
        invoice_id: Uuid,
        expected_amount_paid: Decimal,
        update: &PaymentUpdate,
    ) -> Result<Option<Invoice>, AppError> {
        self.enter("apply_payment").await?;
        let mut tables = self.tables.lock().unwrap();
        let Some(invoice) = tables
            .invoices
            .iter_mut()
            .find(|i| i.invoice_id == invoice_id && i.amount_paid == expected_amount_paid)
        else {
            return Ok(None);
        };

        invoice.amount_paid = update.amount_paid;
        invoice.status = update.status.as_str().to_string();
        invoice.payment_mode = Some(update.payment_mode.clone());
        invoice.payment_date = Some(update.payment_date);
        invoice.payment_history = Json(update.payment_history.clone());
        invoice.updated_utc = Utc::now();
        Ok(Some(invoice.clone()))
    }

    async fn list_transactions(
        &self,
        range: DateRange,
    ) -> Result<Vec<AccountingTransaction>, AppError> {
        self.enter("list_transactions").await?;
        let tables = self.tables.lock().unwrap();
        Ok(Self::in_range(&tables.transactions, range, |r| r.transaction_date))
    }

    async fn list_production(&self, range: DateRange) -> Result<Vec<ProductionRecord>, AppError> {
        self.enter("list_production").await?;
        let tables = self.tables.lock().unwrap();
        Ok(Self::in_range(&tables.production, range, |r| r.production_date))
    }

    async fn list_drilling(&self, range: DateRange) -> Result<Vec<DrillingRecord>, AppError> {
        self.enter("list_drilling").await?;
        let tables = self.tables.lock().unwrap();
        Ok(Self::in_range(&tables.drilling, range, |r| r.drilling_date))
    }

    async fn list_blasting(&self, range: DateRange) -> Result<Vec<BlastingRecord>, AppError> {
        self.enter("list_blasting").await?;
        let tables = self.tables.lock().unwrap();
        Ok(Self::in_range(&tables.blasting, range, |r| r.blast_date))
    }

    async fn list_loading(&self, range: DateRange) -> Result<Vec<LoadingRecord>, AppError> {
        self.enter("list_loading").await?;
        let tables = self.tables.lock().unwrap();
        Ok(Self::in_range(&tables.loading, range, |r| r.loading_date))
    }

    async fn list_transport(&self, range: DateRange) -> Result<Vec<TransportRecord>, AppError> {
        self.enter("list_transport").await?;
        let tables = self.tables.lock().unwrap();
        Ok(Self::in_range(&tables.transport, range, |r| r.transport_date))
    }

    async fn list_dispatches(&self, range: DateRange) -> Result<Vec<DispatchRecord>, AppError> {
        self.enter("list_dispatches").await?;
        let tables = self.tables.lock().unwrap();
        Ok(Self::in_range(&tables.dispatches, range, |r| r.dispatch_date))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.enter("health_check").await
    }
}

pub fn company() -> CompanyProfile {
    CompanyProfile {
        name: "Sree Murugan Blue Metals".to_string(),
        address: Some("NH 44, Krishnagiri".to_string()),
        phone: Some("+91 98400 12345".to_string()),
        gstin: Some("33ABCDE1234F1Z5".to_string()),
    }
}

/// Application state over `store` with "today" pinned to [`today`].
pub fn app_state(store: Arc<MemoryStore>) -> AppState {
    init_tracing();
    AppState::new(
        store,
        TEST_TIMEOUT,
        BusinessClock::Pinned(today()),
        company(),
    )
}

pub fn customer_input(company_name: &str) -> CustomerInput {
    CustomerInput {
        company_name: company_name.to_string(),
        contact_person: "R. Kumar".to_string(),
        email: Some("accounts@example.in".to_string()),
        phone: "9840012345".to_string(),
        address_line1: None,
        address_line2: None,
        city: Some("Coimbatore".to_string()),
        state: Some("Tamil Nadu".to_string()),
        postal_code: None,
        tax_id: None,
        customer_type: CustomerType::Contractor,
        payment_terms: PaymentTerms::Net30,
        credit_limit: Decimal::new(500_000, 0),
        notes: None,
    }
}

pub fn invoice_request(customer_name: &str, items: Vec<(&str, Decimal, Decimal)>) -> CreateInvoiceRequest {
    CreateInvoiceRequest {
        customer_name: customer_name.to_string(),
        invoice_date: None,
        due_date: None,
        items: items
            .into_iter()
            .map(|(material, quantity, rate)| ItemInput {
                material: material.to_string(),
                quantity,
                rate,
            })
            .collect(),
        tax_rate: Decimal::new(5, 0),
        initial_payment: None,
        notes: None,
        terms_conditions: None,
    }
}

pub fn payment(amount: Decimal, mode: &str) -> PaymentInput {
    PaymentInput {
        amount,
        mode: mode.to_string(),
        date: None,
        notes: None,
    }
}
