//! PostgreSQL store for erp-service.

use crate::models::{
    AccountingTransaction, BlastingRecord, Customer, CustomerInput, DateRange, DispatchRecord,
    DrillingRecord, Invoice, ListInvoicesFilter, LoadingRecord, NewInvoice, PaymentUpdate,
    ProductionRecord, TransportRecord,
};
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::store::ErpStore;
use async_trait::async_trait;
use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

const CUSTOMER_COLUMNS: &str = "customer_id, company_name, contact_person, email, phone, \
    address_line1, address_line2, city, state, postal_code, tax_id, customer_type, \
    payment_terms, credit_limit, notes, created_utc, updated_utc";

const INVOICE_COLUMNS: &str = "invoice_id, invoice_number, customer_name, invoice_date, \
    due_date, items, subtotal, tax_rate, tax_amount, total_amount, status, amount_paid, \
    payment_mode, payment_date, payment_history, notes, terms_conditions, created_utc, \
    updated_utc";

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "erp-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Rows of `table` whose `date_column` falls in `range`, oldest first.
    async fn list_in_range<T>(
        &self,
        operation: &'static str,
        table: &str,
        columns: &str,
        date_column: &str,
        range: DateRange,
    ) -> Result<Vec<T>, AppError>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let timer = DB_QUERY_DURATION
            .with_label_values(&[operation])
            .start_timer();

        let sql = format!(
            "SELECT {columns} FROM {table} \
             WHERE ($1::date IS NULL OR {date_column} >= $1) \
               AND ($2::date IS NULL OR {date_column} <= $2) \
             ORDER BY {date_column}"
        );
        let rows = sqlx::query_as::<_, T>(&sql)
            .bind(range.from)
            .bind(range.to)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to {}: {}", operation, e))
            })?;

        timer.observe_duration();

        Ok(rows)
    }
}

#[async_trait]
impl ErpStore for Database {
    // -------------------------------------------------------------------------
    // Customer Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self, input), fields(company_name = %input.company_name))]
    async fn insert_customer(&self, input: &CustomerInput) -> Result<Customer, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_customer"])
            .start_timer();

        let sql = format!(
            r#"
            INSERT INTO customers (customer_id, company_name, contact_person, email, phone,
                address_line1, address_line2, city, state, postal_code, tax_id,
                customer_type, payment_terms, credit_limit, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        );
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.company_name)
            .bind(&input.contact_person)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address_line1)
            .bind(&input.address_line2)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.postal_code)
            .bind(&input.tax_id)
            .bind(input.customer_type.as_str())
            .bind(input.payment_terms.as_str())
            .bind(input.credit_limit)
            .bind(&input.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to create customer: {}", e))
            })?;

        timer.observe_duration();

        info!(customer_id = %customer.customer_id, "Customer created");

        Ok(customer)
    }

    #[instrument(skip(self), fields(customer_id = %customer_id))]
    async fn get_customer(&self, customer_id: Uuid) -> Result<Option<Customer>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_customer"])
            .start_timer();

        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE customer_id = $1");
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to get customer: {}", e))
            })?;

        timer.observe_duration();

        Ok(customer)
    }

    #[instrument(skip(self))]
    async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_customers"])
            .start_timer();

        let sql = format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY lower(company_name), customer_id"
        );
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list customers: {}", e))
            })?;

        timer.observe_duration();

        Ok(customers)
    }

    #[instrument(skip(self, input), fields(customer_id = %customer_id))]
    async fn update_customer(
        &self,
        customer_id: Uuid,
        input: &CustomerInput,
    ) -> Result<Option<Customer>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_customer"])
            .start_timer();

        let sql = format!(
            r#"
            UPDATE customers
            SET company_name = $2, contact_person = $3, email = $4, phone = $5,
                address_line1 = $6, address_line2 = $7, city = $8, state = $9,
                postal_code = $10, tax_id = $11, customer_type = $12,
                payment_terms = $13, credit_limit = $14, notes = $15,
                updated_utc = NOW()
            WHERE customer_id = $1
            RETURNING {CUSTOMER_COLUMNS}
            "#
        );
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(customer_id)
            .bind(&input.company_name)
            .bind(&input.contact_person)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address_line1)
            .bind(&input.address_line2)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.postal_code)
            .bind(&input.tax_id)
            .bind(input.customer_type.as_str())
            .bind(input.payment_terms.as_str())
            .bind(input.credit_limit)
            .bind(&input.notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to update customer: {}", e))
            })?;

        timer.observe_duration();

        Ok(customer)
    }

    #[instrument(skip(self), fields(customer_id = %customer_id))]
    async fn delete_customer(&self, customer_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_customer"])
            .start_timer();

        let result = sqlx::query("DELETE FROM customers WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete customer: {}", e))
            })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Invoice Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self, invoice), fields(invoice_number = %invoice.invoice_number))]
    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_invoice"])
            .start_timer();

        let sql = format!(
            r#"
            INSERT INTO invoices (invoice_id, invoice_number, customer_name, invoice_date,
                due_date, items, subtotal, tax_rate, tax_amount, total_amount, status,
                amount_paid, payment_mode, payment_date, payment_history, notes,
                terms_conditions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {INVOICE_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Invoice>(&sql)
            .bind(Uuid::new_v4())
            .bind(&invoice.invoice_number)
            .bind(&invoice.customer_name)
            .bind(invoice.invoice_date)
            .bind(invoice.due_date)
            .bind(Json(&invoice.items))
            .bind(invoice.subtotal)
            .bind(invoice.tax_rate)
            .bind(invoice.tax_amount)
            .bind(invoice.total_amount)
            .bind(invoice.status.as_str())
            .bind(invoice.amount_paid)
            .bind(&invoice.payment_mode)
            .bind(invoice.payment_date)
            .bind(Json(&invoice.payment_history))
            .bind(&invoice.notes)
            .bind(&invoice.terms_conditions)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    AppError::Conflict(anyhow::anyhow!(
                        "Invoice number '{}' already exists",
                        invoice.invoice_number
                    ))
                }
                _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create invoice: {}", e)),
            })?;

        timer.observe_duration();

        info!(
            invoice_id = %created.invoice_id,
            invoice_number = %created.invoice_number,
            "Invoice created"
        );

        Ok(created)
    }

    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    async fn get_invoice(&self, invoice_id: Uuid) -> Result<Option<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_invoice"])
            .start_timer();

        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE invoice_id = $1");
        let invoice = sqlx::query_as::<_, Invoice>(&sql)
            .bind(invoice_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice: {}", e))
            })?;

        timer.observe_duration();

        Ok(invoice)
    }

    #[instrument(skip(self, filter))]
    async fn list_invoices(&self, filter: &ListInvoicesFilter) -> Result<Vec<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_invoices"])
            .start_timer();

        let sql = format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR customer_name = $2)
              AND ($3::date IS NULL OR invoice_date >= $3)
              AND ($4::date IS NULL OR invoice_date <= $4)
            ORDER BY invoice_date DESC, created_utc DESC
            LIMIT $5
            "#
        );
        let invoices = sqlx::query_as::<_, Invoice>(&sql)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.customer_name.as_deref())
            .bind(filter.range.from)
            .bind(filter.range.to)
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e))
            })?;

        timer.observe_duration();

        Ok(invoices)
    }

    #[instrument(skip(self))]
    async fn latest_invoice_number(&self, prefix: &str) -> Result<Option<String>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["latest_invoice_number"])
            .start_timer();

        // Longer numbers sort after shorter ones so INV-2025-1000 beats INV-2025-999.
        let number = sqlx::query_scalar::<_, String>(
            r#"
            SELECT invoice_number
            FROM invoices
            WHERE left(invoice_number, length($1)) = $1
            ORDER BY length(invoice_number) DESC, invoice_number DESC
            LIMIT 1
            "#,
        )
        .bind(prefix)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to read latest invoice number: {}", e))
        })?;

        timer.observe_duration();

        Ok(number)
    }

    #[instrument(skip(self, update), fields(invoice_id = %invoice_id, status = update.status.as_str()))]
    async fn apply_payment(
        &self,
        invoice_id: Uuid,
        expected_amount_paid: Decimal,
        update: &PaymentUpdate,
    ) -> Result<Option<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["apply_payment"])
            .start_timer();

        let sql = format!(
            r#"
            UPDATE invoices
            SET amount_paid = $3, status = $4, payment_mode = $5, payment_date = $6,
                payment_history = $7, updated_utc = NOW()
            WHERE invoice_id = $1 AND amount_paid = $2
            RETURNING {INVOICE_COLUMNS}
            "#
        );
        let invoice = sqlx::query_as::<_, Invoice>(&sql)
            .bind(invoice_id)
            .bind(expected_amount_paid)
            .bind(update.amount_paid)
            .bind(update.status.as_str())
            .bind(&update.payment_mode)
            .bind(update.payment_date)
            .bind(Json(&update.payment_history))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to record payment: {}", e))
            })?;

        timer.observe_duration();

        Ok(invoice)
    }

    // -------------------------------------------------------------------------
    // Report Sources
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    async fn list_transactions(
        &self,
        range: DateRange,
    ) -> Result<Vec<AccountingTransaction>, AppError> {
        self.list_in_range(
            "list_transactions",
            "accounting_transactions",
            "transaction_id, transaction_date, transaction_type, category, amount, \
             payment_method, description",
            "transaction_date",
            range,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_production(&self, range: DateRange) -> Result<Vec<ProductionRecord>, AppError> {
        self.list_in_range(
            "list_production",
            "production_records",
            "production_id, production_date, material, quantity, shift",
            "production_date",
            range,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_drilling(&self, range: DateRange) -> Result<Vec<DrillingRecord>, AppError> {
        self.list_in_range(
            "list_drilling",
            "drilling_records",
            "drilling_id, drilling_date, location, holes_drilled, total_depth_m",
            "drilling_date",
            range,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_blasting(&self, range: DateRange) -> Result<Vec<BlastingRecord>, AppError> {
        self.list_in_range(
            "list_blasting",
            "blasting_records",
            "blasting_id, blast_date, location, explosive_kg, quantity_blasted",
            "blast_date",
            range,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_loading(&self, range: DateRange) -> Result<Vec<LoadingRecord>, AppError> {
        self.list_in_range(
            "list_loading",
            "loading_records",
            "loading_id, loading_date, material, equipment, quantity",
            "loading_date",
            range,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_transport(&self, range: DateRange) -> Result<Vec<TransportRecord>, AppError> {
        self.list_in_range(
            "list_transport",
            "transport_records",
            "transport_id, transport_date, vehicle_number, material, trips, quantity",
            "transport_date",
            range,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_dispatches(&self, range: DateRange) -> Result<Vec<DispatchRecord>, AppError> {
        self.list_in_range(
            "list_dispatches",
            "dispatch_records",
            "dispatch_id, dispatch_date, customer_name, material, quantity, amount, \
             delivery_status",
            "dispatch_date",
            range,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }
}
