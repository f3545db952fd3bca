//! Customer directory service.

use crate::directory::{paginate, recent_window, search, CustomerDetail, Page, PAGE_SIZE};
use crate::models::{Customer, CustomerInput, ListInvoicesFilter};
use crate::services::clock::BusinessClock;
use crate::services::store::{with_timeout, ErpStore};
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn ErpStore>,
    timeout: Duration,
    clock: BusinessClock,
}

impl CustomerService {
    pub fn new(store: Arc<dyn ErpStore>, timeout: Duration, clock: BusinessClock) -> Self {
        Self {
            store,
            timeout,
            clock,
        }
    }

    /// Filter the directory by `query` and return page `page` (1-based).
    #[instrument(skip(self))]
    pub async fn list(&self, query: Option<&str>, page: usize) -> Result<Page<Customer>, AppError> {
        let customers =
            with_timeout(self.timeout, "list_customers", self.store.list_customers()).await?;
        let matches = search(customers, query.unwrap_or_default());
        Ok(paginate(matches, page, PAGE_SIZE))
    }

    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn get(&self, customer_id: Uuid) -> Result<Customer, AppError> {
        with_timeout(self.timeout, "get_customer", self.store.get_customer(customer_id))
            .await?
            .ok_or_else(|| not_found(customer_id))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CustomerInput) -> Result<Customer, AppError> {
        let input = input.normalized();
        input.validate()?;

        let customer = with_timeout(
            self.timeout,
            "insert_customer",
            self.store.insert_customer(&input),
        )
        .await?;

        info!(customer_id = %customer.customer_id, "Customer added to directory");
        Ok(customer)
    }

    #[instrument(skip(self, input), fields(customer_id = %customer_id))]
    pub async fn update(&self, customer_id: Uuid, input: CustomerInput) -> Result<Customer, AppError> {
        let input = input.normalized();
        input.validate()?;

        with_timeout(
            self.timeout,
            "update_customer",
            self.store.update_customer(customer_id, &input),
        )
        .await?
        .ok_or_else(|| not_found(customer_id))
    }

    /// Permanently remove a customer. Refused unless `confirmed`.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn delete(&self, customer_id: Uuid, confirmed: bool) -> Result<(), AppError> {
        if !confirmed {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Deleting a customer cannot be undone; repeat the request with confirm=true"
            )));
        }

        let deleted = with_timeout(
            self.timeout,
            "delete_customer",
            self.store.delete_customer(customer_id),
        )
        .await?;
        if !deleted {
            return Err(not_found(customer_id));
        }

        info!("Customer deleted");
        Ok(())
    }

    /// Customer with invoices issued to them over the trailing window and
    /// their outstanding balance.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn detail(&self, customer_id: Uuid) -> Result<CustomerDetail, AppError> {
        let customer = self.get(customer_id).await?;
        let window = recent_window(self.clock.today());

        let filter = ListInvoicesFilter {
            status: None,
            customer_name: Some(customer.company_name.clone()),
            range: window,
            limit: None,
        };
        let invoices =
            with_timeout(self.timeout, "list_invoices", self.store.list_invoices(&filter)).await?;

        Ok(CustomerDetail::new(customer, window, invoices))
    }
}

fn not_found(customer_id: Uuid) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Customer {} not found", customer_id))
}
