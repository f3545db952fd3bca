//! Report service: fetch source records, then aggregate.

use crate::models::DateRange;
use crate::reports::{
    accounting_report, production_report, quarry_report, sales_report, AccountingReport,
    ProductionReport, QuarryRecords, QuarryReport, SalesReport,
};
use crate::services::metrics::REPORTS_TOTAL;
use crate::services::store::{with_timeout, ErpStore};
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn ErpStore>,
    timeout: Duration,
}

impl ReportService {
    pub fn new(store: Arc<dyn ErpStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    #[instrument(skip(self))]
    pub async fn accounting(&self, range: DateRange) -> Result<AccountingReport, AppError> {
        check_range(&range)?;
        let transactions = with_timeout(
            self.timeout,
            "list_transactions",
            self.store.list_transactions(range),
        )
        .await?;
        REPORTS_TOTAL.with_label_values(&["accounting"]).inc();
        Ok(accounting_report(&transactions, range))
    }

    #[instrument(skip(self))]
    pub async fn production(&self, range: DateRange) -> Result<ProductionReport, AppError> {
        check_range(&range)?;
        let records = with_timeout(
            self.timeout,
            "list_production",
            self.store.list_production(range),
        )
        .await?;
        REPORTS_TOTAL.with_label_values(&["production"]).inc();
        Ok(production_report(&records, range))
    }

    /// Runs the four quarry reads concurrently. The first failure (or
    /// timeout) abandons the whole report.
    #[instrument(skip(self))]
    pub async fn quarry(&self, range: DateRange) -> Result<QuarryReport, AppError> {
        check_range(&range)?;
        let (drilling, blasting, loading, transport) = futures::try_join!(
            with_timeout(self.timeout, "list_drilling", self.store.list_drilling(range)),
            with_timeout(self.timeout, "list_blasting", self.store.list_blasting(range)),
            with_timeout(self.timeout, "list_loading", self.store.list_loading(range)),
            with_timeout(self.timeout, "list_transport", self.store.list_transport(range)),
        )?;

        debug!(
            drilling = drilling.len(),
            blasting = blasting.len(),
            loading = loading.len(),
            transport = transport.len(),
            "Quarry sources fetched"
        );

        let records = QuarryRecords {
            drilling,
            blasting,
            loading,
            transport,
        };
        REPORTS_TOTAL.with_label_values(&["quarry"]).inc();
        Ok(quarry_report(&records, range))
    }

    #[instrument(skip(self))]
    pub async fn sales(&self, range: DateRange) -> Result<SalesReport, AppError> {
        check_range(&range)?;
        let dispatches = with_timeout(
            self.timeout,
            "list_dispatches",
            self.store.list_dispatches(range),
        )
        .await?;
        REPORTS_TOTAL.with_label_values(&["sales"]).inc();
        Ok(sales_report(&dispatches, range))
    }
}

fn check_range(range: &DateRange) -> Result<(), AppError> {
    if range.is_inverted() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "'from' must not be after 'to'"
        )));
    }
    Ok(())
}
