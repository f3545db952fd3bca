//! Services module for erp-service.

pub mod clock;
pub mod customers;
pub mod database;
pub mod invoices;
pub mod metrics;
pub mod reports;
pub mod store;

pub use clock::BusinessClock;
pub use customers::CustomerService;
pub use database::Database;
pub use invoices::InvoiceService;
pub use metrics::{get_metrics, init_metrics};
pub use reports::ReportService;
pub use store::{with_timeout, ErpStore};
