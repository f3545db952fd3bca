pub mod customers;
pub mod health;
pub mod invoices;
pub mod reports;

pub use health::{health_check, metrics_handler, readiness_check};
