//! Invoice lifecycle rules.
//!
//! Everything here is pure: the services in `crate::services` fetch state,
//! call into these functions and persist the result.

mod error;
mod numbering;
mod payment;
mod status;
mod totals;

pub use error::LifecycleError;
pub use numbering::{invoice_prefix, next_invoice_number, parse_sequence};
pub use payment::{apply_payment, Payment};
pub use status::{balance_due, derive_status};
pub use totals::{build_items, compute_totals, line_amount, InvoiceTotals};
