//! Printable invoice documents.

mod format;
mod layout;
mod render;

pub use format::{format_date, format_inr, format_quantity, truncate_chars};
pub use layout::{LayoutProfile, PrintLayout, UnknownLayout};
pub use render::{render_invoice, status_label, CompanyProfile, InvoiceDocument};

impl From<UnknownLayout> for service_core::error::AppError {
    fn from(err: UnknownLayout) -> Self {
        service_core::error::AppError::BadRequest(anyhow::Error::new(err))
    }
}
