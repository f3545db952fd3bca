use rust_decimal::Decimal;
use service_core::error::AppError;
use thiserror::Error;

/// Rejections raised while building or paying an invoice.
#[derive(Debug, Error, PartialEq)]
pub enum LifecycleError {
    #[error("invoice must have at least one item")]
    NoItems,

    #[error("item {index}: {reason}")]
    InvalidItem { index: usize, reason: &'static str },

    #[error("tax rate must not be negative (got {0})")]
    NegativeTaxRate(Decimal),

    #[error("customer name is required")]
    MissingCustomer,

    #[error("payment amount must be positive (got {0})")]
    NonPositivePayment(Decimal),

    #[error("payment mode is required")]
    MissingPaymentMode,

    #[error("amount is too large")]
    AmountOverflow,
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        AppError::BadRequest(anyhow::Error::new(err))
    }
}
