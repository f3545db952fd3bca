use crate::models::InvoiceStatus;
use rust_decimal::Decimal;

/// Outstanding amount. Negative when the invoice was overpaid.
pub fn balance_due(total_amount: Decimal, amount_paid: Decimal) -> Decimal {
    total_amount - amount_paid
}

/// Status as a function of total and paid amount.
///
/// Shared by invoice creation and payment recording so the two can never
/// disagree.
pub fn derive_status(total_amount: Decimal, amount_paid: Decimal) -> InvoiceStatus {
    let balance = balance_due(total_amount, amount_paid);
    if balance <= Decimal::ZERO {
        InvoiceStatus::Paid
    } else if amount_paid > Decimal::ZERO {
        InvoiceStatus::Partial
    } else {
        InvoiceStatus::Unpaid
    }
}
