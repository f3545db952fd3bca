use super::LifecycleError;
use crate::models::{InvoiceItem, ItemInput};
use rust_decimal::{Decimal, RoundingStrategy};

/// Invoice amounts derived from its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

/// `quantity * rate`, or `None` when the product does not fit a `Decimal`.
pub fn line_amount(quantity: Decimal, rate: Decimal) -> Option<Decimal> {
    quantity.checked_mul(rate)
}

/// Validate requested lines and compute each amount.
pub fn build_items(inputs: &[ItemInput]) -> Result<Vec<InvoiceItem>, LifecycleError> {
    if inputs.is_empty() {
        return Err(LifecycleError::NoItems);
    }

    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| {
            let material = input.material.trim();
            if material.is_empty() {
                return Err(LifecycleError::InvalidItem {
                    index,
                    reason: "material is required",
                });
            }
            if input.quantity <= Decimal::ZERO {
                return Err(LifecycleError::InvalidItem {
                    index,
                    reason: "quantity must be positive",
                });
            }
            if input.rate.is_sign_negative() && !input.rate.is_zero() {
                return Err(LifecycleError::InvalidItem {
                    index,
                    reason: "rate must not be negative",
                });
            }

            let amount = line_amount(input.quantity, input.rate)
                .ok_or(LifecycleError::AmountOverflow)?;

            Ok(InvoiceItem {
                material: material.to_string(),
                quantity: input.quantity,
                rate: input.rate,
                amount,
            })
        })
        .collect()
}

/// Split a tax-inclusive total into subtotal and tax.
///
/// Rates already contain tax, so the total is the plain sum of item amounts
/// and the subtotal is recovered as `total / (1 + tax_rate / 100)`. The
/// subtotal is rounded to paise and tax takes the remainder, keeping
/// `subtotal + tax_amount == total_amount` exact.
pub fn compute_totals(
    items: &[InvoiceItem],
    tax_rate: Decimal,
) -> Result<InvoiceTotals, LifecycleError> {
    if tax_rate.is_sign_negative() && !tax_rate.is_zero() {
        return Err(LifecycleError::NegativeTaxRate(tax_rate));
    }

    let total_amount = items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.amount))
        .ok_or(LifecycleError::AmountOverflow)?;
    let divisor = Decimal::ONE + tax_rate / Decimal::ONE_HUNDRED;
    let subtotal = (total_amount / divisor)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Ok(InvoiceTotals {
        subtotal,
        tax_amount: total_amount - subtotal,
        total_amount,
    })
}
