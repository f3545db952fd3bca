use super::{derive_status, LifecycleError};
use crate::models::{PaymentEvent, PaymentUpdate};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// A payment to apply against an invoice.
#[derive(Debug, Clone)]
pub struct Payment {
    pub amount: Decimal,
    pub mode: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

/// Compute the invoice state after `payment`.
///
/// `history` is append-only; the returned update carries the full new
/// history so the store can write every payment field in one statement.
pub fn apply_payment(
    total_amount: Decimal,
    amount_paid: Decimal,
    history: &[PaymentEvent],
    payment: &Payment,
    recorded_at: DateTime<Utc>,
) -> Result<PaymentUpdate, LifecycleError> {
    if payment.amount <= Decimal::ZERO {
        return Err(LifecycleError::NonPositivePayment(payment.amount));
    }
    let mode = payment.mode.trim();
    if mode.is_empty() {
        return Err(LifecycleError::MissingPaymentMode);
    }

    let new_amount_paid = amount_paid
        .checked_add(payment.amount)
        .ok_or(LifecycleError::AmountOverflow)?;

    let mut payment_history = history.to_vec();
    payment_history.push(PaymentEvent {
        amount: payment.amount,
        mode: mode.to_string(),
        date: payment.date,
        notes: payment
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
        recorded_at,
    });

    Ok(PaymentUpdate {
        amount_paid: new_amount_paid,
        status: derive_status(total_amount, new_amount_paid),
        payment_mode: mode.to_string(),
        payment_date: payment.date,
        payment_history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoicing::balance_due;
    use crate::models::InvoiceStatus;
    use rust_decimal_macros::dec;

    fn payment(amount: Decimal) -> Payment {
        Payment {
            amount,
            mode: "Cash".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn three_payments_settle_invoice() {
        let total = dec!(1000);
        let now = Utc::now();

        let first = apply_payment(total, Decimal::ZERO, &[], &payment(dec!(400)), now).unwrap();
        assert_eq!(first.amount_paid, dec!(400));
        assert_eq!(first.status, InvoiceStatus::Partial);

        let second = apply_payment(
            total,
            first.amount_paid,
            &first.payment_history,
            &payment(dec!(400)),
            now,
        )
        .unwrap();
        assert_eq!(second.amount_paid, dec!(800));
        assert_eq!(second.status, InvoiceStatus::Partial);
        assert_eq!(balance_due(total, second.amount_paid), dec!(200));

        let third = apply_payment(
            total,
            second.amount_paid,
            &second.payment_history,
            &payment(dec!(200)),
            now,
        )
        .unwrap();
        assert_eq!(third.amount_paid, dec!(1000));
        assert_eq!(third.status, InvoiceStatus::Paid);
        assert_eq!(third.payment_history.len(), 3);
    }

    #[test]
    fn history_is_appended_in_order() {
        let now = Utc::now();
        let first = apply_payment(dec!(500), Decimal::ZERO, &[], &payment(dec!(100)), now).unwrap();
        let mut upi = payment(dec!(50));
        upi.mode = " UPI ".to_string();
        upi.notes = Some("  ref 4411 ".to_string());
        let second =
            apply_payment(dec!(500), first.amount_paid, &first.payment_history, &upi, now).unwrap();

        let amounts: Vec<Decimal> = second.payment_history.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![dec!(100), dec!(50)]);
        assert_eq!(second.payment_history[1].mode, "UPI");
        assert_eq!(second.payment_history[1].notes.as_deref(), Some("ref 4411"));
        assert_eq!(second.payment_mode, "UPI");
    }

    #[test]
    fn overpayment_is_accepted_and_marks_paid() {
        let update =
            apply_payment(dec!(100), Decimal::ZERO, &[], &payment(dec!(150)), Utc::now()).unwrap();
        assert_eq!(update.status, InvoiceStatus::Paid);
        assert_eq!(update.amount_paid, dec!(150));
    }

    #[test]
    fn payment_that_overflows_paid_amount_is_rejected() {
        assert_eq!(
            apply_payment(Decimal::MAX, Decimal::MAX, &[], &payment(dec!(1)), Utc::now()),
            Err(LifecycleError::AmountOverflow)
        );
    }

    #[test]
    fn rejects_zero_and_negative_amounts() {
        let now = Utc::now();
        assert_eq!(
            apply_payment(dec!(100), Decimal::ZERO, &[], &payment(Decimal::ZERO), now),
            Err(LifecycleError::NonPositivePayment(Decimal::ZERO))
        );
        assert!(apply_payment(dec!(100), Decimal::ZERO, &[], &payment(dec!(-5)), now).is_err());
    }

    #[test]
    fn rejects_blank_mode() {
        let mut p = payment(dec!(10));
        p.mode = "   ".to_string();
        assert_eq!(
            apply_payment(dec!(100), Decimal::ZERO, &[], &p, Utc::now()),
            Err(LifecycleError::MissingPaymentMode)
        );
    }
}
