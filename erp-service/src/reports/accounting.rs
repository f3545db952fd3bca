use super::aggregate::{
    average, breakdown, count_where, filter_by_date, grouped_sum, percentage_of, sum_of, top_n,
    with_percentages, Breakdown, GroupTotal, TOP_N,
};
use crate::models::{AccountingTransaction, DateRange, TransactionType};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AccountingReport {
    pub range: DateRange,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_profit: Decimal,
    pub profit_margin: Decimal,
    pub income_count: usize,
    pub expense_count: usize,
    pub average_transaction: Decimal,
    pub expense_by_category: Vec<Breakdown>,
    pub top_expense_categories: Vec<GroupTotal>,
    pub income_by_category: Vec<Breakdown>,
    pub by_payment_method: Vec<Breakdown>,
}

pub fn accounting_report(
    transactions: &[AccountingTransaction],
    range: DateRange,
) -> AccountingReport {
    let in_range = filter_by_date(transactions, &range, |t| t.transaction_date);
    let income: Vec<&AccountingTransaction> = in_range
        .iter()
        .copied()
        .filter(|t| t.is(TransactionType::Income))
        .collect();
    let expenses: Vec<&AccountingTransaction> = in_range
        .iter()
        .copied()
        .filter(|t| t.is(TransactionType::Expense))
        .collect();

    let total_income = sum_of(income.iter().copied(), |t| t.amount);
    let total_expense = sum_of(expenses.iter().copied(), |t| t.amount);
    let net_profit = total_income - total_expense;

    let expense_groups = grouped_sum(
        expenses.iter().copied(),
        |t| t.category.as_str(),
        |t| t.amount,
    );
    let top_expense_categories = top_n(&expense_groups, TOP_N);
    let expense_by_category = with_percentages(expense_groups, total_expense);

    AccountingReport {
        range,
        total_income,
        total_expense,
        net_profit,
        profit_margin: percentage_of(net_profit, total_income),
        income_count: count_where(in_range.iter().copied(), |t| t.is(TransactionType::Income)),
        expense_count: expenses.len(),
        average_transaction: average(
            sum_of(in_range.iter().copied(), |t| t.amount),
            in_range.len(),
        ),
        expense_by_category,
        top_expense_categories,
        income_by_category: breakdown(
            income.iter().copied(),
            |t| t.category.as_str(),
            |t| t.amount,
        ),
        by_payment_method: breakdown(
            in_range.iter().copied(),
            |t| t.payment_method.as_str(),
            |t| t.amount,
        ),
    }
}
