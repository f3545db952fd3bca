//! Customer directory: search, paging and the customer detail window.

use crate::models::{Customer, DateRange, Invoice};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

/// Customers shown per page.
pub const PAGE_SIZE: usize = 10;

/// Days of invoice history shown on the customer detail view.
pub const RECENT_INVOICE_DAYS: u64 = 10;

/// Case-insensitive substring match over name, contact, email and phone.
/// A blank query matches everyone.
pub fn matches_query(customer: &Customer, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    [
        Some(customer.company_name.as_str()),
        Some(customer.contact_person.as_str()),
        customer.email.as_deref(),
        Some(customer.phone.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

pub fn search(customers: Vec<Customer>, query: &str) -> Vec<Customer> {
    customers
        .into_iter()
        .filter(|c| matches_query(c, query))
        .collect()
}

/// One page of a filtered list.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Slice `items` into fixed-size pages. `page` is 1-based; zero is treated
/// as the first page and a page past the end comes back empty.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size);

    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .collect();

    Page {
        items,
        page,
        page_size,
        total,
        total_pages,
    }
}

/// `today - 10 ..= today`.
pub fn recent_window(today: NaiveDate) -> DateRange {
    let from = today
        .checked_sub_days(Days::new(RECENT_INVOICE_DAYS))
        .unwrap_or(NaiveDate::MIN);
    DateRange::between(from, today)
}

/// Sum of `total_amount - amount_paid` over `invoices`.
pub fn outstanding_balance(invoices: &[Invoice]) -> Decimal {
    invoices.iter().map(Invoice::balance_due).sum()
}

/// Customer with their recent invoices.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerDetail {
    pub customer: Customer,
    pub window: DateRange,
    pub recent_invoices: Vec<Invoice>,
    pub outstanding: Decimal,
}

impl CustomerDetail {
    pub fn new(customer: Customer, window: DateRange, recent_invoices: Vec<Invoice>) -> Self {
        let outstanding = outstanding_balance(&recent_invoices);
        Self {
            customer,
            window,
            recent_invoices,
            outstanding,
        }
    }
}
