use super::format::{format_date, format_inr, format_quantity, format_rate, truncate_chars};
use super::layout::{LayoutProfile, PrintLayout};
use crate::models::{Invoice, InvoiceStatus};
use askama::Template;
use serde::Deserialize;
use service_core::error::AppError;

/// Business identity printed in the document header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub gstin: Option<String>,
}

pub struct DocumentLine {
    pub index: usize,
    pub material: String,
    pub quantity: String,
    pub rate: String,
    pub amount: String,
}

#[derive(Template)]
#[template(path = "invoice_print.html")]
pub struct InvoiceDocument<'a> {
    pub layout: LayoutProfile,
    pub show_company_name: bool,
    pub company_name: &'a str,
    pub company_address: Option<&'a str>,
    pub company_phone: Option<&'a str>,
    pub company_gstin: Option<&'a str>,
    pub invoice_number: &'a str,
    pub invoice_date: String,
    pub due_date: String,
    pub customer_name: String,
    pub lines: Vec<DocumentLine>,
    pub subtotal: String,
    pub tax_rate: String,
    pub tax_amount: String,
    pub total_amount: String,
    pub amount_paid: String,
    pub balance_due: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub payment_mode: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub terms_conditions: Option<&'a str>,
}

pub fn status_label(status: InvoiceStatus) -> &'static str {
    match status {
        InvoiceStatus::Paid => "PAID",
        InvoiceStatus::Partial => "PARTIAL",
        InvoiceStatus::Unpaid => "UNPAID",
    }
}

fn limit(text: &str, max: Option<usize>) -> String {
    match max {
        Some(max) => truncate_chars(text, max),
        None => text.to_string(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl<'a> InvoiceDocument<'a> {
    pub fn new(
        invoice: &'a Invoice,
        layout: PrintLayout,
        show_company_name: bool,
        company: &'a CompanyProfile,
    ) -> Self {
        let profile = layout.profile();
        let status = invoice.status();

        let lines = invoice
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| DocumentLine {
                index: i + 1,
                material: limit(&item.material, profile.material_limit),
                quantity: format_quantity(item.quantity),
                rate: format_rate(item.rate),
                amount: format_inr(item.amount),
            })
            .collect();

        Self {
            layout: profile,
            show_company_name,
            company_name: &company.name,
            company_address: non_blank(company.address.as_deref()),
            company_phone: non_blank(company.phone.as_deref()),
            company_gstin: non_blank(company.gstin.as_deref()),
            invoice_number: &invoice.invoice_number,
            invoice_date: format_date(invoice.invoice_date),
            due_date: invoice.due_date.map(format_date).unwrap_or_default(),
            customer_name: limit(&invoice.customer_name, profile.customer_name_limit),
            lines,
            subtotal: format_inr(invoice.subtotal),
            tax_rate: invoice.tax_rate.normalize().to_string(),
            tax_amount: format_inr(invoice.tax_amount),
            total_amount: format_inr(invoice.total_amount),
            amount_paid: format_inr(invoice.amount_paid),
            balance_due: format_inr(invoice.balance_due()),
            status_label: status_label(status),
            status_class: status.as_str(),
            payment_mode: non_blank(invoice.payment_mode.as_deref()),
            notes: non_blank(invoice.notes.as_deref()),
            terms_conditions: non_blank(invoice.terms_conditions.as_deref()),
        }
    }
}

/// Render `invoice` as a self-contained printable HTML page.
pub fn render_invoice(
    invoice: &Invoice,
    layout: PrintLayout,
    show_company_name: bool,
    company: &CompanyProfile,
) -> Result<String, AppError> {
    InvoiceDocument::new(invoice, layout, show_company_name, company)
        .render()
        .map_err(|e| {
            AppError::InternalError(anyhow::anyhow!(
                "Failed to render invoice {}: {}",
                invoice.invoice_number,
                e
            ))
        })
}
