//! Sequential, per-year invoice numbers: `INV-<year>-<seq>`.
//!
//! The sequence is zero padded to three digits. Past 999 it simply grows
//! (`INV-2025-1000`); numbers stay unique, only the padding stops applying.

/// Prefix shared by every invoice issued in `year`.
pub fn invoice_prefix(year: i32) -> String {
    format!("INV-{}-", year)
}

/// Counter of an invoice number issued in `year`, if it is one.
pub fn parse_sequence(invoice_number: &str, year: i32) -> Option<u32> {
    invoice_number
        .strip_prefix(&invoice_prefix(year))
        .filter(|seq| !seq.is_empty() && seq.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|seq| seq.parse().ok())
}

/// Number following `last`, the most recent number issued this year.
///
/// A missing or unparseable `last` restarts the year at 1.
pub fn next_invoice_number(year: i32, last: Option<&str>) -> String {
    let next = last
        .and_then(|number| parse_sequence(number, year))
        .map_or(1, |seq| seq + 1);
    format!("{}{:03}", invoice_prefix(year), next)
}
