//! Report builders.
//!
//! Each builder is a pure function over already-fetched records and a
//! [`DateRange`](crate::models::DateRange); fetching lives in
//! `crate::services::reports`.

pub mod aggregate;
mod accounting;
mod production;
mod quarry;
mod sales;

pub use accounting::{accounting_report, AccountingReport};
pub use aggregate::{Breakdown, GroupTotal, TOP_N};
pub use production::{production_report, ProductionReport};
pub use quarry::{
    quarry_report, BlastingSummary, DrillingSummary, LoadingSummary, QuarryRecords, QuarryReport,
    TransportSummary,
};
pub use sales::{sales_report, SalesReport};
