//! Read-only report source records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Inclusive date range; an absent bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }
}

/// Income or expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

/// Accounting ledger row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccountingTransaction {
    pub transaction_id: Uuid,
    pub transaction_date: NaiveDate,
    pub transaction_type: String,
    pub category: String,
    pub amount: Decimal,
    pub payment_method: String,
    pub description: Option<String>,
}

impl AccountingTransaction {
    pub fn is(&self, kind: TransactionType) -> bool {
        self.transaction_type.eq_ignore_ascii_case(kind.as_str())
    }
}

/// Crusher output for one material and shift.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProductionRecord {
    pub production_id: Uuid,
    pub production_date: NaiveDate,
    pub material: String,
    pub quantity: Decimal,
    pub shift: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DrillingRecord {
    pub drilling_id: Uuid,
    pub drilling_date: NaiveDate,
    pub location: String,
    pub holes_drilled: i32,
    pub total_depth_m: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlastingRecord {
    pub blasting_id: Uuid,
    pub blast_date: NaiveDate,
    pub location: String,
    pub explosive_kg: Decimal,
    pub quantity_blasted: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoadingRecord {
    pub loading_id: Uuid,
    pub loading_date: NaiveDate,
    pub material: String,
    pub equipment: String,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransportRecord {
    pub transport_id: Uuid,
    pub transport_date: NaiveDate,
    pub vehicle_number: String,
    pub material: String,
    pub trips: i32,
    pub quantity: Decimal,
}

/// Shipment of material to a customer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DispatchRecord {
    pub dispatch_id: Uuid,
    pub dispatch_date: NaiveDate,
    pub customer_name: String,
    pub material: String,
    pub quantity: Decimal,
    pub amount: Decimal,
    pub delivery_status: String,
}

impl DispatchRecord {
    pub fn is_delivered(&self) -> bool {
        self.delivery_status.eq_ignore_ascii_case("delivered")
    }
}
