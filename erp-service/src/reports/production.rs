use super::aggregate::{
    average, breakdown, filter_by_date, grouped_sum, sum_of, top_n, with_percentages, Breakdown,
    GroupTotal, TOP_N,
};
use crate::models::{DateRange, ProductionRecord};
use rust_decimal::Decimal;
use serde::Serialize;

const UNASSIGNED_SHIFT: &str = "Unassigned";

#[derive(Debug, Clone, Serialize)]
pub struct ProductionReport {
    pub range: DateRange,
    pub total_quantity: Decimal,
    pub record_count: usize,
    pub average_per_record: Decimal,
    pub by_material: Vec<Breakdown>,
    pub top_materials: Vec<GroupTotal>,
    pub by_shift: Vec<Breakdown>,
}

pub fn production_report(records: &[ProductionRecord], range: DateRange) -> ProductionReport {
    let in_range = filter_by_date(records, &range, |r| r.production_date);
    let total_quantity = sum_of(in_range.iter().copied(), |r| r.quantity);

    let material_groups = grouped_sum(
        in_range.iter().copied(),
        |r| r.material.as_str(),
        |r| r.quantity,
    );

    ProductionReport {
        range,
        total_quantity,
        record_count: in_range.len(),
        average_per_record: average(total_quantity, in_range.len()),
        top_materials: top_n(&material_groups, TOP_N),
        by_material: with_percentages(material_groups, total_quantity),
        by_shift: breakdown(
            in_range.iter().copied(),
            |r| r.shift.as_deref().unwrap_or(UNASSIGNED_SHIFT),
            |r| r.quantity,
        ),
    }
}
