use super::aggregate::{
    average, breakdown, count_where, filter_by_date, grouped_sum, percentage_of, sum_of, top_n,
    Breakdown, GroupTotal, TOP_N,
};
use crate::models::{DateRange, DispatchRecord};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub range: DateRange,
    pub total_quantity: Decimal,
    pub total_revenue: Decimal,
    pub dispatch_count: usize,
    pub delivered_count: usize,
    pub pending_count: usize,
    pub delivery_rate: Decimal,
    pub average_revenue_per_dispatch: Decimal,
    pub quantity_by_material: Vec<Breakdown>,
    pub revenue_by_material: Vec<Breakdown>,
    pub top_customers: Vec<GroupTotal>,
}

pub fn sales_report(dispatches: &[DispatchRecord], range: DateRange) -> SalesReport {
    let in_range = filter_by_date(dispatches, &range, |d| d.dispatch_date);
    let dispatch_count = in_range.len();
    let delivered_count = count_where(in_range.iter().copied(), DispatchRecord::is_delivered);
    let total_revenue = sum_of(in_range.iter().copied(), |d| d.amount);

    let customers = grouped_sum(
        in_range.iter().copied(),
        |d| d.customer_name.as_str(),
        |d| d.amount,
    );

    SalesReport {
        range,
        total_quantity: sum_of(in_range.iter().copied(), |d| d.quantity),
        total_revenue,
        dispatch_count,
        delivered_count,
        pending_count: dispatch_count - delivered_count,
        delivery_rate: percentage_of(
            Decimal::from(delivered_count),
            Decimal::from(dispatch_count),
        ),
        average_revenue_per_dispatch: average(total_revenue, dispatch_count),
        quantity_by_material: breakdown(
            in_range.iter().copied(),
            |d| d.material.as_str(),
            |d| d.quantity,
        ),
        revenue_by_material: breakdown(
            in_range.iter().copied(),
            |d| d.material.as_str(),
            |d| d.amount,
        ),
        top_customers: top_n(&customers, TOP_N),
    }
}
