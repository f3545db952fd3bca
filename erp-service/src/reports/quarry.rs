use super::aggregate::{
    average, breakdown, filter_by_date, grouped_sum, sum_of, top_n, with_percentages, Breakdown,
    GroupTotal, TOP_N,
};
use crate::models::{BlastingRecord, DateRange, DrillingRecord, LoadingRecord, TransportRecord};
use rust_decimal::Decimal;
use serde::Serialize;

/// The four quarry datasets, fetched together.
#[derive(Debug, Clone, Default)]
pub struct QuarryRecords {
    pub drilling: Vec<DrillingRecord>,
    pub blasting: Vec<BlastingRecord>,
    pub loading: Vec<LoadingRecord>,
    pub transport: Vec<TransportRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrillingSummary {
    pub records: usize,
    pub holes_drilled: i64,
    pub total_depth_m: Decimal,
    pub average_depth_per_hole_m: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlastingSummary {
    pub blasts: usize,
    pub explosive_kg: Decimal,
    pub quantity_blasted: Decimal,
    pub by_location: Vec<Breakdown>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadingSummary {
    pub records: usize,
    pub total_quantity: Decimal,
    pub by_material: Vec<Breakdown>,
    pub by_equipment: Vec<Breakdown>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransportSummary {
    pub records: usize,
    pub total_trips: i64,
    pub total_quantity: Decimal,
    pub by_vehicle: Vec<Breakdown>,
    pub top_vehicles: Vec<GroupTotal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuarryReport {
    pub range: DateRange,
    pub drilling: DrillingSummary,
    pub blasting: BlastingSummary,
    pub loading: LoadingSummary,
    pub transport: TransportSummary,
}

pub fn quarry_report(records: &QuarryRecords, range: DateRange) -> QuarryReport {
    QuarryReport {
        range,
        drilling: drilling_summary(&records.drilling, &range),
        blasting: blasting_summary(&records.blasting, &range),
        loading: loading_summary(&records.loading, &range),
        transport: transport_summary(&records.transport, &range),
    }
}

fn drilling_summary(records: &[DrillingRecord], range: &DateRange) -> DrillingSummary {
    let in_range = filter_by_date(records, range, |r| r.drilling_date);
    let holes_drilled: i64 = in_range.iter().map(|r| i64::from(r.holes_drilled)).sum();
    let total_depth_m = sum_of(in_range.iter().copied(), |r| r.total_depth_m);

    DrillingSummary {
        records: in_range.len(),
        holes_drilled,
        total_depth_m,
        average_depth_per_hole_m: average(
            total_depth_m,
            usize::try_from(holes_drilled).unwrap_or(0),
        ),
    }
}

fn blasting_summary(records: &[BlastingRecord], range: &DateRange) -> BlastingSummary {
    let in_range = filter_by_date(records, range, |r| r.blast_date);

    BlastingSummary {
        blasts: in_range.len(),
        explosive_kg: sum_of(in_range.iter().copied(), |r| r.explosive_kg),
        quantity_blasted: sum_of(in_range.iter().copied(), |r| r.quantity_blasted),
        by_location: breakdown(
            in_range.iter().copied(),
            |r| r.location.as_str(),
            |r| r.quantity_blasted,
        ),
    }
}

fn loading_summary(records: &[LoadingRecord], range: &DateRange) -> LoadingSummary {
    let in_range = filter_by_date(records, range, |r| r.loading_date);

    LoadingSummary {
        records: in_range.len(),
        total_quantity: sum_of(in_range.iter().copied(), |r| r.quantity),
        by_material: breakdown(
            in_range.iter().copied(),
            |r| r.material.as_str(),
            |r| r.quantity,
        ),
        by_equipment: breakdown(
            in_range.iter().copied(),
            |r| r.equipment.as_str(),
            |r| r.quantity,
        ),
    }
}

fn transport_summary(records: &[TransportRecord], range: &DateRange) -> TransportSummary {
    let in_range = filter_by_date(records, range, |r| r.transport_date);
    let total_quantity = sum_of(in_range.iter().copied(), |r| r.quantity);
    let vehicles = grouped_sum(
        in_range.iter().copied(),
        |r| r.vehicle_number.as_str(),
        |r| r.quantity,
    );

    TransportSummary {
        records: in_range.len(),
        total_trips: in_range.iter().map(|r| i64::from(r.trips)).sum(),
        total_quantity,
        top_vehicles: top_n(&vehicles, TOP_N),
        by_vehicle: with_percentages(vehicles, total_quantity),
    }
}
