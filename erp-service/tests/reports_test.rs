//! Report service tests over seeded source records.

mod common;

use common::{app_state, date, MemoryStore};
use erp_service::models::{
    AccountingTransaction, BlastingRecord, DateRange, DispatchRecord, DrillingRecord,
    LoadingRecord, ProductionRecord, TransportRecord,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

fn june() -> DateRange {
    DateRange::between(date(2025, 6, 1), date(2025, 6, 30))
}

fn transaction(day: u32, kind: &str, category: &str, amount: Decimal) -> AccountingTransaction {
    AccountingTransaction {
        transaction_id: Uuid::new_v4(),
        transaction_date: date(2025, 6, day),
        transaction_type: kind.to_string(),
        category: category.to_string(),
        amount,
        payment_method: "Cash".to_string(),
        description: None,
    }
}

fn seed_quarry(store: &MemoryStore) {
    store.seed_drilling(vec![
        DrillingRecord {
            drilling_id: Uuid::new_v4(),
            drilling_date: date(2025, 6, 2),
            location: "North Face".to_string(),
            holes_drilled: 12,
            total_depth_m: dec!(72),
        },
        DrillingRecord {
            drilling_id: Uuid::new_v4(),
            drilling_date: date(2025, 6, 9),
            location: "North Face".to_string(),
            holes_drilled: 8,
            total_depth_m: dec!(48),
        },
        DrillingRecord {
            drilling_id: Uuid::new_v4(),
            drilling_date: date(2025, 5, 28),
            location: "South Pit".to_string(),
            holes_drilled: 30,
            total_depth_m: dec!(180),
        },
    ]);
    store.seed_blasting(vec![BlastingRecord {
        blasting_id: Uuid::new_v4(),
        blast_date: date(2025, 6, 3),
        location: "North Face".to_string(),
        explosive_kg: dec!(250),
        quantity_blasted: dec!(1800),
    }]);
    store.seed_loading(vec![LoadingRecord {
        loading_id: Uuid::new_v4(),
        loading_date: date(2025, 6, 4),
        material: "Boulders".to_string(),
        equipment: "EX-200".to_string(),
        quantity: dec!(300),
    }]);
    store.seed_transport(vec![
        TransportRecord {
            transport_id: Uuid::new_v4(),
            transport_date: date(2025, 6, 4),
            vehicle_number: "TN-38-0007".to_string(),
            material: "Boulders".to_string(),
            trips: 9,
            quantity: dec!(180),
        },
        TransportRecord {
            transport_id: Uuid::new_v4(),
            transport_date: date(2025, 6, 5),
            vehicle_number: "TN-38-0112".to_string(),
            material: "Boulders".to_string(),
            trips: 5,
            quantity: dec!(100),
        },
    ]);
}

#[tokio::test]
async fn accounting_report_guards_margin_and_ranks_expenses() {
    let store = MemoryStore::new();
    store.seed_transactions(vec![
        transaction(2, "income", "Sales", dec!(100000)),
        transaction(5, "expense", "Diesel", dec!(30000)),
        transaction(6, "expense", "Wages", dec!(15000)),
        transaction(7, "expense", "Diesel", dec!(5000)),
        transaction(20, "Expense", "Explosives", dec!(10000)),
        transaction(1, "income", "Sales", dec!(999999)),
    ]);
    let state = app_state(store);

    let report = state
        .reports
        .accounting(DateRange::between(date(2025, 6, 2), date(2025, 6, 30)))
        .await
        .unwrap();

    assert_eq!(report.total_income, dec!(100000));
    assert_eq!(report.total_expense, dec!(60000));
    assert_eq!(report.net_profit, dec!(40000));
    assert_eq!(report.profit_margin, dec!(40));
    assert_eq!(report.top_expense_categories[0].key, "Diesel");
    assert_eq!(report.top_expense_categories[0].value, dec!(35000));

    let empty = state
        .reports
        .accounting(DateRange::between(date(2025, 7, 1), date(2025, 7, 31)))
        .await
        .unwrap();
    assert_eq!(empty.profit_margin, Decimal::ZERO);
    assert_eq!(empty.average_transaction, Decimal::ZERO);
}

#[tokio::test]
async fn production_report_groups_by_material() {
    let store = MemoryStore::new();
    let record = |day, material: &str, quantity| ProductionRecord {
        production_id: Uuid::new_v4(),
        production_date: date(2025, 6, day),
        material: material.to_string(),
        quantity,
        shift: Some("Day".to_string()),
    };
    store.seed_production(vec![
        record(1, "20mm Jelly", dec!(120)),
        record(2, "M-Sand", dec!(60)),
        record(3, "20mm Jelly", dec!(20)),
    ]);
    let state = app_state(store);

    let report = state.reports.production(june()).await.unwrap();
    assert_eq!(report.total_quantity, dec!(200));
    assert_eq!(report.record_count, 3);
    assert_eq!(report.top_materials[0].key, "20mm Jelly");
    assert_eq!(report.by_material[0].percentage, dec!(70));
}

#[tokio::test]
async fn quarry_report_combines_four_sources() {
    let store = MemoryStore::new();
    seed_quarry(&store);
    let state = app_state(store);

    let report = state.reports.quarry(june()).await.unwrap();
    assert_eq!(report.drilling.records, 2);
    assert_eq!(report.drilling.holes_drilled, 20);
    assert_eq!(report.drilling.total_depth_m, dec!(120));
    assert_eq!(report.drilling.average_depth_per_hole_m, dec!(6));
    assert_eq!(report.blasting.blasts, 1);
    assert_eq!(report.loading.total_quantity, dec!(300));
    assert_eq!(report.transport.total_trips, 14);
    assert_eq!(report.transport.top_vehicles[0].key, "TN-38-0007");
}

#[tokio::test]
async fn quarry_reads_run_concurrently() {
    let store = MemoryStore::new();
    seed_quarry(&store);
    store.set_delay(Duration::from_millis(100));
    let state = app_state(store);

    let started = Instant::now();
    state.reports.quarry(june()).await.unwrap();

    // Four sequential reads would take at least 400ms.
    assert!(started.elapsed() < Duration::from_millis(350));
}

#[tokio::test]
async fn one_failed_quarry_read_abandons_the_report() {
    let store = MemoryStore::new();
    seed_quarry(&store);
    store.fail("list_loading");
    let state = app_state(store);

    let result = state.reports.quarry(june()).await;
    assert!(matches!(result, Err(AppError::DatabaseError(_))));
}

#[tokio::test]
async fn slow_quarry_read_times_out() {
    let store = MemoryStore::new();
    store.set_delay(common::TEST_TIMEOUT * 2);
    let state = app_state(Arc::clone(&store));

    let result = state.reports.quarry(june()).await;
    let err = result.unwrap_err();
    assert!(matches!(err, AppError::Timeout(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn sales_report_counts_deliveries() {
    let store = MemoryStore::new();
    let dispatch = |day, customer: &str, material: &str, quantity, amount, status: &str| {
        DispatchRecord {
            dispatch_id: Uuid::new_v4(),
            dispatch_date: date(2025, 6, day),
            customer_name: customer.to_string(),
            material: material.to_string(),
            quantity,
            amount,
            delivery_status: status.to_string(),
        }
    };
    store.seed_dispatches(vec![
        dispatch(2, "Ravi Builders", "20mm Jelly", dec!(10), dec!(9000), "Delivered"),
        dispatch(3, "Kaveri Infra", "M-Sand", dec!(10), dec!(11000), "Pending"),
        dispatch(4, "Ravi Builders", "M-Sand", dec!(5), dec!(4400), "delivered"),
        dispatch(5, "Kaveri Infra", "Dust", dec!(1), dec!(100), "In Transit"),
    ]);
    let state = app_state(store);

    let report = state.reports.sales(june()).await.unwrap();
    assert_eq!(report.dispatch_count, 4);
    assert_eq!(report.delivered_count, 2);
    assert_eq!(report.delivery_rate, dec!(50));
    assert_eq!(report.total_revenue, dec!(24500));
    assert_eq!(report.top_customers[0].key, "Ravi Builders");
    assert_eq!(report.top_customers[0].value, dec!(13400));
}

#[tokio::test]
async fn inverted_range_is_rejected_for_every_report() {
    let state = app_state(MemoryStore::new());
    let inverted = DateRange::between(date(2025, 6, 30), date(2025, 6, 1));

    assert!(matches!(
        state.reports.accounting(inverted).await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        state.reports.production(inverted).await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        state.reports.quarry(inverted).await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        state.reports.sales(inverted).await,
        Err(AppError::BadRequest(_))
    ));
}
