//! End-to-end reconciliation scenarios over scripted adapters.

use shipdesk_core::{ShipmentStatus, Source, TrackingEvent, TrackingSnapshot};
use shipdesk_dashboard::error::AppError;
use shipdesk_dashboard::reconcile::{OrderFilters, OrderReconciler};
use shipdesk_integration_tests::{FakeAdapter, order};

#[tokio::test]
async fn merged_listing_dedups_by_awb_with_database_winning() {
    // Database has AWB100 as Delivered; the API still reports it In
    // Transit and also knows a second shipment AWB200.
    let database = FakeAdapter::new(
        Source::Database,
        vec![order(Source::Database, "D-1", Some("AWB100"), "Delivered")],
    );
    let api = FakeAdapter::new(
        Source::Api,
        vec![
            order(Source::Api, "A-1", Some("AWB100"), "In Transit"),
            order(Source::Api, "A-2", Some("AWB200"), "Pending"),
        ],
    );
    let reconciler = OrderReconciler::new(database, api);

    let listing = reconciler
        .list_orders(&OrderFilters::default(), 1, 25)
        .await
        .expect("both sources up");

    assert_eq!(listing.total_count, 2);
    assert_eq!(listing.provenance.database, 1);
    assert_eq!(listing.provenance.api, 1);

    let first = listing.orders.first().expect("two orders");
    assert_eq!(first.awb.as_deref(), Some("AWB100"));
    assert_eq!(first.status, ShipmentStatus::Delivered);
    assert_eq!(first.source, Source::Database);

    let second = listing.orders.get(1).expect("two orders");
    assert_eq!(second.awb.as_deref(), Some("AWB200"));
    assert_eq!(second.status, ShipmentStatus::Pending);
    assert_eq!(second.source, Source::Api);
}

#[tokio::test]
async fn api_records_without_awb_are_always_included() {
    let database = FakeAdapter::new(
        Source::Database,
        vec![order(Source::Database, "D-1", Some("AWB100"), "Delivered")],
    );
    let api = FakeAdapter::new(
        Source::Api,
        vec![
            order(Source::Api, "A-1", None, "Pending"),
            order(Source::Api, "A-2", Some(""), "Pending"),
        ],
    );
    let reconciler = OrderReconciler::new(database, api);

    let listing = reconciler
        .list_orders(&OrderFilters::default(), 1, 25)
        .await
        .expect("both sources up");

    assert_eq!(listing.total_count, 3);
}

#[tokio::test]
async fn api_outage_degrades_to_database_only() {
    let database = FakeAdapter::new(
        Source::Database,
        vec![
            order(Source::Database, "D-1", Some("AWB100"), "Delivered"),
            order(Source::Database, "D-2", Some("AWB300"), "In Transit"),
        ],
    );
    let api = FakeAdapter::unavailable(Source::Api);
    let reconciler = OrderReconciler::new(database, api);

    let listing = reconciler
        .list_orders(&OrderFilters::default(), 1, 25)
        .await
        .expect("single-source failure must not error");

    assert_eq!(listing.total_count, 2);
    assert_eq!(listing.provenance.database, 2);
    // The degradation is visible only as a zero count for that source.
    assert_eq!(listing.provenance.api, 0);
    assert!(listing.orders.iter().all(|o| o.source == Source::Database));
}

#[tokio::test]
async fn database_outage_degrades_to_api_only() {
    let database = FakeAdapter::unavailable(Source::Database);
    let api = FakeAdapter::new(
        Source::Api,
        vec![order(Source::Api, "A-1", Some("AWB200"), "Pending")],
    );
    let reconciler = OrderReconciler::new(database, api);

    let listing = reconciler
        .list_orders(&OrderFilters::default(), 1, 25)
        .await
        .expect("single-source failure must not error");

    assert_eq!(listing.total_count, 1);
    assert_eq!(listing.provenance.database, 0);
    assert_eq!(listing.provenance.api, 1);
}

#[tokio::test]
async fn total_outage_is_a_hard_error_not_an_empty_success() {
    let reconciler = OrderReconciler::new(
        FakeAdapter::unavailable(Source::Database),
        FakeAdapter::unavailable(Source::Api),
    );

    let result = reconciler
        .list_orders(&OrderFilters::default(), 1, 25)
        .await;

    assert!(matches!(
        result,
        Err(AppError::AllSourcesUnavailable { .. })
    ));
}

#[tokio::test]
async fn filters_apply_after_merge_and_drive_the_count() {
    let database = FakeAdapter::new(
        Source::Database,
        vec![order(Source::Database, "D-1", Some("AWB100"), "Delivered")],
    );
    let api = FakeAdapter::new(
        Source::Api,
        vec![
            // Same shipment, different status upstream; must not resurface
            // through the filter.
            order(Source::Api, "A-1", Some("AWB100"), "In Transit"),
            order(Source::Api, "A-2", Some("AWB200"), "In Transit"),
        ],
    );
    let reconciler = OrderReconciler::new(database, api);

    let filters = OrderFilters {
        status: Some(ShipmentStatus::InTransit),
        ..OrderFilters::default()
    };
    let listing = reconciler
        .list_orders(&filters, 1, 25)
        .await
        .expect("both sources up");

    // AWB100 deduped to the Delivered database record, so only AWB200
    // matches the In Transit filter.
    assert_eq!(listing.total_count, 1);
    let only = listing.orders.first().expect("one order");
    assert_eq!(only.awb.as_deref(), Some("AWB200"));
    // Provenance still counts the merged collection, not the filtered one.
    assert_eq!(listing.provenance.database, 1);
    assert_eq!(listing.provenance.api, 1);
}

#[tokio::test]
async fn pagination_happens_after_merge_and_filter() {
    let database = FakeAdapter::new(
        Source::Database,
        (0..8)
            .map(|i| order(Source::Database, &format!("D-{i}"), Some(&format!("AWB{i}")), "Pending"))
            .collect(),
    );
    let api = FakeAdapter::new(
        Source::Api,
        (8..12)
            .map(|i| order(Source::Api, &format!("A-{i}"), Some(&format!("AWB{i}")), "Pending"))
            .collect(),
    );
    let reconciler = OrderReconciler::new(database, api);

    let listing = reconciler
        .list_orders(&OrderFilters::default(), 2, 5)
        .await
        .expect("both sources up");

    assert_eq!(listing.total_count, 12);
    assert_eq!(listing.total_pages, 3);
    assert_eq!(listing.page, 2);
    assert_eq!(listing.orders.len(), 5);
    let first_on_page = listing.orders.first().expect("five orders");
    assert_eq!(first_on_page.order_id, "D-5");
}

#[tokio::test]
async fn single_source_passthrough_exposes_native_pagination() {
    let database = FakeAdapter::new(
        Source::Database,
        (0..7)
            .map(|i| order(Source::Database, &format!("D-{i}"), None, "Pending"))
            .collect(),
    );
    let api = FakeAdapter::new(Source::Api, Vec::new());
    let reconciler = OrderReconciler::new(database, api);

    let page = reconciler
        .fetch_orders_by_source(Source::Database, 2, 3)
        .await
        .expect("source up");

    assert_eq!(page.orders.len(), 3);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.current_page, 2);
}

fn snapshot(source: Source, awb: &str, status: &str) -> TrackingSnapshot {
    TrackingSnapshot {
        source: Some(source),
        awb: Some(awb.to_string()),
        current_status: Some(status.to_string()),
        tracking_history: vec![TrackingEvent {
            timestamp: Some("2026-07-17 09:12:00".to_string()),
            location: Some("Mumbai Hub".to_string()),
            status: Some(status.to_string()),
            activity: None,
        }],
        ..TrackingSnapshot::default()
    }
}

#[tokio::test]
async fn tracking_prefers_the_database_snapshot() {
    let database = FakeAdapter::new(Source::Database, Vec::new())
        .with_tracking(snapshot(Source::Database, "AWB100", "Delivered"));
    let api = FakeAdapter::new(Source::Api, Vec::new())
        .with_tracking(snapshot(Source::Api, "AWB100", "In Transit"));
    let reconciler = OrderReconciler::new(database, api);

    let found = reconciler
        .fetch_tracking("AWB100")
        .await
        .expect("database knows the AWB");
    assert_eq!(found.source, Some(Source::Database));
    assert_eq!(found.current_status.as_deref(), Some("Delivered"));
}

#[tokio::test]
async fn tracking_falls_back_to_api_when_database_is_empty() {
    let database = FakeAdapter::new(Source::Database, Vec::new());
    let api = FakeAdapter::new(Source::Api, Vec::new())
        .with_tracking(snapshot(Source::Api, "AWB200", "In Transit"));
    let reconciler = OrderReconciler::new(database, api);

    let found = reconciler
        .fetch_tracking("AWB200")
        .await
        .expect("api knows the AWB");
    assert_eq!(found.source, Some(Source::Api));
}

#[tokio::test]
async fn tracking_unknown_awb_is_not_found() {
    let reconciler = OrderReconciler::new(
        FakeAdapter::new(Source::Database, Vec::new()),
        FakeAdapter::new(Source::Api, Vec::new()),
    );

    let result = reconciler.fetch_tracking("AWB999").await;
    assert!(matches!(result, Err(AppError::NotFound(awb)) if awb == "AWB999"));
}

#[tokio::test]
async fn tracking_total_outage_is_a_hard_error() {
    let reconciler = OrderReconciler::new(
        FakeAdapter::unavailable(Source::Database),
        FakeAdapter::unavailable(Source::Api),
    );

    let result = reconciler.fetch_tracking("AWB100").await;
    assert!(matches!(
        result,
        Err(AppError::AllSourcesUnavailable { .. })
    ));
}

#[tokio::test]
async fn tracking_api_outage_after_database_miss_reads_as_not_found() {
    let reconciler = OrderReconciler::new(
        FakeAdapter::new(Source::Database, Vec::new()),
        FakeAdapter::unavailable(Source::Api),
    );

    let result = reconciler.fetch_tracking("AWB100").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
