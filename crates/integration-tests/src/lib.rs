//! Integration tests for Shipdesk.
//!
//! The reconciler and sync coordinator are generic over their source
//! adapters, so these scenarios run without a live database or network:
//! each test wires scripted in-memory adapters and drives the public
//! operations end to end.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shipdesk-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `reconcile_scenarios` - merge/dedup, degradation, and lookup flows
//! - `tracking_normalize` - payload shape detection and equivalence

#![cfg_attr(not(test), forbid(unsafe_code))]

use rust_decimal::Decimal;

use shipdesk_core::{
    CanonicalOrder, Customer, LastUpdate, LineItem, Source, TrackingSnapshot, classify,
};
use shipdesk_dashboard::db::RepositoryError;
use shipdesk_dashboard::error::SourceError;
use shipdesk_dashboard::shiprocket::ShiprocketError;
use shipdesk_dashboard::source::{OrderPage, SourceAdapter};

/// A scripted in-memory source adapter.
#[derive(Debug, Clone)]
pub struct FakeAdapter {
    source: Source,
    orders: Vec<CanonicalOrder>,
    tracking: Option<TrackingSnapshot>,
    fail: bool,
}

impl FakeAdapter {
    /// Adapter answering with a fixed order collection.
    #[must_use]
    pub fn new(source: Source, orders: Vec<CanonicalOrder>) -> Self {
        Self {
            source,
            orders,
            tracking: None,
            fail: false,
        }
    }

    /// Adapter whose every call fails with "source unavailable".
    #[must_use]
    pub fn unavailable(source: Source) -> Self {
        Self {
            source,
            orders: Vec::new(),
            tracking: None,
            fail: true,
        }
    }

    /// Script the tracking snapshot this adapter answers with.
    #[must_use]
    pub fn with_tracking(mut self, snapshot: TrackingSnapshot) -> Self {
        self.tracking = Some(snapshot);
        self
    }

    fn outage(&self) -> SourceError {
        match self.source {
            Source::Database => SourceError::Database(RepositoryError::DataCorruption(
                "scripted outage".to_string(),
            )),
            Source::Api => SourceError::Api(ShiprocketError::AuthenticationFailed(
                "scripted outage".to_string(),
            )),
        }
    }
}

impl SourceAdapter for FakeAdapter {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch_orders(&self, page: u32, page_size: u32) -> Result<OrderPage, SourceError> {
        if self.fail {
            return Err(self.outage());
        }
        let size = page_size.max(1) as usize;
        let start = (page.max(1) as usize - 1) * size;
        let orders: Vec<CanonicalOrder> =
            self.orders.iter().skip(start).take(size).cloned().collect();
        let total_pages = u32::try_from(self.orders.len().div_ceil(size)).unwrap_or(u32::MAX);
        Ok(OrderPage {
            orders,
            total_pages: total_pages.max(1),
            current_page: page.max(1),
        })
    }

    async fn fetch_all_orders(&self) -> Result<Vec<CanonicalOrder>, SourceError> {
        if self.fail {
            return Err(self.outage());
        }
        Ok(self.orders.clone())
    }

    async fn fetch_tracking(&self, _awb: &str) -> Result<TrackingSnapshot, SourceError> {
        if self.fail {
            return Err(self.outage());
        }
        Ok(self
            .tracking
            .clone()
            .unwrap_or_else(TrackingSnapshot::empty))
    }
}

/// Build a minimal canonical order for scenarios.
#[must_use]
pub fn order(source: Source, order_id: &str, awb: Option<&str>, status: &str) -> CanonicalOrder {
    CanonicalOrder {
        id: format!("{source}:{order_id}"),
        order_id: order_id.to_string(),
        awb: awb.map(str::to_string),
        customer: Customer {
            name: Some("Priya Sharma".to_string()),
            phone: None,
            email: None,
        },
        status: classify(status),
        courier: Some("Delhivery".to_string()),
        payment_mode: Some("Prepaid".to_string()),
        line_items: vec![LineItem {
            name: "Steel Bottle".to_string(),
            quantity: 1,
            total: Decimal::new(4999, 2),
        }],
        shipping_address: None,
        created_at: None,
        last_update: LastUpdate::default(),
        source,
    }
}
