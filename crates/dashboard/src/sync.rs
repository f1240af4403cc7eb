//! Channel sync - explicit write-through from the API source into the
//! database, invalidating cached views on success.
//!
//! Failure keeps the previous cached data valid and visible: the outcome
//! carries a user-facing message, nothing retries automatically, and the
//! cache is only touched after every order landed.

use serde::Serialize;
use tracing::instrument;

use shipdesk_core::CanonicalOrder;

use crate::cache::ListingCache;
use crate::db::{OrderRepository, RepositoryError};
use crate::source::SourceAdapter;

/// Page size used for [`SyncScope::Recent`].
const RECENT_PAGE_SIZE: u32 = 50;

/// What a sync request covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncScope {
    /// Pull the channel's full order book.
    #[default]
    Full,
    /// Only the most recent page of channel orders.
    Recent,
}

/// Destination for synced orders. [`OrderRepository`] is the production
/// sink; tests substitute an in-memory one.
#[allow(async_fn_in_trait)]
pub trait OrderSink {
    async fn store_order(&self, order: &CanonicalOrder) -> Result<(), RepositoryError>;
}

impl OrderSink for OrderRepository {
    async fn store_order(&self, order: &CanonicalOrder) -> Result<(), RepositoryError> {
        self.upsert_order(order).await
    }
}

/// Sync outcome reported back to the UI.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub success: bool,
    /// User-facing, non-technical message.
    pub message: String,
    /// Orders written through before the outcome was decided.
    pub synced: usize,
}

/// Triggers an explicit pull of channel orders into the database and marks
/// cached listings stale on success.
pub struct SyncCoordinator<A, S> {
    source: A,
    sink: S,
    cache: ListingCache,
}

impl<A: SourceAdapter, S: OrderSink> SyncCoordinator<A, S> {
    pub fn new(source: A, sink: S, cache: ListingCache) -> Self {
        Self {
            source,
            sink,
            cache,
        }
    }

    /// Pull channel orders and write them through.
    ///
    /// The cache is invalidated only after a fully successful run; on any
    /// failure the previous cached listings stay valid and the failure is
    /// reported in the outcome message.
    #[instrument(skip(self))]
    pub async fn trigger_sync(&self, scope: SyncScope) -> SyncOutcome {
        let fetched = match scope {
            SyncScope::Full => self.source.fetch_all_orders().await,
            SyncScope::Recent => self
                .source
                .fetch_orders(1, RECENT_PAGE_SIZE)
                .await
                .map(|page| page.orders),
        };

        let orders = match fetched {
            Ok(orders) => orders,
            Err(error) => {
                tracing::warn!(error = %error, "channel sync fetch failed");
                return SyncOutcome {
                    success: false,
                    message: "Could not reach the order channel. Showing previously synced data."
                        .to_string(),
                    synced: 0,
                };
            }
        };

        let mut synced = 0;
        for order in &orders {
            if let Err(error) = self.sink.store_order(order).await {
                tracing::warn!(order_id = %order.order_id, error = %error, "channel sync write failed");
                return SyncOutcome {
                    success: false,
                    message: "Sync failed while saving orders. Previous data is unchanged."
                        .to_string(),
                    synced,
                };
            }
            synced += 1;
        }

        self.cache.invalidate_all();
        tracing::info!(synced, "channel sync complete");
        SyncOutcome {
            success: true,
            message: format!("Synced {synced} orders from the channel"),
            synced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use shipdesk_core::{Customer, LastUpdate, Source, TrackingSnapshot, classify};

    use crate::cache::listing_key;
    use crate::error::SourceError;
    use crate::reconcile::{OrderFilters, OrderListing, ProvenanceCounts};
    use crate::shiprocket::ShiprocketError;
    use crate::source::OrderPage;

    fn api_order(order_id: &str) -> CanonicalOrder {
        CanonicalOrder {
            id: order_id.to_string(),
            order_id: order_id.to_string(),
            awb: None,
            customer: Customer::default(),
            status: classify("Pending"),
            courier: None,
            payment_mode: None,
            line_items: Vec::new(),
            shipping_address: None,
            created_at: None,
            last_update: LastUpdate::default(),
            source: Source::Api,
        }
    }

    struct FakeSource {
        orders: Vec<CanonicalOrder>,
        fail: bool,
    }

    impl SourceAdapter for FakeSource {
        fn source(&self) -> Source {
            Source::Api
        }

        async fn fetch_orders(&self, page: u32, _page_size: u32) -> Result<OrderPage, SourceError> {
            Ok(OrderPage {
                orders: self.fetch_all_orders().await?,
                total_pages: 1,
                current_page: page,
            })
        }

        async fn fetch_all_orders(&self) -> Result<Vec<CanonicalOrder>, SourceError> {
            if self.fail {
                return Err(SourceError::Api(ShiprocketError::AuthenticationFailed(
                    "scripted outage".to_string(),
                )));
            }
            Ok(self.orders.clone())
        }

        async fn fetch_tracking(&self, _awb: &str) -> Result<TrackingSnapshot, SourceError> {
            Ok(TrackingSnapshot::empty())
        }
    }

    #[derive(Default)]
    struct FakeSink {
        stored: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    impl OrderSink for FakeSink {
        async fn store_order(&self, order: &CanonicalOrder) -> Result<(), RepositoryError> {
            if self.fail_on.as_deref() == Some(order.order_id.as_str()) {
                return Err(RepositoryError::DataCorruption("scripted failure".to_string()));
            }
            self.stored
                .lock()
                .expect("sink lock")
                .push(order.order_id.clone());
            Ok(())
        }
    }

    fn empty_listing() -> OrderListing {
        OrderListing {
            orders: Vec::new(),
            total_count: 0,
            total_pages: 0,
            page: 1,
            provenance: ProvenanceCounts::default(),
        }
    }

    #[tokio::test]
    async fn test_successful_sync_writes_and_invalidates_cache() {
        let cache = ListingCache::default();
        let key = listing_key(&OrderFilters::default(), 1, 25);
        cache.insert(key.clone(), empty_listing()).await;

        let source = FakeSource {
            orders: vec![api_order("SHOP-1"), api_order("SHOP-2")],
            fail: false,
        };
        let coordinator = SyncCoordinator::new(source, FakeSink::default(), cache.clone());

        let outcome = coordinator.trigger_sync(SyncScope::Full).await;
        assert!(outcome.success);
        assert_eq!(outcome.synced, 2);
        assert_eq!(outcome.message, "Synced 2 orders from the channel");
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_preserves_cache() {
        let cache = ListingCache::default();
        let key = listing_key(&OrderFilters::default(), 1, 25);
        cache.insert(key.clone(), empty_listing()).await;

        let source = FakeSource {
            orders: Vec::new(),
            fail: true,
        };
        let coordinator = SyncCoordinator::new(source, FakeSink::default(), cache.clone());

        let outcome = coordinator.trigger_sync(SyncScope::Full).await;
        assert!(!outcome.success);
        assert_eq!(outcome.synced, 0);
        // Non-technical message, no error internals leaked.
        assert!(!outcome.message.contains("scripted outage"));
        assert!(cache.get(&key).await.is_some());
    }

    #[tokio::test]
    async fn test_write_failure_stops_and_preserves_cache() {
        let cache = ListingCache::default();
        let key = listing_key(&OrderFilters::default(), 1, 25);
        cache.insert(key.clone(), empty_listing()).await;

        let source = FakeSource {
            orders: vec![api_order("SHOP-1"), api_order("SHOP-2"), api_order("SHOP-3")],
            fail: false,
        };
        let sink = FakeSink {
            fail_on: Some("SHOP-2".to_string()),
            ..FakeSink::default()
        };
        let coordinator = SyncCoordinator::new(source, sink, cache.clone());

        let outcome = coordinator.trigger_sync(SyncScope::Full).await;
        assert!(!outcome.success);
        assert_eq!(outcome.synced, 1);
        assert!(cache.get(&key).await.is_some());
    }
}
