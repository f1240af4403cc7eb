//! Listing cache - the last successful response per request key.
//!
//! Consumers key cached listings by their request parameters; the sync
//! coordinator invalidates the whole cache after a successful write-through
//! so the next read re-fetches. Entries also age out on a TTL so a quiet
//! view cannot serve stale data forever.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use shipdesk_core::ShipmentStatus;

use crate::reconcile::{OrderFilters, OrderListing};

/// Default TTL for cached listings.
pub const DEFAULT_LISTING_TTL: Duration = Duration::from_secs(300);

const MAX_CACHED_LISTINGS: u64 = 1000;

/// TTL-bounded cache of merged order listings keyed by request parameters.
#[derive(Clone)]
pub struct ListingCache {
    inner: Cache<String, Arc<OrderListing>>,
}

impl ListingCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(MAX_CACHED_LISTINGS)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Last successful listing for this request key, if still fresh.
    pub async fn get(&self, key: &str) -> Option<Arc<OrderListing>> {
        self.inner.get(key).await
    }

    /// Store a successful listing under its request key.
    pub async fn insert(&self, key: String, listing: OrderListing) {
        self.inner.insert(key, Arc::new(listing)).await;
    }

    /// Drop every cached listing; the next read re-fetches.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new(DEFAULT_LISTING_TTL)
    }
}

/// Cache key for a listing request: the request parameters, canonicalized.
#[must_use]
pub fn listing_key(filters: &OrderFilters, page: u32, page_size: u32) -> String {
    format!(
        "orders:{}:{}:{}:{}:{}:{}:{page}:{page_size}",
        filters.search.as_deref().unwrap_or_default(),
        filters.status.as_ref().map(ShipmentStatus::label).unwrap_or_default(),
        filters.date_from.map(|date| date.to_string()).unwrap_or_default(),
        filters.date_to.map(|date| date.to_string()).unwrap_or_default(),
        filters.courier.as_deref().unwrap_or_default(),
        filters.payment_mode.as_deref().unwrap_or_default(),
    )
}
