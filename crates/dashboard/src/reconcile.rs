//! Order reconciliation - merging both sources into one canonical listing.
//!
//! The merge rules carry the data-integrity invariants of the whole
//! dashboard: database records always win cross-source ties, API records
//! join only when their waybill is genuinely new, and filtering happens
//! after the merge so a record hidden from one source cannot silently
//! vanish from the filtered count. Pagination also happens after
//! merge+filter - the one consistent policy, since neither source's native
//! page math describes the combined collection.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shipdesk_core::{CanonicalOrder, ShipmentStatus, Source, TrackingSnapshot};

use crate::error::{AppError, SourceError};
use crate::source::{OrderPage, SourceAdapter};

/// Filters applied to the merged collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilters {
    /// Free-text search across order id, customer name, and AWB.
    pub search: Option<String>,
    /// Status equality.
    pub status: Option<ShipmentStatus>,
    /// Created-at lower bound (inclusive).
    pub date_from: Option<NaiveDate>,
    /// Created-at upper bound (inclusive).
    pub date_to: Option<NaiveDate>,
    /// Courier name (case-insensitive).
    pub courier: Option<String>,
    /// Payment mode (case-insensitive).
    pub payment_mode: Option<String>,
}

impl OrderFilters {
    /// Whether an order passes every active filter.
    #[must_use]
    pub fn matches(&self, order: &CanonicalOrder) -> bool {
        if let Some(search) = &self.search
            && !search.is_empty()
        {
            let needle = search.to_lowercase();
            let hit = order.order_id.to_lowercase().contains(&needle)
                || order
                    .customer
                    .name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
                || order
                    .awb
                    .as_deref()
                    .is_some_and(|awb| awb.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(status) = &self.status
            && order.status != *status
        {
            return false;
        }

        if let Some(from) = self.date_from {
            let inside = order
                .created_at
                .is_some_and(|created| created.date_naive() >= from);
            if !inside {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            let inside = order
                .created_at
                .is_some_and(|created| created.date_naive() <= to);
            if !inside {
                return false;
            }
        }

        if let Some(courier) = &self.courier
            && !courier.is_empty()
        {
            let hit = order
                .courier
                .as_deref()
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(courier));
            if !hit {
                return false;
            }
        }

        if let Some(mode) = &self.payment_mode
            && !mode.is_empty()
        {
            let hit = order
                .payment_mode
                .as_deref()
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(mode));
            if !hit {
                return false;
            }
        }

        true
    }
}

/// Per-source record counts in a merged collection. A zero for a source
/// records that it contributed nothing - including outages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProvenanceCounts {
    pub database: usize,
    pub api: usize,
}

/// A merged, filtered, paginated order listing.
#[derive(Debug, Clone, Serialize)]
pub struct OrderListing {
    pub orders: Vec<CanonicalOrder>,
    /// Length of the merged, filtered collection (not one source's total).
    pub total_count: usize,
    /// Page count derived from `total_count`, never from a source's own
    /// pagination metadata.
    pub total_pages: u32,
    pub page: u32,
    /// Counts over the merged collection, before filtering.
    pub provenance: ProvenanceCounts,
}

/// Merge both sources' collections into one deduplicated list.
///
/// Database records come first, in their original order. An API record is
/// appended only when its non-empty AWB matches no database record; records
/// without an AWB cannot be deduplicated and are always appended.
#[must_use]
pub fn merge_orders(
    database: Vec<CanonicalOrder>,
    api: Vec<CanonicalOrder>,
) -> Vec<CanonicalOrder> {
    let known: HashSet<String> = database
        .iter()
        .filter_map(|order| order.dedup_key().map(String::from))
        .collect();

    let mut merged = database;
    for order in api {
        match order.dedup_key() {
            Some(awb) if known.contains(awb) => {}
            _ => merged.push(order),
        }
    }
    merged
}

/// Merges the database and API order collections into one logically
/// deduplicated, display-ready collection, and resolves tracking lookups
/// across both sources.
pub struct OrderReconciler<D, A> {
    database: D,
    api: A,
}

impl<D: SourceAdapter, A: SourceAdapter> OrderReconciler<D, A> {
    pub fn new(database: D, api: A) -> Self {
        Self { database, api }
    }

    /// List orders across both sources.
    ///
    /// Both fetches are issued concurrently and the merge waits for both to
    /// settle. A single failed source degrades to an empty collection
    /// (recorded in the provenance counts, logged at warn); only when both
    /// fail does the call error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AllSourcesUnavailable`] when neither source
    /// produced data.
    #[instrument(skip(self, filters))]
    pub async fn list_orders(
        &self,
        filters: &OrderFilters,
        page: u32,
        page_size: u32,
    ) -> Result<OrderListing, AppError> {
        let (database, api) =
            tokio::join!(self.database.fetch_all_orders(), self.api.fetch_all_orders());

        if let (Err(database), Err(api)) = (&database, &api) {
            tracing::error!(
                database = %database,
                api = %api,
                "both order sources unavailable"
            );
        }
        let (database, api) = match (database, api) {
            (Err(database), Err(api)) => {
                return Err(AppError::AllSourcesUnavailable { database, api });
            }
            (database, api) => (
                unwrap_or_degraded(database, Source::Database),
                unwrap_or_degraded(api, Source::Api),
            ),
        };

        let merged = merge_orders(database, api);
        let provenance = ProvenanceCounts {
            database: merged
                .iter()
                .filter(|order| order.source == Source::Database)
                .count(),
            api: merged
                .iter()
                .filter(|order| order.source == Source::Api)
                .count(),
        };

        let filtered: Vec<CanonicalOrder> = merged
            .into_iter()
            .filter(|order| filters.matches(order))
            .collect();

        let total_count = filtered.len();
        let page = page.max(1);
        let size = page_size.max(1) as usize;
        let total_pages = u32::try_from(total_count.div_ceil(size)).unwrap_or(u32::MAX);
        let orders: Vec<CanonicalOrder> = filtered
            .into_iter()
            .skip((page as usize - 1) * size)
            .take(size)
            .collect();

        Ok(OrderListing {
            orders,
            total_count,
            total_pages,
            page,
            provenance,
        })
    }

    /// Single-source passthrough, exposed for debugging views.
    ///
    /// # Errors
    ///
    /// Returns the source's own error unchanged; there is no cross-source
    /// degradation on this path.
    pub async fn fetch_orders_by_source(
        &self,
        source: Source,
        page: u32,
        page_size: u32,
    ) -> Result<OrderPage, SourceError> {
        match source {
            Source::Database => self.database.fetch_orders(page, page_size).await,
            Source::Api => self.api.fetch_orders(page, page_size).await,
        }
    }

    /// Tracking lookup with database-first fallback.
    ///
    /// Behaves identically for authenticated and public callers. An empty
    /// snapshot from a source is "not found" there, not an error.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when no reachable source knows the AWB;
    /// [`AppError::AllSourcesUnavailable`] when both sources failed.
    #[instrument(skip(self))]
    pub async fn fetch_tracking(&self, awb: &str) -> Result<TrackingSnapshot, AppError> {
        let database_error = match self.database.fetch_tracking(awb).await {
            Ok(snapshot) if !snapshot.is_empty() => return Ok(snapshot),
            Ok(_) => None,
            Err(error) => {
                tracing::warn!(awb, error = %error, "database tracking unavailable, falling back to api");
                Some(error)
            }
        };

        match self.api.fetch_tracking(awb).await {
            Ok(snapshot) if !snapshot.is_empty() => Ok(snapshot),
            Ok(_) => Err(AppError::NotFound(awb.to_string())),
            Err(api) => match database_error {
                Some(database) => Err(AppError::AllSourcesUnavailable { database, api }),
                // The database answered "not found"; the API being down on
                // top of that degrades silently.
                None => Err(AppError::NotFound(awb.to_string())),
            },
        }
    }
}

/// Treat a failed source as empty, recording the degradation.
fn unwrap_or_degraded(
    result: Result<Vec<CanonicalOrder>, SourceError>,
    source: Source,
) -> Vec<CanonicalOrder> {
    match result {
        Ok(orders) => orders,
        Err(error) => {
            tracing::warn!(source = %source, error = %error, "order source unavailable, continuing without it");
            Vec::new()
        }
    }
}
