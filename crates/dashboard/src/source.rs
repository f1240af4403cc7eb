//! Source adapters - the uniform capability seam over both data sources.
//!
//! Each adapter only translates its native payload shape into the canonical
//! shapes; no cross-source logic lives here. The reconciler is generic over
//! this trait, so tests can substitute scripted in-memory adapters.

use shipdesk_core::{CanonicalOrder, Source, TrackingSnapshot};

use crate::db::OrderRepository;
use crate::error::SourceError;
use crate::shiprocket::{ShiprocketClient, ShiprocketError, ShiprocketOrder};
use crate::tracking::{self, DatabaseTrackingPayload, DbClientSection, DbOrderSection, DbTrackingSection};

/// One source's page of canonical orders plus its native pagination
/// metadata.
#[derive(Debug, Clone)]
pub struct OrderPage {
    pub orders: Vec<CanonicalOrder>,
    pub total_pages: u32,
    pub current_page: u32,
}

/// Uniform capability set both sources implement.
///
/// A failed call means "this source is unavailable for this request";
/// callers tolerate it without failing the whole request.
#[allow(async_fn_in_trait)]
pub trait SourceAdapter {
    /// Which source this adapter wraps.
    fn source(&self) -> Source;

    /// One page of orders in the source's native order.
    async fn fetch_orders(&self, page: u32, page_size: u32) -> Result<OrderPage, SourceError>;

    /// The complete collection, walking the source's own pagination.
    async fn fetch_all_orders(&self) -> Result<Vec<CanonicalOrder>, SourceError>;

    /// Tracking snapshot for an AWB. An empty snapshot means "not found";
    /// an error means the source itself was unavailable.
    async fn fetch_tracking(&self, awb: &str) -> Result<TrackingSnapshot, SourceError>;
}

// =============================================================================
// Database adapter
// =============================================================================

/// Adapter over the local store. Canonical by construction, authoritative
/// for cross-source ties.
#[derive(Clone)]
pub struct DatabaseAdapter {
    repo: OrderRepository,
}

impl DatabaseAdapter {
    #[must_use]
    pub fn new(repo: OrderRepository) -> Self {
        Self { repo }
    }
}

impl SourceAdapter for DatabaseAdapter {
    fn source(&self) -> Source {
        Source::Database
    }

    async fn fetch_orders(&self, page: u32, page_size: u32) -> Result<OrderPage, SourceError> {
        let (orders, total) = self.repo.list_orders(page, page_size).await?;
        let per_page = u64::from(page_size.max(1));
        let total_pages = u32::try_from(total.div_ceil(per_page)).unwrap_or(u32::MAX);
        Ok(OrderPage {
            orders,
            total_pages: total_pages.max(1),
            current_page: page.max(1),
        })
    }

    async fn fetch_all_orders(&self) -> Result<Vec<CanonicalOrder>, SourceError> {
        Ok(self.repo.list_all_orders().await?)
    }

    async fn fetch_tracking(&self, awb: &str) -> Result<TrackingSnapshot, SourceError> {
        let Some(order) = self.repo.find_by_awb(awb).await? else {
            return Ok(TrackingSnapshot::empty());
        };
        let history = self.repo.tracking_history(awb).await?;
        let product = order.product();
        let address = order.shipping_address.clone().unwrap_or_default();

        // Feed the store's record through the same normalizer the raw
        // payload path uses, so there is exactly one snapshot shape.
        let payload = DatabaseTrackingPayload {
            order: DbOrderSection {
                order_id: Some(order.order_id.clone()),
                product_name: Some(product.name),
                product_quantity: Some(product.quantity),
                address: address.address,
                city: address.city,
                state: address.state,
                pincode: address.pincode,
            },
            tracking: DbTrackingSection {
                awb: Some(awb.to_string()),
                courier: order.courier.clone(),
                current_status: Some(order.status.label().to_string()),
                etd: None,
                tracking_history: history,
            },
            client: Some(DbClientSection {
                name: order.customer.name.clone(),
                phone: order.customer.phone.clone(),
                email: order.customer.email.clone(),
            }),
        };
        Ok(tracking::normalize_database(payload))
    }
}

// =============================================================================
// Shiprocket adapter
// =============================================================================

/// Adapter over the Shiprocket API.
#[derive(Clone)]
pub struct ShiprocketAdapter {
    client: ShiprocketClient,
}

impl ShiprocketAdapter {
    #[must_use]
    pub fn new(client: ShiprocketClient) -> Self {
        Self { client }
    }
}

impl SourceAdapter for ShiprocketAdapter {
    fn source(&self) -> Source {
        Source::Api
    }

    async fn fetch_orders(&self, page: u32, page_size: u32) -> Result<OrderPage, SourceError> {
        let list = self.client.list_orders(page, page_size).await?;
        let total_pages = list.meta.pagination.total_pages;
        let current_page = list.meta.pagination.current_page;
        Ok(OrderPage {
            orders: canonicalize(list.data),
            total_pages,
            current_page,
        })
    }

    async fn fetch_all_orders(&self) -> Result<Vec<CanonicalOrder>, SourceError> {
        Ok(canonicalize(self.client.list_all_orders().await?))
    }

    async fn fetch_tracking(&self, awb: &str) -> Result<TrackingSnapshot, SourceError> {
        match self.client.track_awb(awb).await {
            Ok(value) => Ok(tracking::normalize(&value)),
            // A missing AWB is a uniform "not found", not a source failure.
            Err(ShiprocketError::NotFound(_)) => Ok(TrackingSnapshot::empty()),
            Err(error) => Err(SourceError::Api(error)),
        }
    }
}

/// Drop records without a usable id instead of propagating holes.
fn canonicalize(orders: Vec<ShiprocketOrder>) -> Vec<CanonicalOrder> {
    orders
        .into_iter()
        .filter_map(|order| {
            let canonical = order.into_canonical();
            if canonical.is_none() {
                tracing::warn!("dropping api order record with no usable id");
            }
            canonical
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_drops_unidentifiable_records() {
        let orders = vec![
            ShiprocketOrder {
                id: Some(1),
                ..ShiprocketOrder::default()
            },
            ShiprocketOrder::default(),
            ShiprocketOrder {
                channel_order_id: Some("SHOP-9".to_string()),
                ..ShiprocketOrder::default()
            },
        ];
        let canonical = canonicalize(orders);
        assert_eq!(canonical.len(), 2);
        assert!(canonical.iter().all(|order| order.source == Source::Api));
    }
}
