//! Order payload types for the Shiprocket API and their canonical
//! conversion.
//!
//! Only the fields the reconciliation core consumes are modeled; unknown
//! keys are ignored. Every field is defaulted so a partially-populated
//! record still converts - except the order id, without which the record is
//! dropped by the adapter.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use shipdesk_core::{
    CanonicalOrder, Customer, LastUpdate, LineItem, ShippingAddress, Source, classify,
};

/// Paged order listing response.
#[derive(Debug, Clone, Deserialize)]
pub struct ShiprocketOrderList {
    #[serde(default)]
    pub data: Vec<ShiprocketOrder>,
    #[serde(default)]
    pub meta: ShiprocketMeta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShiprocketMeta {
    #[serde(default)]
    pub pagination: ShiprocketPagination,
}

/// Upstream pagination metadata, independent of the database's page math.
#[derive(Debug, Clone, Deserialize)]
pub struct ShiprocketPagination {
    #[serde(default)]
    pub total: u32,
    #[serde(default = "default_page")]
    pub total_pages: u32,
    #[serde(default = "default_page")]
    pub current_page: u32,
    #[serde(default)]
    pub per_page: u32,
}

impl Default for ShiprocketPagination {
    fn default() -> Self {
        Self {
            total: 0,
            total_pages: 1,
            current_page: 1,
            per_page: 0,
        }
    }
}

const fn default_page() -> u32 {
    1
}

/// One channel order as Shiprocket reports it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShiprocketOrder {
    #[serde(default)]
    pub id: Option<i64>,
    /// Business-visible order number from the sales channel.
    #[serde(default)]
    pub channel_order_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    #[serde(default)]
    pub customer_city: Option<String>,
    #[serde(default)]
    pub customer_state: Option<String>,
    #[serde(default)]
    pub customer_pincode: Option<String>,
    /// Free-text status; classified into the canonical set on conversion.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub products: Vec<ShiprocketProduct>,
    #[serde(default)]
    pub shipments: Vec<ShiprocketShipment>,
}

/// One product line on a channel order.
#[derive(Debug, Clone, Deserialize)]
pub struct ShiprocketProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    /// Line total; amounts arrive as JSON numbers or strings depending on
    /// the channel.
    #[serde(default)]
    pub total: Decimal,
}

const fn default_quantity() -> i64 {
    1
}

/// Shipment attached to a channel order (one per courier assignment).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShiprocketShipment {
    #[serde(default)]
    pub awb_code: Option<String>,
    #[serde(default)]
    pub courier: Option<String>,
}

impl ShiprocketOrder {
    /// Convert into the canonical shape.
    ///
    /// Returns `None` when the record carries no usable order id at all -
    /// such records are dropped rather than propagated as holes.
    #[must_use]
    pub fn into_canonical(self) -> Option<CanonicalOrder> {
        let (id, order_id) = match (self.id, self.channel_order_id) {
            (Some(id), Some(order_id)) => (id.to_string(), order_id),
            (Some(id), None) => (id.to_string(), id.to_string()),
            (None, Some(order_id)) => (order_id.clone(), order_id),
            (None, None) => return None,
        };

        let shipment = self.shipments.into_iter().next().unwrap_or_default();
        let awb = shipment.awb_code.filter(|awb| !awb.is_empty());

        let shipping_address = if self.customer_address.is_none()
            && self.customer_city.is_none()
            && self.customer_state.is_none()
            && self.customer_pincode.is_none()
        {
            None
        } else {
            Some(ShippingAddress {
                address: self.customer_address,
                city: self.customer_city,
                state: self.customer_state,
                pincode: self.customer_pincode,
            })
        };

        Some(CanonicalOrder {
            id,
            order_id,
            awb,
            customer: Customer {
                name: self.customer_name,
                phone: self.customer_phone,
                email: self.customer_email,
            },
            status: classify(self.status.as_deref().unwrap_or_default()),
            courier: shipment.courier,
            payment_mode: self.payment_method,
            line_items: self
                .products
                .into_iter()
                .map(ShiprocketProduct::into_line_item)
                .collect(),
            shipping_address,
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
            // Listing payloads carry no tracking events; the tracking view
            // fills this in.
            last_update: LastUpdate::default(),
            source: Source::Api,
        })
    }
}

impl ShiprocketProduct {
    fn into_line_item(self) -> LineItem {
        LineItem {
            name: self.name.unwrap_or_else(|| "N/A".to_string()),
            quantity: self.quantity,
            total: self.total,
        }
    }
}

/// Parse the timestamp formats Shiprocket emits (RFC 3339, naive datetime,
/// date-only).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(parsed.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}
