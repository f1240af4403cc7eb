//! Canonical order representation - the unit exposed to consumers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::price;
use super::source::Source;
use super::status::ShipmentStatus;

/// Customer contact details, each optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Customer {
    /// Display name with the placeholder used across order views.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("Guest")
    }

    /// Phone with the placeholder used across order views.
    #[must_use]
    pub fn display_phone(&self) -> &str {
        self.phone
            .as_deref()
            .filter(|phone| !phone.is_empty())
            .unwrap_or("N/A")
    }

    /// Email with the placeholder used across order views.
    #[must_use]
    pub fn display_email(&self) -> &str {
        self.email
            .as_deref()
            .filter(|email| !email.is_empty())
            .unwrap_or("N/A")
    }
}

/// One order line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    /// Line total. Missing totals deserialize as zero so a partial payload
    /// still yields a priced order.
    #[serde(default)]
    pub total: Decimal,
}

const fn default_quantity() -> i64 {
    1
}

/// Product summary shown in list views: the first item's name plus the
/// total quantity across all items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub name: String,
    pub quantity: i64,
}

/// Shipping destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

/// Timestamp/location/remark of the most recent tracking event, empty
/// strings when unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastUpdate {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub remark: String,
}

/// One order, independent of which source produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalOrder {
    /// Opaque source-internal identifier. Unique within a source only, NOT
    /// across sources.
    pub id: String,
    /// Business-visible order number.
    pub order_id: String,
    /// Waybill number; absent until a courier is assigned. The cross-source
    /// deduplication key.
    pub awb: Option<String>,
    #[serde(default)]
    pub customer: Customer,
    pub status: ShipmentStatus,
    pub courier: Option<String>,
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    pub shipping_address: Option<ShippingAddress>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_update: LastUpdate,
    /// Provenance tag, attached at merge time and never persisted.
    #[serde(skip)]
    pub source: Source,
}

impl CanonicalOrder {
    /// Order total: the sum of line-item totals, zero when the list is
    /// empty.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        price::line_items_total(&self.line_items)
    }

    /// Order total formatted for display ("₹12.50").
    #[must_use]
    pub fn display_amount(&self) -> String {
        price::format_amount(self.amount())
    }

    /// Shortened business-visible rendering of the order number.
    #[must_use]
    pub fn display_order_id(&self) -> String {
        display_order_id(&self.order_id)
    }

    /// The non-empty waybill, if one is assigned. Orders without one cannot
    /// be deduplicated across sources.
    #[must_use]
    pub fn dedup_key(&self) -> Option<&str> {
        self.awb.as_deref().filter(|awb| !awb.is_empty())
    }

    /// Product summary for list views: first item's name, total quantity.
    #[must_use]
    pub fn product(&self) -> ProductSummary {
        let name = self
            .line_items
            .first()
            .map_or_else(|| "N/A".to_string(), |item| item.name.clone());
        let quantity = self.line_items.iter().map(|item| item.quantity).sum();
        ProductSummary { name, quantity }
    }
}

/// Shortened display rendering of a longer internal order id: a `#` prefix
/// plus the last eight characters, uppercased.
#[must_use]
pub fn display_order_id(order_id: &str) -> String {
    let skip = order_id.chars().count().saturating_sub(8);
    let tail: String = order_id.chars().skip(skip).collect();
    format!("#{}", tail.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::status::classify;

    fn order_with_items(items: Vec<LineItem>) -> CanonicalOrder {
        CanonicalOrder {
            id: "1".to_string(),
            order_id: "64f1c2aa9d01".to_string(),
            awb: Some("AWB100".to_string()),
            customer: Customer::default(),
            status: classify("Delivered"),
            courier: None,
            payment_mode: None,
            line_items: items,
            shipping_address: None,
            created_at: None,
            last_update: LastUpdate::default(),
            source: Source::Database,
        }
    }

    #[test]
    fn test_amount_sums_line_item_totals() {
        let order = order_with_items(vec![
            LineItem {
                name: "Bottle".to_string(),
                quantity: 1,
                total: Decimal::new(105, 1), // 10.5
            },
            LineItem {
                name: "Cap".to_string(),
                quantity: 2,
                total: Decimal::new(2, 0),
            },
        ]);
        assert_eq!(order.display_amount(), "₹12.50");
    }

    #[test]
    fn test_amount_defaults_to_zero_without_items() {
        let order = order_with_items(vec![]);
        assert_eq!(order.amount(), Decimal::ZERO);
        assert_eq!(order.display_amount(), "₹0.00");
    }

    #[test]
    fn test_display_order_id_shortens_and_prefixes() {
        let order = order_with_items(vec![]);
        assert_eq!(order.display_order_id(), "#C2AA9D01");
    }

    #[test]
    fn test_display_order_id_keeps_short_ids() {
        assert_eq!(display_order_id("1001"), "#1001");
    }

    #[test]
    fn test_dedup_key_ignores_empty_awb() {
        let mut order = order_with_items(vec![]);
        assert_eq!(order.dedup_key(), Some("AWB100"));
        order.awb = Some(String::new());
        assert_eq!(order.dedup_key(), None);
        order.awb = None;
        assert_eq!(order.dedup_key(), None);
    }

    #[test]
    fn test_customer_placeholders() {
        let customer = Customer::default();
        assert_eq!(customer.display_name(), "Guest");
        assert_eq!(customer.display_phone(), "N/A");
        assert_eq!(customer.display_email(), "N/A");

        let customer = Customer {
            name: Some("Priya Sharma".to_string()),
            phone: Some(String::new()),
            email: None,
        };
        assert_eq!(customer.display_name(), "Priya Sharma");
        assert_eq!(customer.display_phone(), "N/A");
    }

    #[test]
    fn test_product_summary() {
        let order = order_with_items(vec![
            LineItem {
                name: "Bottle".to_string(),
                quantity: 2,
                total: Decimal::ZERO,
            },
            LineItem {
                name: "Cap".to_string(),
                quantity: 3,
                total: Decimal::ZERO,
            },
        ]);
        let product = order.product();
        assert_eq!(product.name, "Bottle");
        assert_eq!(product.quantity, 5);
    }
}
