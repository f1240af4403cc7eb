//! Canonical tracking timeline types.

use serde::{Deserialize, Serialize};

use super::order::{Customer, ProductSummary, ShippingAddress};
use super::source::Source;
use super::status::ShipmentStatus;

/// One point in a shipment's history.
///
/// Missing fields stay absent here; placeholders are a presentation
/// concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    /// ISO-8601 instant or date. Source payloads vary in precision, so the
    /// value is carried verbatim.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Free-text status label from the source (e.g. "Out for Delivery").
    #[serde(default)]
    pub status: Option<String>,
    /// Free-text narrative, when the source provides one.
    #[serde(default)]
    pub activity: Option<String>,
}

impl TrackingEvent {
    /// Location with the placeholder used by tracking views.
    #[must_use]
    pub fn display_location(&self) -> &str {
        self.location
            .as_deref()
            .filter(|location| !location.is_empty())
            .unwrap_or("Unknown location")
    }
}

/// Chronological direction of a snapshot's event list.
///
/// Sources do not share a consistent direction, so the snapshot carries the
/// direction it was supplied in instead of re-sorting; presentation
/// decides how to display it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Normalized view of "where is this shipment now".
///
/// Built from either source's tracking payload; rebuilt in full on every
/// fetch, never patched incrementally. Carries only presentation-safe
/// fields - the same snapshot serves authenticated and public tracking
/// views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingSnapshot {
    /// Which source shape produced this snapshot. `None` only for the
    /// empty snapshot.
    pub source: Option<Source>,
    pub awb: Option<String>,
    pub order_id: Option<String>,
    pub courier: Option<String>,
    /// Raw status label from the source.
    pub current_status: Option<String>,
    /// Classified status bucket for badges and filters.
    pub status: Option<ShipmentStatus>,
    /// Estimated delivery date, as supplied by the source.
    pub etd: Option<String>,
    #[serde(default)]
    pub customer: Customer,
    pub shipping_address: Option<ShippingAddress>,
    pub product: Option<ProductSummary>,
    #[serde(default)]
    pub event_order: EventOrder,
    #[serde(default)]
    pub tracking_history: Vec<TrackingEvent>,
}

impl TrackingSnapshot {
    /// The snapshot representing "nothing found": every field absent.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the snapshot carries no shipment data. Callers treat this
    /// as "not found", not as a distinguishable error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.awb.is_none() && self.current_status.is_none() && self.tracking_history.is_empty()
    }
}
