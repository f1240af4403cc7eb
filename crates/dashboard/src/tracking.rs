//! Tracking payload normalization.
//!
//! Two payload shapes reach the tracking views: the logistics API's nested
//! `tracking_data` response and the local store's flat
//! `order`/`tracking`/`client` record. Shape detection is a tagged parse -
//! each candidate schema is tried in turn - rather than key probing, so the
//! branch is exhaustive and testable on its own.
//!
//! An unrecognized shape normalizes to the empty snapshot, which callers
//! treat exactly like a valid empty result ("not found"). Missing optional
//! fields stay absent; placeholder text is a presentation concern.

use serde::Deserialize;
use serde_json::Value;

use shipdesk_core::{
    Customer, EventOrder, ProductSummary, ShippingAddress, Source, TrackingEvent,
    TrackingSnapshot, classify,
};

// =============================================================================
// Database shape
// =============================================================================

/// Flat payload shape produced by the local store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseTrackingPayload {
    pub order: DbOrderSection,
    pub tracking: DbTrackingSection,
    #[serde(default)]
    pub client: Option<DbClientSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DbOrderSection {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_quantity: Option<i64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DbTrackingSection {
    #[serde(default)]
    pub awb: Option<String>,
    #[serde(default)]
    pub courier: Option<String>,
    #[serde(default)]
    pub current_status: Option<String>,
    #[serde(default)]
    pub etd: Option<String>,
    /// Event list, passed through as-is (the store already uses the
    /// canonical field names).
    #[serde(default)]
    pub tracking_history: Vec<TrackingEvent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DbClientSection {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

// =============================================================================
// API shape
// =============================================================================

/// Nested payload shape produced by the logistics API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiTrackingPayload {
    #[serde(default)]
    pub order: Option<ApiOrderSection>,
    pub tracking_data: ApiTrackingData,
}

/// Order-level fields, used as fallbacks when the shipment track omits
/// them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiOrderSection {
    #[serde(default)]
    pub channel_order_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub courier: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub etd: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    #[serde(default)]
    pub customer_city: Option<String>,
    #[serde(default)]
    pub customer_state: Option<String>,
    #[serde(default)]
    pub customer_pincode: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_quantity: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiTrackingData {
    #[serde(default)]
    pub shipment_track: Vec<ApiShipmentTrack>,
    #[serde(default)]
    pub shipment_track_activities: Vec<ApiTrackActivity>,
    #[serde(default)]
    pub etd: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiShipmentTrack {
    #[serde(default)]
    pub awb_code: Option<String>,
    #[serde(default)]
    pub courier_name: Option<String>,
    #[serde(default)]
    pub current_status: Option<String>,
    /// Estimated delivery date as the courier reports it.
    #[serde(default)]
    pub edd: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiTrackActivity {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

// =============================================================================
// Shape detection & normalization
// =============================================================================

/// Outcome of shape detection.
#[derive(Debug)]
pub enum TrackingPayload {
    Database(Box<DatabaseTrackingPayload>),
    Api(Box<ApiTrackingPayload>),
    Unrecognized,
}

/// Detect which source shape a raw payload is, without normalizing it.
///
/// The database shape is tried first. The two shapes are disjoint on their
/// required keys (`tracking` vs `tracking_data`), so the order only matters
/// for pathological payloads carrying both.
#[must_use]
pub fn parse_payload(value: &Value) -> TrackingPayload {
    if let Ok(payload) = serde_json::from_value::<DatabaseTrackingPayload>(value.clone()) {
        return TrackingPayload::Database(Box::new(payload));
    }
    if let Ok(payload) = serde_json::from_value::<ApiTrackingPayload>(value.clone()) {
        return TrackingPayload::Api(Box::new(payload));
    }
    TrackingPayload::Unrecognized
}

/// Normalize any raw tracking payload into a canonical snapshot.
///
/// Unrecognized shapes yield the empty snapshot - indistinguishable from a
/// valid empty result, which keeps the public tracking page's messaging
/// uniform regardless of cause.
#[must_use]
pub fn normalize(value: &Value) -> TrackingSnapshot {
    match parse_payload(value) {
        TrackingPayload::Database(payload) => normalize_database(*payload),
        TrackingPayload::Api(payload) => normalize_api(*payload),
        TrackingPayload::Unrecognized => TrackingSnapshot::empty(),
    }
}

/// Normalize the flat database shape. Events pass through untouched; the
/// store's feed is oldest-first.
#[must_use]
pub fn normalize_database(payload: DatabaseTrackingPayload) -> TrackingSnapshot {
    let DatabaseTrackingPayload {
        order,
        tracking,
        client,
    } = payload;
    let client = client.unwrap_or_default();
    let status = tracking.current_status.as_deref().map(classify);

    TrackingSnapshot {
        source: Some(Source::Database),
        awb: tracking.awb,
        order_id: order.order_id,
        courier: tracking.courier,
        current_status: tracking.current_status,
        status,
        etd: tracking.etd,
        customer: Customer {
            name: client.name,
            phone: client.phone,
            email: client.email,
        },
        shipping_address: address_from(order.address, order.city, order.state, order.pincode),
        product: order.product_name.map(|name| ProductSummary {
            name,
            quantity: order.product_quantity.unwrap_or(1),
        }),
        event_order: EventOrder::OldestFirst,
        tracking_history: tracking.tracking_history,
    }
}

/// Normalize the nested API shape.
///
/// The first shipment-track entry is preferred over the order-level
/// fallbacks for courier, status, and estimated delivery; first non-empty
/// value in the chain wins. The API feed is newest-first.
#[must_use]
pub fn normalize_api(payload: ApiTrackingPayload) -> TrackingSnapshot {
    let ApiTrackingPayload {
        order,
        tracking_data,
    } = payload;
    let order = order.unwrap_or_default();
    let track = tracking_data
        .shipment_track
        .into_iter()
        .next()
        .unwrap_or_default();

    let courier = first_non_empty([track.courier_name, order.courier]);
    let current_status = first_non_empty([track.current_status, order.status]);
    let etd = first_non_empty([track.edd, tracking_data.etd, order.etd]);
    let status = current_status.as_deref().map(classify);

    let tracking_history = tracking_data
        .shipment_track_activities
        .into_iter()
        .map(|activity| TrackingEvent {
            timestamp: activity.date,
            location: activity.location,
            status: activity.status,
            activity: activity.activity,
        })
        .collect();

    TrackingSnapshot {
        source: Some(Source::Api),
        awb: track.awb_code.filter(|awb| !awb.is_empty()),
        order_id: order.channel_order_id,
        courier,
        current_status,
        status,
        etd,
        customer: Customer {
            name: order.customer_name,
            phone: order.customer_phone,
            email: order.customer_email,
        },
        shipping_address: address_from(
            order.customer_address,
            order.customer_city,
            order.customer_state,
            order.customer_pincode,
        ),
        product: order.product_name.map(|name| ProductSummary {
            name,
            quantity: order.product_quantity.unwrap_or(1),
        }),
        event_order: EventOrder::NewestFirst,
        tracking_history,
    }
}

/// First non-empty value in a fallback chain.
fn first_non_empty<const N: usize>(chain: [Option<String>; N]) -> Option<String> {
    chain.into_iter().flatten().find(|value| !value.is_empty())
}

fn address_from(
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    pincode: Option<String>,
) -> Option<ShippingAddress> {
    if address.is_none() && city.is_none() && state.is_none() && pincode.is_none() {
        return None;
    }
    Some(ShippingAddress {
        address,
        city,
        state,
        pincode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shipdesk_core::ShipmentStatus;

    fn api_payload() -> Value {
        json!({
            "order": {
                "channel_order_id": "SHOP-1042",
                "customer_name": "Priya Sharma",
                "courier": "Stale Courier Name",
                "status": "Pickup Scheduled",
                "product_name": "Steel Bottle",
                "product_quantity": 2
            },
            "tracking_data": {
                "etd": "2026-07-20",
                "shipment_track": [{
                    "awb_code": "AWB100",
                    "courier_name": "Delhivery",
                    "current_status": "Out for Delivery",
                    "edd": "2026-07-18"
                }],
                "shipment_track_activities": [
                    { "date": "2026-07-17 09:12:00", "status": "Out for Delivery",
                      "activity": "Shipment out for delivery", "location": "Mumbai Hub" },
                    { "date": "2026-07-16 20:40:00", "status": "In Transit",
                      "activity": "Arrived at facility", "location": "Bhiwandi" }
                ]
            }
        })
    }

    fn database_payload() -> Value {
        json!({
            "order": {
                "order_id": "SHOP-1042",
                "product_name": "Steel Bottle",
                "product_quantity": 2,
                "city": "Mumbai",
                "pincode": "400001"
            },
            "tracking": {
                "awb": "AWB100",
                "courier": "Delhivery",
                "current_status": "Out for Delivery",
                "etd": "2026-07-18",
                "tracking_history": [
                    { "timestamp": "2026-07-16 20:40:00", "status": "In Transit",
                      "location": "Bhiwandi" },
                    { "timestamp": "2026-07-17 09:12:00", "status": "Out for Delivery",
                      "location": "Mumbai Hub" }
                ]
            },
            "client": { "name": "Priya Sharma" }
        })
    }

    #[test]
    fn test_api_shape_detected_and_normalized() {
        let snapshot = normalize(&api_payload());
        assert_eq!(snapshot.source, Some(Source::Api));
        assert_eq!(snapshot.awb.as_deref(), Some("AWB100"));
        assert_eq!(snapshot.order_id.as_deref(), Some("SHOP-1042"));
        assert_eq!(snapshot.event_order, EventOrder::NewestFirst);
        assert_eq!(snapshot.tracking_history.len(), 2);
        let first = snapshot.tracking_history.first().expect("two events");
        assert_eq!(first.location.as_deref(), Some("Mumbai Hub"));
        assert_eq!(first.timestamp.as_deref(), Some("2026-07-17 09:12:00"));
    }

    #[test]
    fn test_api_shipment_track_wins_over_order_fallbacks() {
        let snapshot = normalize(&api_payload());
        assert_eq!(snapshot.courier.as_deref(), Some("Delhivery"));
        assert_eq!(snapshot.current_status.as_deref(), Some("Out for Delivery"));
        assert_eq!(snapshot.etd.as_deref(), Some("2026-07-18"));
        assert_eq!(snapshot.status, Some(ShipmentStatus::InTransit));
    }

    #[test]
    fn test_api_falls_back_to_order_fields() {
        let snapshot = normalize(&json!({
            "order": { "courier": "Ecom Express", "status": "Shipped", "etd": "2026-07-21" },
            "tracking_data": {
                "shipment_track": [{ "awb_code": "AWB300", "courier_name": "" }]
            }
        }));
        assert_eq!(snapshot.courier.as_deref(), Some("Ecom Express"));
        assert_eq!(snapshot.current_status.as_deref(), Some("Shipped"));
        assert_eq!(snapshot.etd.as_deref(), Some("2026-07-21"));
    }

    #[test]
    fn test_database_shape_detected_and_normalized() {
        let snapshot = normalize(&database_payload());
        assert_eq!(snapshot.source, Some(Source::Database));
        assert_eq!(snapshot.awb.as_deref(), Some("AWB100"));
        assert_eq!(snapshot.event_order, EventOrder::OldestFirst);
        assert_eq!(snapshot.tracking_history.len(), 2);
        assert_eq!(snapshot.customer.name.as_deref(), Some("Priya Sharma"));
        let address = snapshot.shipping_address.expect("city present");
        assert_eq!(address.city.as_deref(), Some("Mumbai"));
        assert_eq!(snapshot.status, Some(ShipmentStatus::InTransit));
    }

    #[test]
    fn test_equivalent_payloads_normalize_equal_modulo_source() {
        let api = normalize(&api_payload());
        let database = normalize(&database_payload());
        assert_eq!(api.awb, database.awb);
        assert_eq!(api.status, database.status);
        assert_eq!(api.current_status, database.current_status);
        assert_eq!(api.tracking_history.len(), database.tracking_history.len());
        assert_ne!(api.source, database.source);
    }

    #[test]
    fn test_unrecognized_shape_yields_empty_snapshot() {
        let snapshot = normalize(&json!({ "unexpected": true }));
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.source, None);

        let snapshot = normalize(&json!("not even an object"));
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_missing_optional_fields_stay_absent() {
        let snapshot = normalize(&json!({
            "order": {},
            "tracking": { "awb": "AWB900" }
        }));
        assert_eq!(snapshot.awb.as_deref(), Some("AWB900"));
        assert!(snapshot.courier.is_none());
        assert!(snapshot.current_status.is_none());
        assert!(snapshot.status.is_none());
        assert!(snapshot.tracking_history.is_empty());
    }
}
