//! Core types for Shipdesk.
//!
//! The canonical representations every component exchanges, independent of
//! which source produced them.

pub mod order;
pub mod price;
pub mod source;
pub mod status;
pub mod tracking;

pub use order::{
    CanonicalOrder, Customer, LastUpdate, LineItem, ProductSummary, ShippingAddress,
    display_order_id,
};
pub use price::{CURRENCY_SYMBOL, format_amount, line_items_total};
pub use source::Source;
pub use status::{ShipmentStatus, classify, classify_with_badge};
pub use tracking::{EventOrder, TrackingEvent, TrackingSnapshot};
