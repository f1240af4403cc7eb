//! Shipment status vocabulary and free-text classification.
//!
//! Upstream sources report status as free text ("Shipment Out for Delivery",
//! "RTO Initiated", ...). Classification into the closed canonical set
//! happens through one ordered rule table so precedence is auditable in a
//! single place rather than scattered through conditionals.

use serde::{Deserialize, Serialize};

/// Canonical shipment status.
///
/// This vocabulary is the one cross-component contract badge colors and
/// filter dropdowns are keyed off, so the wire labels are stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ShipmentStatus {
    Delivered,
    InTransit,
    /// Non-Delivery Report - a courier-reported failed delivery attempt.
    Ndr,
    /// Return to Origin.
    Rto,
    Lost,
    Pending,
    /// Free-text status that matched no classification rule, passed through
    /// verbatim.
    Other(String),
}

impl ShipmentStatus {
    /// Stable display label for this status.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Delivered => "Delivered",
            Self::InTransit => "In Transit",
            Self::Ndr => "NDR",
            Self::Rto => "RTO",
            Self::Lost => "Lost",
            Self::Pending => "Pending",
            Self::Other(raw) => raw,
        }
    }

    /// Default badge class for this bucket.
    ///
    /// Classification from free text can refine this per sub-case; see
    /// [`classify_with_badge`].
    #[must_use]
    pub const fn badge_class(&self) -> &'static str {
        match self {
            Self::Delivered => "badge badge-success",
            Self::InTransit => "badge badge-info",
            Self::Ndr | Self::Lost => "badge badge-destructive",
            Self::Rto => "badge badge-return",
            Self::Pending => "badge badge-warning",
            Self::Other(_) => "badge badge-neutral",
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<ShipmentStatus> for String {
    fn from(status: ShipmentStatus) -> Self {
        status.label().to_string()
    }
}

impl From<String> for ShipmentStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Delivered" => Self::Delivered,
            "In Transit" => Self::InTransit,
            "NDR" => Self::Ndr,
            "RTO" => Self::Rto,
            "Lost" => Self::Lost,
            "Pending" => Self::Pending,
            _ => Self::Other(label),
        }
    }
}

/// Ordered classification rules: (case-insensitive substring, bucket, badge
/// class for the sub-case). First match wins.
///
/// `undelivered` is deliberately not an NDR keyword - it contains
/// `delivered` and the first rule would claim it anyway.
const CLASSIFY_RULES: &[(&str, ShipmentStatus, &str)] = &[
    ("delivered", ShipmentStatus::Delivered, "badge badge-success"),
    ("out for delivery", ShipmentStatus::InTransit, "badge badge-info"),
    ("transit", ShipmentStatus::InTransit, "badge badge-info"),
    ("shipped", ShipmentStatus::InTransit, "badge badge-info"),
    ("pickup", ShipmentStatus::InTransit, "badge badge-warning"),
    ("ndr", ShipmentStatus::Ndr, "badge badge-destructive"),
    ("rto", ShipmentStatus::Rto, "badge badge-return"),
    ("return", ShipmentStatus::Rto, "badge badge-return"),
    ("lost", ShipmentStatus::Lost, "badge badge-destructive"),
    ("pending", ShipmentStatus::Pending, "badge badge-warning"),
    ("created", ShipmentStatus::Pending, "badge badge-warning"),
];

/// Classify a free-text status string into the canonical set.
///
/// Pure function: same input, same output, no side effects. Unmatched input
/// passes through as [`ShipmentStatus::Other`].
#[must_use]
pub fn classify(raw: &str) -> ShipmentStatus {
    classify_with_badge(raw).0
}

/// Classify a free-text status string, also returning the badge class for
/// the matched sub-case (sub-cases within one bucket can carry distinct
/// colors).
#[must_use]
pub fn classify_with_badge(raw: &str) -> (ShipmentStatus, &'static str) {
    let lowered = raw.to_lowercase();
    for (needle, status, badge) in CLASSIFY_RULES {
        if lowered.contains(needle) {
            return (status.clone(), *badge);
        }
    }
    (ShipmentStatus::Other(raw.to_string()), "badge badge-neutral")
}
