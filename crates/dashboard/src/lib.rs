//! Shipdesk dashboard core - multi-source order & tracking reconciliation.
//!
//! Merges order records from the local PostgreSQL store and the Shiprocket
//! logistics API into one deduplicated canonical collection, and normalizes
//! heterogeneous tracking payloads into one uniform timeline used by both
//! authenticated and public tracking views.
//!
//! # Architecture
//!
//! - [`source`] - the uniform adapter seam over both data sources
//! - [`reconcile`] - merge, filter, and paginate the combined collection
//! - [`tracking`] - shape detection and normalization of tracking payloads
//! - [`refresh`] - owned polling timer for live views
//! - [`sync`] - explicit channel pull with cache invalidation
//!
//! Transport, auth, and rendering are external collaborators; this crate
//! exposes the contracts those layers consume and nothing else.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod reconcile;
pub mod refresh;
pub mod shiprocket;
pub mod source;
pub mod sync;
pub mod tracking;

pub use cache::ListingCache;
pub use error::{AppError, SourceError};
pub use reconcile::{OrderFilters, OrderListing, OrderReconciler};
pub use refresh::RefreshScheduler;
pub use sync::{SyncCoordinator, SyncOutcome, SyncScope};
