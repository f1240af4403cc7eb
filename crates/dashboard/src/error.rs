//! Unified error handling for the reconciliation core.

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::shiprocket::ShiprocketError;

/// Why a single source could not produce data.
///
/// Every variant is handled the same way by callers: the source is
/// unavailable for this request and the other source's data is still
/// returned.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The logistics API failed (network, non-success status, or malformed
    /// body).
    #[error("api source unavailable: {0}")]
    Api(#[from] ShiprocketError),

    /// The local store failed.
    #[error("database source unavailable: {0}")]
    Database(#[from] RepositoryError),
}

/// Application-level error type for reconciliation operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Both sources failed for the same request. Single-source failures
    /// never surface here; they degrade silently.
    #[error("all sources unavailable (database: {database}; api: {api})")]
    AllSourcesUnavailable {
        database: SourceError,
        api: SourceError,
    },

    /// No shipment matches the requested AWB in any reachable source.
    /// Unrecognized payload shapes land here too, so the public tracking
    /// page's message stays uniform regardless of cause.
    #[error("no shipment found for {0}")]
    NotFound(String),

    /// Configuration failed to load.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
