//! Source provenance tag.

use serde::{Deserialize, Serialize};

/// Which source produced a record.
///
/// Attached at merge/normalization time; never persisted with the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Local persistent store. Authoritative: it wins cross-source ties.
    #[default]
    Database,
    /// Third-party logistics API.
    Api,
}

impl Source {
    /// Stable wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Api => "api",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
