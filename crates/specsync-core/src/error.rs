//! Error types for specsync Core

use specsync_collection::CollectionError;
use specsync_openapi::SpecError;
use std::path::PathBuf;

/// Main sync error type
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Collection could not be reconciled
    #[error("collection error: {0}")]
    Collection(#[from] CollectionError),

    /// OpenAPI diff or merge failed
    #[error("openapi error: {0}")]
    Spec(#[from] SpecError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// File could not be read or written
    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Whether the error is the "identical path maps" hard stop of a merge
    #[inline]
    #[must_use]
    pub fn is_no_diff(&self) -> bool {
        matches!(self, Self::Spec(e) if e.is_no_diff())
    }
}

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
