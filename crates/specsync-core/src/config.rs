//! Sync configuration
//!
//! Passed explicitly into [`SyncEngine`](crate::SyncEngine); nothing reads
//! configuration from global state.

use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use specsync_artifact::DEFAULT_COLLECTION_VERSION;
use specsync_openapi::MergePolicy;
use std::path::{Path, PathBuf};

/// Default location of the persisted diff artifact
pub const DEFAULT_DIFF_ARTIFACT_PATH: &str = "assets/diff/diff.json";

/// Sync configuration
///
/// Every field has a default, so an empty TOML document is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Version stamped into patch payloads
    pub collection_version: String,
    /// Owner prefix for fresh ids; derived from the root id when unset
    pub owner_override: Option<String>,
    /// Conflict policy of OpenAPI merges
    pub merge_policy: MergePolicy,
    /// Where the CLI writes diff artifacts
    pub diff_artifact_path: PathBuf,
}

impl SyncConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_collection_version(mut self, version: impl Into<String>) -> Self {
        self.collection_version = version.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_owner_override(mut self, owner: impl Into<String>) -> Self {
        self.owner_override = Some(owner.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_diff_artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.diff_artifact_path = path.into();
        self
    }

    /// Parse TOML text
    ///
    /// # Errors
    ///
    /// [`SyncError::Config`] for malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, SyncError> {
        toml::from_str(text).map_err(|e| SyncError::Config(e.to_string()))
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// [`SyncError::Io`] when the file cannot be read, [`SyncError::Config`]
    /// when it does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SyncError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SyncError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            collection_version: DEFAULT_COLLECTION_VERSION.to_string(),
            owner_override: None,
            merge_policy: MergePolicy::default(),
            diff_artifact_path: PathBuf::from(DEFAULT_DIFF_ARTIFACT_PATH),
        }
    }
}
