//! specsync Core
//!
//! Keeps request collections and OpenAPI documents in sync without
//! destroying unrelated content.
//!
//! # Architecture
//!
//! ```text
//! original collection ──► CollectionIndex ──┐
//!                                           ├─► Reconciler ──► PatchPayload
//! new collection ───────────────────────────┘
//!
//! base spec ──┐
//!             ├─► path differ ──► additions overlay ──► deep_merge ──► merged spec
//! candidate ──┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use specsync_core::{SyncConfig, SyncEngine};
//!
//! let engine = SyncEngine::new(SyncConfig::default());
//! let base = json!({"paths": {"/users": {"get": {}}}});
//! let candidate = json!({"paths": {"/users": {"get": {}}, "/orders": {"post": {}}}});
//!
//! let diff = engine.diff_schemas(&base, &candidate).unwrap();
//! assert_eq!(diff.patches.len(), 1);
//!
//! let merged = engine.merge_schemas(&base, &candidate).unwrap();
//! assert!(merged["paths"].get("/orders").is_some());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod sync;

pub use config::{SyncConfig, DEFAULT_DIFF_ARTIFACT_PATH};
pub use error::{Result, SyncError};
pub use sync::SyncEngine;

// Re-exports
pub use specsync_artifact::{Breadcrumb, Crumb, NodeKind, PatchAction, PatchEntity, PatchPayload, PatchRecord};
pub use specsync_collection::{CollectionIndex, IdSource, SequentialIds, UuidSource};
pub use specsync_openapi::{ArrayPolicy, DiffArtifact, MergePolicy, PathChange, PathDiffEntry, ScalarPolicy, SchemaFormat};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
