//! specsync Collection Engine
//!
//! Matches requests across two collection trees and turns the differences
//! into store patches.
//!
//! # Overview
//!
//! - **Fingerprint**: method + canonical URL, hashed; the identity of a request
//! - **CollectionIndex**: fingerprint → original headers and breadcrumb
//! - **Reconciler**: walks a new tree against an index and emits patches
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use specsync_collection::{CollectionIndex, Reconciler, SequentialIds};
//!
//! let original = json!({
//!     "info": {"uid": "42-root"},
//!     "item": [{"id": "42-a", "request": {"method": "GET", "url": {"raw": "{{base}}/users"}}}]
//! });
//! let new_tree = json!({
//!     "item": [
//!         {"id": "7-a", "request": {"method": "GET", "url": {"raw": "{{base}}/users"}}},
//!         {"id": "7-b", "request": {"method": "GET", "url": {"raw": "{{base}}/orders"}}}
//!     ]
//! });
//!
//! let index = CollectionIndex::build(&original);
//! let result = Reconciler::from_index(&index, SequentialIds::default())
//!     .unwrap()
//!     .reconcile(&new_tree);
//!
//! assert_eq!(result.patches.len(), 1);
//! assert_eq!(result.patches[0].id, "42-new0");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod fingerprint;
mod ids;
mod index;
mod node;
mod reconcile;

pub use error::CollectionError;
pub use fingerprint::{raw_has_path, Fingerprint, RequestMeta};
pub use ids::{IdSource, SequentialIds, UuidSource};
pub use index::{CollectionIndex, IndexEntry};
pub use node::{collection_root, root_id, strip_fields, strip_identifiers, Node, Request};
pub use reconcile::{merge_headers, ReconcileStats, Reconciler, Reconciliation};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
