//! specsync Artifact Types
//!
//! Leaf types shared by the collection and OpenAPI engines.
//!
//! # Core Concepts
//!
//! - [`ContentHash`]: 32-byte blake3 hash used as request identity
//! - [`Breadcrumb`]: persistent location trail inside a collection tree
//! - [`PatchRecord`]: one create/update instruction for a document store
//! - [`PatchPayload`]: ordered patches stamped with a collection version
//!
//! # Example
//!
//! ```rust
//! use specsync_artifact::{Breadcrumb, Crumb, NodeKind, PatchEntity, PatchRecord};
//! use serde_json::json;
//!
//! let root = Breadcrumb::root(Some("42-abc".to_string()));
//! let path = root.child(Crumb::with_id(NodeKind::Item, "42-new", 0));
//! let patch = PatchRecord::create(PatchEntity::Item, "42-new", json!({"name": "x"}), path);
//! assert_eq!(patch.identifier, "new");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod breadcrumb;
mod hash;
mod patch;

pub use breadcrumb::{Breadcrumb, Crumb, NodeKind};
pub use hash::ContentHash;
pub use patch::{
    identifier_of, owner_of, PatchAction, PatchEntity, PatchPayload, PatchRecord, PayloadEntity,
    DEFAULT_COLLECTION_VERSION,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
