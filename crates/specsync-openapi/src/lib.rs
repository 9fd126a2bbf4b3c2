//! specsync OpenAPI Engine
//!
//! Additive-only diffing and merging of OpenAPI path maps.
//!
//! # Overview
//!
//! - [`deep_diff`]: generic structural diff (new, deleted, edited, array)
//! - [`diff_paths`]: added/deleted paths and methods only; edits are dropped
//! - [`merge_openapi`]: deep-merges the additions of a candidate into a base
//! - [`merge_non_breaking`]: the same, driven by a `path.add`/`method.add` report
//! - [`MergePolicy`]: array and scalar conflict rules of [`deep_merge`]
//! - [`generate_openapi`]: candidate document built from observed transactions
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use specsync_openapi::{merge_openapi, MergePolicy};
//!
//! let base = json!({"info": {"title": "api"}, "paths": {"/users": {"get": {}}}});
//! let candidate = json!({"paths": {"/users": {"get": {}, "post": {}}}});
//!
//! let merged = merge_openapi(&base, &candidate, MergePolicy::default()).unwrap();
//! assert_eq!(merged["paths"]["/users"], json!({"get": {}, "post": {}}));
//! assert_eq!(merged["info"]["title"], "api");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod diff;
mod error;
mod format;
mod generate;
mod merge;
mod nonbreaking;
mod policy;

pub use diff::{
    deep_diff, diff_documents, diff_paths, path_entries, paths_of, DiffArtifact, DiffKind, Difference, Key,
    PathChange, PathDiffEntry,
};
pub use error::{Side, SpecError};
pub use format::SchemaFormat;
pub use generate::{
    convert_path, generate_openapi, has_path_params, header_params, path_params, response_description, route_path,
    servers, Parameter, ParameterLocation, Server, DEFAULT_TITLE, EXCLUDED_HEADERS,
};
pub use merge::{build_overlay, merge_openapi};
pub use nonbreaking::{
    classify_non_breaking, merge_non_breaking, DifferenceAction, EntityDetail, NonBreakingDifference,
    HTTP_METHODS, METHOD_ADD, PATH_ADD,
};
pub use policy::{deep_merge, ArrayPolicy, MergePolicy, ScalarPolicy};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
