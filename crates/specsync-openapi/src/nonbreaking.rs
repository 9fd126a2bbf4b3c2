//! Merging from classified non-breaking differences
//!
//! Spec-comparison tools report additions as "non-breaking differences":
//! `path.add` at `paths.<path>` and `method.add` at `paths.<path>.<method>`.
//! [`merge_non_breaking`] applies such a report the same way the diff-driven
//! merge applies its additions. [`classify_non_breaking`] produces the report
//! locally from the path differ.

use crate::diff::{diff_documents, PathChange};
use crate::error::SpecError;
use crate::merge::{empty_overlay, insert_method, insert_path};
use crate::policy::{deep_merge, MergePolicy};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Code of a whole path added
pub const PATH_ADD: &str = "path.add";

/// Code of a method added under an existing path
pub const METHOD_ADD: &str = "method.add";

/// Operation keys of an OpenAPI path item
pub const HTTP_METHODS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];

const LOCATION_PREFIX: &str = "paths.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifferenceAction {
    Add,
    Remove,
}

/// Where a difference is, and the value found there
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDetail {
    pub location: String,
    pub value: Value,
}

/// One non-breaking difference between a source and a destination document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonBreakingDifference {
    pub action: DifferenceAction,
    pub code: String,
    #[serde(rename = "destinationSpecEntityDetails")]
    pub entity_details: Vec<EntityDetail>,
}

impl NonBreakingDifference {
    /// A whole path added at `route`
    #[must_use]
    pub fn path_added(route: &str, item: Value) -> Self {
        Self::added(PATH_ADD, format!("{LOCATION_PREFIX}{route}"), item)
    }

    /// `method` added under `route`
    #[must_use]
    pub fn method_added(route: &str, method: &str, operation: Value) -> Self {
        Self::added(METHOD_ADD, format!("{LOCATION_PREFIX}{route}.{method}"), operation)
    }

    fn added(code: &str, location: String, value: Value) -> Self {
        Self {
            action: DifferenceAction::Add,
            code: code.to_string(),
            entity_details: vec![EntityDetail { location, value }],
        }
    }

    /// Whether this difference contributes to a merge
    #[must_use]
    pub fn is_mergeable_addition(&self) -> bool {
        self.action == DifferenceAction::Add && (self.code == PATH_ADD || self.code == METHOD_ADD)
    }
}

/// Route of a `paths.<route>` location
fn route_of(location: &str) -> Result<&str, SpecError> {
    location
        .strip_prefix(LOCATION_PREFIX)
        .filter(|route| !route.is_empty())
        .ok_or_else(|| SpecError::InvalidLocation(location.to_string()))
}

/// Route and method of a `paths.<route>.<method>` location
///
/// Routes may contain dots themselves, so the method is the last segment.
fn route_and_method(location: &str) -> Result<(&str, &str), SpecError> {
    route_of(location)?
        .rsplit_once('.')
        .filter(|(route, method)| !route.is_empty() && !method.is_empty())
        .ok_or_else(|| SpecError::InvalidLocation(location.to_string()))
}

/// Merge the `path.add`/`method.add` additions of `differences` into `source`
///
/// Other codes and actions are ignored. Only the first entity detail of a
/// difference is used.
///
/// # Errors
///
/// [`SpecError::InvalidLocation`] when a location is not under `paths.`.
#[tracing::instrument(skip_all, fields(differences = differences.len()))]
pub fn merge_non_breaking(
    source: &Value,
    differences: &[NonBreakingDifference],
    policy: MergePolicy,
) -> Result<Value, SpecError> {
    let mut paths = Map::new();
    let mut applied = 0usize;
    for difference in differences.iter().filter(|d| d.is_mergeable_addition()) {
        let Some(detail) = difference.entity_details.first() else {
            tracing::debug!(code = %difference.code, "difference without entity details");
            continue;
        };
        if difference.code == PATH_ADD {
            insert_path(&mut paths, route_of(&detail.location)?, detail.value.clone());
        } else {
            let (route, method) = route_and_method(&detail.location)?;
            insert_method(&mut paths, route, method, detail.value.clone());
        }
        applied += 1;
    }

    tracing::info!(applied, "merging non-breaking additions");
    Ok(deep_merge(source, &empty_overlay(paths), policy))
}

/// Non-breaking additions from `source` to `destination`
///
/// Added paths become `path.add`; added HTTP methods under a shared path
/// become `method.add`. Other path-item keys (`parameters`, `summary`, ...)
/// and all removals are left out.
///
/// # Errors
///
/// [`SpecError::MissingPaths`] when either document has no `paths` object.
pub fn classify_non_breaking(source: &Value, destination: &Value) -> Result<Vec<NonBreakingDifference>, SpecError> {
    Ok(diff_documents(source, destination)?
        .into_iter()
        .filter(|entry| entry.kind == PathChange::Added)
        .filter_map(|entry| match entry.method() {
            None => Some(NonBreakingDifference::path_added(entry.route(), entry.value.clone())),
            Some(method) if HTTP_METHODS.contains(&method) => Some(NonBreakingDifference::method_added(
                entry.route(),
                method,
                entry.value.clone(),
            )),
            Some(_) => None,
        })
        .collect())
}
