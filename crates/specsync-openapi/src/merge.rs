//! Additive-only OpenAPI merge
//!
//! New paths and methods of a candidate document are collected into an
//! overlay `{"info": {}, "paths": {...}}` which is then deep-merged onto the
//! base. Nothing the base already has is removed; edited operations are left
//! as they are in the base.

use crate::diff::{deep_diff, path_entries, paths_of, PathDiffEntry};
use crate::error::{Side, SpecError};
use crate::policy::{deep_merge, MergePolicy};
use serde_json::{json, Map, Value};

/// Overlay holding only the added entries
#[must_use]
pub fn build_overlay(entries: &[PathDiffEntry]) -> Value {
    let mut paths = Map::new();
    for entry in entries.iter().filter(|e| e.is_added()) {
        match entry.method() {
            None => insert_path(&mut paths, entry.route(), entry.value.clone()),
            Some(method) => insert_method(&mut paths, entry.route(), method, entry.value.clone()),
        }
    }
    empty_overlay(paths)
}

pub(crate) fn empty_overlay(paths: Map<String, Value>) -> Value {
    json!({ "info": {}, "paths": Value::Object(paths) })
}

pub(crate) fn insert_path(paths: &mut Map<String, Value>, route: &str, item: Value) {
    paths.insert(route.to_string(), item);
}

/// Add `method` under `route`, creating the path item when needed
pub(crate) fn insert_method(paths: &mut Map<String, Value>, route: &str, method: &str, operation: Value) {
    let item = paths
        .entry(route.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    match item {
        Value::Object(methods) => {
            methods.insert(method.to_string(), operation);
        }
        other => {
            let mut methods = Map::new();
            methods.insert(method.to_string(), operation);
            *other = Value::Object(methods);
        }
    }
}

/// Merge the paths and methods `candidate` adds into `base`
///
/// # Errors
///
/// - [`SpecError::MissingPaths`] when either document has no `paths` object
/// - [`SpecError::NoDiff`] when both path maps are structurally identical
#[tracing::instrument(skip_all, fields(policy = ?policy))]
pub fn merge_openapi(base: &Value, candidate: &Value, policy: MergePolicy) -> Result<Value, SpecError> {
    let base_paths = paths_of(base, Side::Base)?;
    let candidate_paths = paths_of(candidate, Side::Candidate)?;

    let differences = deep_diff(base_paths, candidate_paths);
    if differences.is_empty() {
        tracing::warn!("path maps are identical, refusing to merge");
        return Err(SpecError::NoDiff);
    }

    let entries = path_entries(&differences);
    let overlay = build_overlay(&entries);
    tracing::info!(
        differences = differences.len(),
        added = entries.iter().filter(|e| e.is_added()).count(),
        "merging additions"
    );
    Ok(deep_merge(base, &overlay, policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::PathChange;
    use pretty_assertions::assert_eq;

    fn op(summary: &str) -> Value {
        json!({"summary": summary})
    }

    fn spec(paths: Value) -> Value {
        json!({"openapi": "3.0.0", "info": {"title": "api", "version": "1.0.0"}, "paths": paths})
    }

    #[test]
    fn overlay_groups_methods_under_paths() {
        let entries = vec![
            PathDiffEntry {
                kind: PathChange::Added,
                path: vec!["/a".into(), "get".into()],
                value: op("a"),
            },
            PathDiffEntry {
                kind: PathChange::Added,
                path: vec!["/a".into(), "post".into()],
                value: op("b"),
            },
            PathDiffEntry {
                kind: PathChange::Deleted,
                path: vec!["/gone".into()],
                value: json!({}),
            },
        ];
        assert_eq!(
            build_overlay(&entries),
            json!({"info": {}, "paths": {"/a": {"get": op("a"), "post": op("b")}}})
        );
    }

    #[test]
    fn adds_new_path_and_method() {
        let base = spec(json!({"/users": {"get": op("list")}}));
        let candidate = spec(json!({
            "/users": {"get": op("list"), "post": op("create")},
            "/orders": {"get": op("orders")}
        }));

        let merged = merge_openapi(&base, &candidate, MergePolicy::default()).unwrap();
        assert_eq!(
            merged["paths"],
            json!({
                "/users": {"get": op("list"), "post": op("create")},
                "/orders": {"get": op("orders")}
            })
        );
        assert_eq!(merged["info"], base["info"]);
    }

    #[test]
    fn base_only_entries_survive() {
        let base = spec(json!({"/users": {"get": op("list"), "delete": op("purge")}, "/legacy": {}}));
        let candidate = spec(json!({"/users": {"get": op("renamed")}}));

        let merged = merge_openapi(&base, &candidate, MergePolicy::default()).unwrap();
        assert_eq!(merged, base);
    }

    #[test]
    fn identical_paths_fail() {
        let base = spec(json!({"/users": {"get": op("list")}}));
        let candidate = json!({"paths": {"/users": {"get": op("list")}}, "info": {"title": "other"}});

        let err = merge_openapi(&base, &candidate, MergePolicy::default()).unwrap_err();
        assert!(err.is_no_diff());
    }

    #[test]
    fn missing_paths_fail() {
        let err = merge_openapi(&json!({}), &spec(json!({})), MergePolicy::default()).unwrap_err();
        assert!(matches!(err, SpecError::MissingPaths { side: Side::Base }));
    }

    #[test]
    fn unrelated_arrays_are_not_duplicated() {
        let mut base = spec(json!({"/users": {"get": op("list")}}));
        base["tags"] = json!([{"name": "users"}]);
        let candidate = spec(json!({"/users": {"get": op("list")}, "/orders": {}}));

        let merged = merge_openapi(&base, &candidate, MergePolicy::default()).unwrap();
        assert_eq!(merged["tags"], json!([{"name": "users"}]));
        assert_eq!(merged["paths"]["/orders"], json!({}));
    }
}
