//! Fingerprint index over a collection tree
//!
//! Provides [`CollectionIndex`], built by a single depth-first walk of the
//! *original* collection. Each fingerprintable request maps to its headers and
//! the breadcrumb it was found at. The index is read-only once built.

use crate::error::{kind_of, CollectionError};
use crate::fingerprint::{Fingerprint, RequestMeta};
use crate::node::{self, Node, Request};
use indexmap::IndexMap;
use serde_json::Value;
use specsync_artifact::{Breadcrumb, Crumb, NodeKind};

/// Indexed request: original headers and location
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Ordered header objects of the original request
    pub headers: Vec<Value>,

    /// Where the request lives in the original tree
    pub path: Breadcrumb,
}

impl IndexEntry {
    /// Id of the indexed request (last crumb)
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.path.last().and_then(|crumb| crumb.id.as_deref())
    }
}

/// Mapping from fingerprint to indexed request
///
/// Iteration follows discovery order (pre-order, arrays in index order).
#[derive(Debug, Clone, Default)]
pub struct CollectionIndex {
    entries: IndexMap<Fingerprint, IndexEntry>,
    root_id: Option<String>,
    skipped: usize,
}

impl CollectionIndex {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `collection` once and index every fingerprintable request
    ///
    /// Requests without a path component are skipped, and so are nodes that
    /// are neither objects nor arrays. When two requests share a
    /// fingerprint, the later one wins.
    #[tracing::instrument(skip_all, fields(root_id))]
    #[must_use]
    pub fn build(collection: &Value) -> Self {
        let root = node::collection_root(collection);
        let root_id = node::root_id(root).map(str::to_string);
        tracing::Span::current().record("root_id", root_id.as_deref().unwrap_or("-"));

        let mut index = Self {
            root_id: root_id.clone(),
            ..Self::default()
        };
        index.walk(root, &Breadcrumb::root(root_id));

        tracing::info!(
            entries = index.entries.len(),
            skipped = index.skipped,
            "indexed collection"
        );
        index
    }

    /// Like [`build`](Self::build), but rejects documents that are not objects
    ///
    /// # Errors
    ///
    /// [`CollectionError::NotAnObject`] when the (unwrapped) document is an
    /// array or a scalar.
    pub fn try_build(collection: &Value) -> Result<Self, CollectionError> {
        let root = node::collection_root(collection);
        if !root.is_object() {
            return Err(CollectionError::NotAnObject(kind_of(root)));
        }
        Ok(Self::build(collection))
    }

    fn walk(&mut self, value: &Value, trail: &Breadcrumb) {
        match Node::classify(value) {
            Node::Sequence(items) => {
                for (position, item) in items.iter().enumerate() {
                    let id = item.get("id").and_then(Value::as_str).map(str::to_string);
                    self.walk(item, &trail.child(Crumb::new(NodeKind::ItemGroup, id, position)));
                }
            }
            // group identity is already on the trail
            Node::Group(items) => self.walk(items, trail),
            Node::Request(request) => self.record(&request, trail.with_last_kind(NodeKind::Item)),
            Node::Ignored => {}
        }
    }

    fn record(&mut self, request: &Request<'_>, path: Breadcrumb) {
        let meta = RequestMeta::from_request(request);
        if !meta.has_path_component() {
            tracing::debug!(id = request.id(), "skipping request without path component");
            self.skipped += 1;
            return;
        }

        let fingerprint = meta.fingerprint();
        let entry = IndexEntry {
            headers: request.headers().to_vec(),
            path,
        };
        if let Some(previous) = self.entries.insert(fingerprint, entry) {
            tracing::debug!(
                fingerprint = %fingerprint.short(),
                replaced = previous.request_id().unwrap_or("-"),
                by = request.id(),
                "duplicate fingerprint"
            );
        }
    }

    /// Lookup by fingerprint
    #[inline]
    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&IndexEntry> {
        self.entries.get(fingerprint)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.entries.contains_key(fingerprint)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Owning identifier of the indexed collection
    #[inline]
    #[must_use]
    pub fn root_id(&self) -> Option<&str> {
        self.root_id.as_deref()
    }

    /// Requests skipped for lacking a path component
    #[inline]
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Entries in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &IndexEntry)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request(id: &str, method: &str, raw: &str) -> Value {
        json!({
            "id": id,
            "name": id,
            "request": {
                "method": method,
                "header": [{"key": "Accept", "value": "application/json"}],
                "url": {"raw": raw}
            },
            "response": []
        })
    }

    fn fingerprint_of(method: &str, raw: &str) -> Fingerprint {
        RequestMeta::from_raw(method, raw).fingerprint()
    }

    #[test]
    fn top_level_request_path() {
        let collection = json!({
            "info": {"uid": "11-root"},
            "item": [request("11-a", "GET", "{{baseUrl}}/users")]
        });
        let index = CollectionIndex::build(&collection);

        let entry = index.get(&fingerprint_of("GET", "{{baseUrl}}/users")).unwrap();
        assert_eq!(
            serde_json::to_value(&entry.path).unwrap(),
            json!([
                {"type": "collection", "id": "11-root", "index": 0},
                {"type": "item", "id": "11-a", "index": 0}
            ])
        );
        assert_eq!(entry.headers, vec![json!({"key": "Accept", "value": "application/json"})]);
        assert_eq!(index.root_id(), Some("11-root"));
    }

    #[test]
    fn nested_request_keeps_group_crumbs() {
        let collection = json!({
            "info": {"uid": "11-root"},
            "item": [
                request("11-a", "GET", "{{baseUrl}}/health"),
                {
                    "id": "11-folder",
                    "name": "users",
                    "item": [
                        request("11-b", "GET", "{{baseUrl}}/users"),
                        request("11-c", "DELETE", "{{baseUrl}}/users/:id")
                    ]
                }
            ]
        });
        let index = CollectionIndex::build(&collection);

        let entry = index.get(&fingerprint_of("DELETE", "{{baseUrl}}/users/:id")).unwrap();
        let kinds: Vec<_> = entry.path.iter().map(|c| (c.kind, c.id.clone(), c.index)).collect();
        assert_eq!(
            kinds,
            vec![
                (NodeKind::Collection, Some("11-root".into()), 0),
                (NodeKind::ItemGroup, Some("11-folder".into()), 1),
                (NodeKind::Item, Some("11-c".into()), 1),
            ]
        );
        assert_eq!(entry.request_id(), Some("11-c"));
    }

    #[test]
    fn requests_without_path_are_skipped() {
        let collection = json!({
            "info": {"uid": "11-root"},
            "item": [
                request("11-a", "GET", "{{baseUrl}}"),
                request("11-b", "GET", "{{baseUrl}}/?q=1"),
                request("11-c", "GET", "{{baseUrl}}/ok")
            ]
        });
        let index = CollectionIndex::build(&collection);
        assert_eq!(index.len(), 1);
        assert_eq!(index.skipped(), 2);
    }

    #[test]
    fn malformed_nodes_are_ignored() {
        let collection = json!({
            "info": {"uid": "11-root"},
            "item": [
                42,
                "text",
                null,
                {"name": "no id, no items"},
                request("11-a", "GET", "{{baseUrl}}/users")
            ]
        });
        let index = CollectionIndex::build(&collection);
        assert_eq!(index.len(), 1);

        let entry = index.get(&fingerprint_of("GET", "{{baseUrl}}/users")).unwrap();
        assert_eq!(entry.path.last().unwrap().index, 4);
    }

    #[test]
    fn duplicate_fingerprint_keeps_last() {
        let collection = json!({
            "info": {"uid": "11-root"},
            "item": [
                request("11-a", "GET", "{{baseUrl}}/users"),
                request("11-b", "get", "{{baseUrl}}/users?page=2")
            ]
        });
        let index = CollectionIndex::build(&collection);
        assert_eq!(index.len(), 1);
        assert_eq!(
            index.get(&fingerprint_of("GET", "{{baseUrl}}/users")).unwrap().request_id(),
            Some("11-b")
        );
    }

    #[test]
    fn raw_only_requests_keep_distinct_entries() {
        let collection = json!({
            "info": {"uid": "11-root"},
            "item": [
                request("11-a", "GET", "{{baseUrl}}/users"),
                request("11-b", "GET", "{{baseUrl}}/health")
            ]
        });
        let index = CollectionIndex::build(&collection);
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.get(&fingerprint_of("GET", "{{baseUrl}}/health")).unwrap().request_id(),
            Some("11-b")
        );
        assert!(index.get(&fingerprint_of("GET", "")).is_none());
    }

    #[test]
    fn envelope_is_unwrapped() {
        let collection = json!({
            "collection": {
                "info": {"uid": "11-root"},
                "item": [request("11-a", "GET", "{{baseUrl}}/users")]
            }
        });
        let index = CollectionIndex::build(&collection);
        assert_eq!(index.len(), 1);
        assert_eq!(index.root_id(), Some("11-root"));
    }

    #[test]
    fn try_build_rejects_non_objects() {
        assert_eq!(
            CollectionIndex::try_build(&json!([])).unwrap_err(),
            CollectionError::NotAnObject("array")
        );
        assert!(CollectionIndex::try_build(&json!({"item": []})).is_ok());
    }

    #[test]
    fn empty_collection() {
        let index = CollectionIndex::build(&json!({"info": {}, "item": []}));
        assert!(index.is_empty());
        assert_eq!(index.root_id(), None);
    }
}
