//! Tree reconciliation
//!
//! Walks a *new* collection tree against a [`CollectionIndex`] of the
//! original and emits the patches that bring the stored original up to date:
//!
//! - unknown request → `create` item, placed under the root at index 0
//! - known request with new headers → `update` item with the header union
//! - every response of a known request → `create` response under it
//!
//! Patches come out in visiting order (pre-order, arrays in index order).
//! Within one request the header update precedes its response creates.
//!
//! Responses are never compared with the stored ones, so each run emits one
//! create per response again. Deduplication is left to the store.
//! Responses of a brand-new request are not emitted: they would target an
//! item that does not exist in the store until its create is applied.

use crate::error::CollectionError;
use crate::fingerprint::RequestMeta;
use crate::ids::IdSource;
use crate::index::{CollectionIndex, IndexEntry};
use crate::node::{self, Node, Request};
use serde_json::{json, Value};
use specsync_artifact::{owner_of, Breadcrumb, Crumb, NodeKind, PatchEntity, PatchRecord};

/// Counters for one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// New requests created under the root
    pub created_items: usize,
    /// Known requests whose headers changed
    pub updated_items: usize,
    /// Known requests with nothing new
    pub unchanged_items: usize,
    /// Responses created under known requests
    pub created_responses: usize,
    /// Requests without a path component
    pub skipped: usize,
}

/// Patches produced by a pass, plus counters
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub patches: Vec<PatchRecord>,
    pub stats: ReconcileStats,
}

/// Reconciles new trees against one original index
///
/// Holds the index by shared reference; neither the index nor the trees are
/// modified.
#[derive(Debug)]
pub struct Reconciler<'a, I> {
    index: &'a CollectionIndex,
    root_id: String,
    owner: String,
    ids: I,
}

impl<'a, I: IdSource> Reconciler<'a, I> {
    /// Reconciler for the original collection `root_id`
    ///
    /// The owner prefix for fresh ids is the first hyphen-delimited segment
    /// of `root_id`.
    #[must_use]
    pub fn new(index: &'a CollectionIndex, root_id: impl Into<String>, ids: I) -> Self {
        let root_id = root_id.into();
        let owner = owner_of(&root_id).to_string();
        Self {
            index,
            root_id,
            owner,
            ids,
        }
    }

    /// Reconciler for the collection `index` was built from
    ///
    /// # Errors
    ///
    /// [`CollectionError::MissingRootId`] when the original collection had
    /// no `info.uid`.
    pub fn from_index(index: &'a CollectionIndex, ids: I) -> Result<Self, CollectionError> {
        let root_id = index.root_id().ok_or(CollectionError::MissingRootId)?;
        Ok(Self::new(index, root_id, ids))
    }

    /// Override the owner prefix
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Diff `new_tree` against the index
    #[tracing::instrument(skip_all, fields(root_id = %self.root_id))]
    pub fn reconcile(&mut self, new_tree: &Value) -> Reconciliation {
        let mut pass = Reconciliation {
            patches: Vec::new(),
            stats: ReconcileStats::default(),
        };
        self.walk(node::collection_root(new_tree), &mut pass);

        let stats = pass.stats;
        tracing::info!(
            patches = pass.patches.len(),
            created_items = stats.created_items,
            updated_items = stats.updated_items,
            created_responses = stats.created_responses,
            skipped = stats.skipped,
            "reconciled collection"
        );
        pass
    }

    fn walk(&mut self, value: &Value, pass: &mut Reconciliation) {
        match Node::classify(value) {
            Node::Sequence(items) => {
                for item in items {
                    self.walk(item, pass);
                }
            }
            Node::Group(items) => self.walk(items, pass),
            Node::Request(request) => self.visit(&request, pass),
            Node::Ignored => {}
        }
    }

    fn visit(&mut self, request: &Request<'_>, pass: &mut Reconciliation) {
        let meta = RequestMeta::from_request(request);
        if !meta.has_path_component() {
            tracing::debug!(id = request.id(), "skipping request without path component");
            pass.stats.skipped += 1;
            return;
        }

        match self.index.get(&meta.fingerprint()) {
            None => self.create_item(request, pass),
            Some(original) => self.update_item(request, original, pass),
        }
    }

    fn create_item(&mut self, request: &Request<'_>, pass: &mut Reconciliation) {
        let id = self.fresh_id();
        let path = Breadcrumb::root(Some(self.root_id.clone()))
            .child(Crumb::with_id(NodeKind::Item, id.clone(), 0));

        tracing::debug!(source_id = request.id(), %id, "new request");
        pass.patches.push(PatchRecord::create(PatchEntity::Item, id, request.stripped(), path));
        pass.stats.created_items += 1;
    }

    fn update_item(&mut self, request: &Request<'_>, original: &IndexEntry, pass: &mut Reconciliation) {
        let headers = merge_headers(&original.headers, request.headers());
        if headers == original.headers {
            pass.stats.unchanged_items += 1;
        } else {
            let id = original.request_id().unwrap_or_default();
            tracing::debug!(%id, headers = headers.len(), "headers changed");
            pass.patches.push(PatchRecord::update(
                PatchEntity::Item,
                id,
                json!({ "request": { "header": headers } }),
                original.path.clone(),
            ));
            pass.stats.updated_items += 1;
        }

        for (position, response) in request.responses().iter().enumerate() {
            let id = self.fresh_id();
            let path = original
                .path
                .child(Crumb::with_id(NodeKind::Response, id.clone(), position));
            pass.patches.push(PatchRecord::create(
                PatchEntity::Response,
                id,
                node::strip_identifiers(response),
                path,
            ));
            pass.stats.created_responses += 1;
        }
    }

    fn fresh_id(&mut self) -> String {
        format!("{}-{}", self.owner, self.ids.next_id())
    }
}

/// Union of two header lists under deep equality
///
/// Keeps the order of `original`, then appends entries of `incoming` not
/// already present. Duplicates inside either list collapse too.
#[must_use]
pub fn merge_headers(original: &[Value], incoming: &[Value]) -> Vec<Value> {
    let mut merged: Vec<Value> = Vec::with_capacity(original.len() + incoming.len());
    for header in original.iter().chain(incoming) {
        if !merged.contains(header) {
            merged.push(header.clone());
        }
    }
    merged
}
