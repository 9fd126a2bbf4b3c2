//! Sync facade
//!
//! [`SyncEngine`] wires the collection and OpenAPI engines to a
//! [`SyncConfig`]. Every operation is a synchronous, pure computation over
//! in-memory documents; reading and writing files is the caller's job.

use crate::config::SyncConfig;
use crate::error::Result;
use serde_json::Value;
use specsync_artifact::PatchPayload;
use specsync_collection::{CollectionIndex, IdSource, Reconciler, UuidSource};
use specsync_openapi::{
    classify_non_breaking, diff_documents, generate_openapi, merge_non_breaking, merge_openapi, DiffArtifact,
    SchemaFormat,
};

/// Entry point for reconciliation, diffing and merging
#[derive(Debug, Clone, Default)]
pub struct SyncEngine {
    config: SyncConfig,
}

impl SyncEngine {
    /// Engine driven by `config`
    #[inline]
    #[must_use]
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Index the requests of an original collection
    ///
    /// # Errors
    ///
    /// When the document is not an object.
    pub fn index_collection(&self, collection: &Value) -> Result<CollectionIndex> {
        Ok(CollectionIndex::try_build(collection)?)
    }

    /// Patches that bring `original` up to date with `new_tree`, using
    /// random fresh ids
    ///
    /// # Errors
    ///
    /// When `original` is not an object or has no root id.
    pub fn reconcile(&self, original: &Value, new_tree: &Value) -> Result<PatchPayload> {
        self.reconcile_with(original, new_tree, UuidSource)
    }

    /// Like [`reconcile`](Self::reconcile), with fresh ids from `ids`
    ///
    /// # Errors
    ///
    /// When `original` is not an object or has no root id.
    #[tracing::instrument(skip_all)]
    pub fn reconcile_with<I: IdSource>(&self, original: &Value, new_tree: &Value, ids: I) -> Result<PatchPayload> {
        let index = self.index_collection(original)?;
        let mut reconciler = Reconciler::from_index(&index, ids)?;
        if let Some(owner) = &self.config.owner_override {
            reconciler = reconciler.with_owner(owner.as_str());
        }

        let result = reconciler.reconcile(new_tree);
        Ok(PatchPayload::new(self.config.collection_version.as_str(), result.patches))
    }

    /// Added/deleted paths and methods between two documents
    ///
    /// # Errors
    ///
    /// When either document has no `paths` object.
    pub fn diff_schemas(&self, base: &Value, candidate: &Value) -> Result<DiffArtifact> {
        Ok(DiffArtifact::new(diff_documents(base, candidate)?))
    }

    /// Merge what `candidate` adds into `base`
    ///
    /// # Errors
    ///
    /// When either document has no `paths` object, or the path maps are
    /// identical.
    pub fn merge_schemas(&self, base: &Value, candidate: &Value) -> Result<Value> {
        Ok(merge_openapi(base, candidate, self.config.merge_policy)?)
    }

    /// Merge the non-breaking additions of `destination` into `source`
    ///
    /// Unlike [`merge_schemas`](Self::merge_schemas), identical documents
    /// merge to an unchanged copy of `source`.
    ///
    /// # Errors
    ///
    /// When either document has no `paths` object.
    pub fn merge_non_breaking(&self, source: &Value, destination: &Value) -> Result<Value> {
        let differences = classify_non_breaking(source, destination)?;
        Ok(merge_non_breaking(source, &differences, self.config.merge_policy)?)
    }

    /// Candidate document for a batch of observed transactions
    #[must_use]
    pub fn generate_schema(&self, transactions: &[Value]) -> Value {
        generate_openapi(transactions)
    }

    /// Render a schema in the format implied by `file_name`
    ///
    /// # Errors
    ///
    /// For an empty file name or a serializer failure.
    pub fn render_schema(&self, value: &Value, file_name: &str) -> Result<String> {
        Ok(SchemaFormat::from_file_name(file_name)?.render(value)?)
    }

    /// Parse schema text in the format implied by `file_name`
    ///
    /// # Errors
    ///
    /// For an empty file name or malformed text.
    pub fn parse_schema(&self, text: &str, file_name: &str) -> Result<Value> {
        Ok(SchemaFormat::from_file_name(file_name)?.parse(text)?)
    }
}
