//! Patch records for a document store
//!
//! A [`PatchRecord`] is one create/update instruction against a stored
//! collection: what to do, which entity, where (a [`Breadcrumb`]), and the
//! partial node payload. Records are grouped into a [`PatchPayload`] for the
//! store's update call.

use crate::breadcrumb::Breadcrumb;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collection schema version stamped on payloads by default
pub const DEFAULT_COLLECTION_VERSION: &str = "2.1.0";

/// Action a patch performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchAction {
    /// Create a new entity
    Create,
    /// Update fields of an existing entity
    Update,
}

/// Entity a patch targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatchEntity {
    /// Whole collection
    Collection,
    /// Request leaf
    Item,
    /// Folder
    ItemGroup,
    /// Saved response of a request
    Response,
}

/// One change to apply to a stored collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRecord {
    /// Actions to perform (a single action in practice)
    pub actions: Vec<PatchAction>,

    /// Partial node object, identifiers stripped
    pub data: Value,

    /// Target entity kind
    pub entity: PatchEntity,

    /// Full id, `<owner>-<rest>`
    pub id: String,

    /// Id with the owner prefix removed
    pub identifier: String,

    /// Location of the target in the stored tree
    pub path: Breadcrumb,
}

impl PatchRecord {
    /// Create instruction
    #[must_use]
    pub fn create(entity: PatchEntity, id: impl Into<String>, data: Value, path: Breadcrumb) -> Self {
        Self::with_action(PatchAction::Create, entity, id.into(), data, path)
    }

    /// Update instruction
    #[must_use]
    pub fn update(entity: PatchEntity, id: impl Into<String>, data: Value, path: Breadcrumb) -> Self {
        Self::with_action(PatchAction::Update, entity, id.into(), data, path)
    }

    fn with_action(
        action: PatchAction,
        entity: PatchEntity,
        id: String,
        data: Value,
        path: Breadcrumb,
    ) -> Self {
        let identifier = identifier_of(&id).to_string();
        Self {
            actions: vec![action],
            data,
            entity,
            id,
            identifier,
            path,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_create(&self) -> bool {
        self.actions.contains(&PatchAction::Create)
    }

    #[inline]
    #[must_use]
    pub fn is_update(&self) -> bool {
        self.actions.contains(&PatchAction::Update)
    }
}

/// Entity header of a payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadEntity {
    /// Collection schema version
    pub version: String,
}

/// Ordered patches plus the collection version they apply to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchPayload {
    /// Entity header
    pub entity: PayloadEntity,
    /// Patches in application order
    pub patches: Vec<PatchRecord>,
}

impl PatchPayload {
    /// Payload for collection schema `version`
    #[must_use]
    pub fn new(version: impl Into<String>, patches: Vec<PatchRecord>) -> Self {
        Self {
            entity: PayloadEntity {
                version: version.into(),
            },
            patches,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Number of patches matching `entity` and `action`
    #[must_use]
    pub fn count(&self, entity: PatchEntity, action: PatchAction) -> usize {
        self.patches
            .iter()
            .filter(|p| p.entity == entity && p.actions.contains(&action))
            .count()
    }
}

/// Owner prefix of a hyphen-delimited id (`"42-abc-def"` → `"42"`)
#[must_use]
pub fn owner_of(id: &str) -> &str {
    id.split_once('-').map_or(id, |(owner, _)| owner)
}

/// Id with the owner prefix stripped (`"42-abc-def"` → `"abc-def"`)
///
/// Ids without a hyphen are returned unchanged.
#[must_use]
pub fn identifier_of(id: &str) -> &str {
    id.split_once('-').map_or(id, |(_, rest)| rest)
}
