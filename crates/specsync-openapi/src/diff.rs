//! Structural diffing of JSON documents and OpenAPI path maps
//!
//! [`deep_diff`] is a generic structural diff that reports every change at
//! any depth. [`diff_paths`] narrows it to the additive/deletive view used for
//! path maps: whole paths (depth 1) and single methods under a shared path
//! (depth 2) that were added or removed. Edits are never surfaced.

use crate::error::{Side, SpecError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};

/// One step into a JSON document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Field(String),
    Index(usize),
}

impl Key {
    /// Field name, if this step is an object key
    #[must_use]
    pub fn as_field(&self) -> Option<&str> {
        match self {
            Self::Field(name) => Some(name),
            Self::Index(_) => None,
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// Kind of a generic difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffKind {
    /// Present only on the right
    New,
    /// Present only on the left
    Deleted,
    /// Present on both sides with different values
    Edited,
    /// Element added or removed at the tail of an array
    Array,
}

/// One structural difference between two documents
#[derive(Debug, Clone, PartialEq)]
pub enum Difference {
    New { path: Vec<Key>, rhs: Value },
    Deleted { path: Vec<Key>, lhs: Value },
    Edited { path: Vec<Key>, lhs: Value, rhs: Value },
    /// Change at `index` of the array found at `path`; `item` has an empty path
    Array {
        path: Vec<Key>,
        index: usize,
        item: Box<Difference>,
    },
}

impl Difference {
    #[must_use]
    pub fn kind(&self) -> DiffKind {
        match self {
            Self::New { .. } => DiffKind::New,
            Self::Deleted { .. } => DiffKind::Deleted,
            Self::Edited { .. } => DiffKind::Edited,
            Self::Array { .. } => DiffKind::Array,
        }
    }

    #[must_use]
    pub fn path(&self) -> &[Key] {
        match self {
            Self::New { path, .. }
            | Self::Deleted { path, .. }
            | Self::Edited { path, .. }
            | Self::Array { path, .. } => path,
        }
    }
}

/// Every structural difference between `lhs` and `rhs`
///
/// Objects are compared key by key: keys of `lhs` first (in their order),
/// then keys only present in `rhs`. Arrays are compared index by index;
/// extra elements on either side are reported as [`Difference::Array`].
/// Values of different JSON types are a single [`Difference::Edited`].
#[must_use]
pub fn deep_diff(lhs: &Value, rhs: &Value) -> Vec<Difference> {
    let mut out = Vec::new();
    diff_into(lhs, rhs, &mut Vec::new(), &mut out);
    out
}

fn diff_into(lhs: &Value, rhs: &Value, path: &mut Vec<Key>, out: &mut Vec<Difference>) {
    match (lhs, rhs) {
        (Value::Object(left), Value::Object(right)) => diff_objects(left, right, path, out),
        (Value::Array(left), Value::Array(right)) => {
            for (i, (l, r)) in left.iter().zip(right).enumerate() {
                path.push(Key::Index(i));
                diff_into(l, r, path, out);
                path.pop();
            }
            for (i, removed) in left.iter().enumerate().skip(right.len()) {
                out.push(Difference::Array {
                    path: path.clone(),
                    index: i,
                    item: Box::new(Difference::Deleted {
                        path: Vec::new(),
                        lhs: removed.clone(),
                    }),
                });
            }
            for (i, added) in right.iter().enumerate().skip(left.len()) {
                out.push(Difference::Array {
                    path: path.clone(),
                    index: i,
                    item: Box::new(Difference::New {
                        path: Vec::new(),
                        rhs: added.clone(),
                    }),
                });
            }
        }
        (l, r) if l == r => {}
        (l, r) => out.push(Difference::Edited {
            path: path.clone(),
            lhs: l.clone(),
            rhs: r.clone(),
        }),
    }
}

fn diff_objects(
    left: &Map<String, Value>,
    right: &Map<String, Value>,
    path: &mut Vec<Key>,
    out: &mut Vec<Difference>,
) {
    for (key, l) in left {
        path.push(Key::Field(key.clone()));
        match right.get(key) {
            Some(r) => diff_into(l, r, path, out),
            None => out.push(Difference::Deleted {
                path: path.clone(),
                lhs: l.clone(),
            }),
        }
        path.pop();
    }
    for (key, r) in right {
        if !left.contains_key(key) {
            let mut at = path.clone();
            at.push(Key::Field(key.clone()));
            out.push(Difference::New {
                path: at,
                rhs: r.clone(),
            });
        }
    }
}

/// Kind of a path-map diff entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathChange {
    Added,
    Deleted,
}

/// Added or removed path (1 key) or method under a shared path (2 keys)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathDiffEntry {
    #[serde(rename = "type")]
    pub kind: PathChange,
    pub path: Vec<String>,
    /// Added value, or the removed one for deletions
    ///
    /// Deletions deliberately carry the removed value, so persisted artifacts
    /// have a `value` key on every entry. Older artifacts omitted it there.
    pub value: Value,
}

impl PathDiffEntry {
    #[inline]
    #[must_use]
    pub fn is_added(&self) -> bool {
        self.kind == PathChange::Added
    }

    /// The OpenAPI path this entry is about
    #[must_use]
    pub fn route(&self) -> &str {
        self.path.first().map_or("", String::as_str)
    }

    /// HTTP method, for depth-2 entries
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.path.get(1).map(String::as_str)
    }
}

/// Keep the additions and removals of whole paths and single methods
///
/// Edits and changes deeper than a method are dropped.
#[must_use]
pub fn path_entries(differences: &[Difference]) -> Vec<PathDiffEntry> {
    differences
        .iter()
        .filter_map(|difference| {
            let (kind, path, value) = match difference {
                Difference::New { path, rhs } => (PathChange::Added, path, rhs),
                Difference::Deleted { path, lhs } => (PathChange::Deleted, path, lhs),
                Difference::Edited { .. } | Difference::Array { .. } => return None,
            };
            if !(1..=2).contains(&path.len()) {
                return None;
            }
            let path = path
                .iter()
                .map(|key| key.as_field().map(str::to_string))
                .collect::<Option<Vec<_>>>()?;
            Some(PathDiffEntry {
                kind,
                path,
                value: value.clone(),
            })
        })
        .collect()
}

/// Additive/deletive diff of two path maps
#[must_use]
pub fn diff_paths(base: &Value, candidate: &Value) -> Vec<PathDiffEntry> {
    path_entries(&deep_diff(base, candidate))
}

/// The `paths` object of an OpenAPI document
///
/// # Errors
///
/// [`SpecError::MissingPaths`] when `paths` is absent or not an object.
pub fn paths_of(document: &Value, side: Side) -> Result<&Value, SpecError> {
    match document.get("paths") {
        Some(paths @ Value::Object(_)) => Ok(paths),
        _ => Err(SpecError::MissingPaths { side }),
    }
}

/// Diff the `paths` of two whole documents
///
/// # Errors
///
/// [`SpecError::MissingPaths`] when either document lacks a `paths` object.
#[tracing::instrument(skip_all)]
pub fn diff_documents(base: &Value, candidate: &Value) -> Result<Vec<PathDiffEntry>, SpecError> {
    let entries = diff_paths(paths_of(base, Side::Base)?, paths_of(candidate, Side::Candidate)?);
    tracing::info!(
        added = entries.iter().filter(|e| e.is_added()).count(),
        deleted = entries.iter().filter(|e| !e.is_added()).count(),
        "diffed path maps"
    );
    Ok(entries)
}

/// Persisted diff: `{"patches": [{type, path, value}, ...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffArtifact {
    pub patches: Vec<PathDiffEntry>,
}

impl DiffArtifact {
    #[must_use]
    pub fn new(patches: Vec<PathDiffEntry>) -> Self {
        Self { patches }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Entries that add something
    pub fn added(&self) -> impl Iterator<Item = &PathDiffEntry> {
        self.patches.iter().filter(|entry| entry.is_added())
    }
}
