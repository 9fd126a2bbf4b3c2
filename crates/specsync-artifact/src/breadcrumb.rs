//! Breadcrumbs for addressing nodes inside a collection tree
//!
//! A [`Breadcrumb`] records the exact location of a node at the time it was
//! indexed: one [`Crumb`] (kind, id, position) per level, root first.
//!
//! Breadcrumbs are persistent. Extending one returns a new trail that shares
//! its prefix with the parent, and the parent is never modified.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Kind of node a crumb points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Collection root
    Collection,
    /// Folder holding further nodes
    ItemGroup,
    /// Request leaf
    Item,
    /// Sample response under a request
    Response,
}

impl NodeKind {
    /// Wire name (`collection`, `item-group`, `item`, `response`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::ItemGroup => "item-group",
            Self::Item => "item",
            Self::Response => "response",
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One level of a breadcrumb
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crumb {
    /// Node kind at this level
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Node id, if the node carried one
    pub id: Option<String>,

    /// Position within the parent sequence
    pub index: usize,
}

impl Crumb {
    /// Create a crumb
    #[inline]
    #[must_use]
    pub fn new(kind: NodeKind, id: Option<String>, index: usize) -> Self {
        Self { kind, id, index }
    }

    /// Crumb with a known id
    #[inline]
    #[must_use]
    pub fn with_id(kind: NodeKind, id: impl Into<String>, index: usize) -> Self {
        Self::new(kind, Some(id.into()), index)
    }
}

/// Location trail of a node inside a collection
///
/// # Examples
/// - `collection:42-abc` → the root
/// - `collection:42-abc/item-group:f1[2]/item:r9[0]` → a request in a folder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breadcrumb(Vector<Crumb>);

impl Breadcrumb {
    /// Single-crumb trail for a collection root
    #[must_use]
    pub fn root(id: Option<String>) -> Self {
        Self(Vector::unit(Crumb::new(NodeKind::Collection, id, 0)))
    }

    /// Trail extended by one crumb; `self` is left untouched
    #[must_use]
    pub fn child(&self, crumb: Crumb) -> Self {
        let mut next = self.0.clone();
        next.push_back(crumb);
        Self(next)
    }

    /// Trail whose last crumb is re-typed as `kind`
    ///
    /// Used when a node's shape becomes known only after its crumb was
    /// recorded. Returns an unchanged copy for an empty trail.
    #[must_use]
    pub fn with_last_kind(&self, kind: NodeKind) -> Self {
        let mut next = self.0.clone();
        if let Some(last) = next.back_mut() {
            last.kind = kind;
        }
        Self(next)
    }

    /// Number of crumbs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the breadcrumb has no crumbs
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Root-most crumb
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&Crumb> {
        self.0.front()
    }

    /// Crumb of the addressed node
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&Crumb> {
        self.0.back()
    }

    /// Crumb at `depth` (0 = root)
    #[inline]
    #[must_use]
    pub fn get(&self, depth: usize) -> Option<&Crumb> {
        self.0.get(depth)
    }

    /// Iterator over crumbs from root to leaf
    pub fn iter(&self) -> impl Iterator<Item = &Crumb> {
        self.0.iter()
    }
}

impl FromIterator<Crumb> for Breadcrumb {
    fn from_iter<I: IntoIterator<Item = Crumb>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for Breadcrumb {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (depth, crumb) in self.0.iter().enumerate() {
            if depth > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}:{}", crumb.kind, crumb.id.as_deref().unwrap_or("?"))?;
            if crumb.kind != NodeKind::Collection {
                write!(f, "[{}]", crumb.index)?;
            }
        }
        Ok(())
    }
}
