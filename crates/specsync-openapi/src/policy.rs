//! Deep-merge with an explicit conflict policy
//!
//! Objects always merge key by key. What happens when both sides hold an
//! array, or hold values that cannot be merged, is decided by [`MergePolicy`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How two arrays at the same key combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrayPolicy {
    /// Base elements, then overlay elements
    #[default]
    Concat,
    /// Overlay array replaces the base array
    Replace,
    /// Base elements, then overlay elements not already present
    Union,
}

/// Which side wins for non-mergeable values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalarPolicy {
    #[default]
    PreferOverlay,
    PreferBase,
}

/// Conflict policy of [`deep_merge`]
///
/// The default (`concat` arrays, overlay wins) matches a plain recursive
/// merge. Use [`ArrayPolicy::Union`] when the same overlay may be merged
/// more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct MergePolicy {
    pub arrays: ArrayPolicy,
    pub scalars: ScalarPolicy,
}

impl MergePolicy {
    #[inline]
    #[must_use]
    pub const fn new(arrays: ArrayPolicy, scalars: ScalarPolicy) -> Self {
        Self { arrays, scalars }
    }

    #[inline]
    #[must_use]
    pub const fn with_arrays(mut self, arrays: ArrayPolicy) -> Self {
        self.arrays = arrays;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_scalars(mut self, scalars: ScalarPolicy) -> Self {
        self.scalars = scalars;
        self
    }
}

/// Merge `overlay` into a copy of `base`
///
/// Keys present only in `base` are kept untouched, keys present only in
/// `overlay` are added.
#[must_use]
pub fn deep_merge(base: &Value, overlay: &Value, policy: MergePolicy) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut result = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let merged = match result.get(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value, policy),
                    None => overlay_value.clone(),
                };
                result.insert(key.clone(), merged);
            }
            Value::Object(result)
        }
        (Value::Array(base_items), Value::Array(overlay_items)) => match policy.arrays {
            ArrayPolicy::Concat => {
                let mut result = base_items.clone();
                result.extend(overlay_items.iter().cloned());
                Value::Array(result)
            }
            ArrayPolicy::Replace => overlay.clone(),
            ArrayPolicy::Union => {
                let mut result = base_items.clone();
                for item in overlay_items {
                    if !result.contains(item) {
                        result.push(item.clone());
                    }
                }
                Value::Array(result)
            }
        },
        _ => match policy.scalars {
            ScalarPolicy::PreferOverlay => overlay.clone(),
            ScalarPolicy::PreferBase => base.clone(),
        },
    }
}
