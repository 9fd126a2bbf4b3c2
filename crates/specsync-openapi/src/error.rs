//! Error types for OpenAPI diffing and merging

use std::fmt::{self, Display, Formatter};

/// Which of the two documents an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Base (old) document
    Base,
    /// Candidate (new) document
    Candidate,
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Base => "base",
            Self::Candidate => "candidate",
        })
    }
}

/// OpenAPI operation failure
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// Path maps are structurally identical; nothing to merge
    #[error("no diff found between path maps")]
    NoDiff,

    /// Document has no object-valued `paths`
    #[error("{side} document has no paths object")]
    MissingPaths { side: Side },

    /// Non-breaking difference location could not be parsed
    #[error("invalid difference location: {0}")]
    InvalidLocation(String),

    /// Schema file name is empty, so no format can be chosen
    #[error("schema file name is empty")]
    EmptyFileName,

    /// JSON (de)serialization failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization failed
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Rendered output was not valid UTF-8
    #[error("rendered schema is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl SpecError {
    /// Whether the error is the "identical path maps" hard stop
    #[inline]
    #[must_use]
    pub fn is_no_diff(&self) -> bool {
        matches!(self, Self::NoDiff)
    }
}
