//! Schema file formats
//!
//! A schema file is JSON when its name ends in `.json` and YAML otherwise.
//! JSON is rendered with a 4-space indent.

use crate::error::SpecError;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

impl SchemaFormat {
    /// Format implied by a file name
    ///
    /// # Errors
    ///
    /// [`SpecError::EmptyFileName`] for an empty name.
    pub fn from_file_name(name: &str) -> Result<Self, SpecError> {
        if name.is_empty() {
            return Err(SpecError::EmptyFileName);
        }
        if name.to_ascii_lowercase().ends_with(".json") {
            Ok(Self::Json)
        } else {
            Ok(Self::Yaml)
        }
    }

    /// Serialize `value` as text in this format
    ///
    /// # Errors
    ///
    /// Serializer failures.
    pub fn render(self, value: &Value) -> Result<String, SpecError> {
        match self {
            Self::Json => {
                let mut out = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
                let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
                value.serialize(&mut serializer)?;
                Ok(String::from_utf8(out)?)
            }
            Self::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    /// Parse text in this format
    ///
    /// # Errors
    ///
    /// Parser failures.
    pub fn parse(self, text: &str) -> Result<Value, SpecError> {
        match self {
            Self::Json => Ok(serde_json::from_str(text)?),
            Self::Yaml => Ok(serde_yaml::from_str(text)?),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl Display for SchemaFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
