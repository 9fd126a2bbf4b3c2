//! Request fingerprints
//!
//! A [`Fingerprint`] is the identity of a request across two collection
//! trees. It depends on the method and the canonical URL only; headers,
//! bodies, names and ids never contribute.
//!
//! # Canonical form
//!
//! `UPPERCASE(method) + " " + url`, where `url` is the first host segment
//! followed by every non-null path segment, joined with `/`. The canonical
//! form is hashed with blake3.

use crate::node::Request;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use specsync_artifact::ContentHash;
use std::fmt::{self, Display, Formatter};

/// Leading `scheme://`
static SCHEME: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://"));

/// Authority, then the path up to any query or fragment
static AUTHORITY_PATH: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[^/?#]*/([^?#]*)"));

/// Stable identity of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(ContentHash);

impl Fingerprint {
    #[inline]
    #[must_use]
    pub fn hash(&self) -> &ContentHash {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        self.0.short()
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Request fields that take part in fingerprinting
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestMeta {
    method: String,
    host: Vec<String>,
    path: Vec<Option<String>>,
    raw: Option<String>,
}

impl RequestMeta {
    #[must_use]
    pub fn new(method: impl Into<String>, host: Vec<String>, path: Vec<Option<String>>) -> Self {
        Self {
            method: method.into(),
            host,
            path,
            raw: None,
        }
    }

    /// Attach the raw URL string
    #[must_use]
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    /// Extract meta from a request leaf
    ///
    /// Accepts both a structured `url` object (`raw`, `host`, `path`) and a
    /// plain URL string. A structured URL without a usable `host` and `path`
    /// falls back to its `raw` string.
    #[must_use]
    pub fn from_request(request: &Request<'_>) -> Self {
        let method = request.method();
        match request.url() {
            Some(Value::String(raw)) => Self::from_raw(method, raw),
            Some(Value::Object(url)) => {
                let host: Option<Vec<String>> = match url.get("host") {
                    Some(Value::Array(parts)) => Some(parts.iter().filter_map(segment).collect()),
                    Some(Value::String(host)) => Some(host.split('.').map(str::to_string).collect()),
                    _ => None,
                };
                let path: Option<Vec<Option<String>>> = match url.get("path") {
                    Some(Value::Array(parts)) => Some(parts.iter().map(segment).collect()),
                    Some(Value::String(path)) => Some(
                        path.split('/').filter(|s| !s.is_empty()).map(|s| Some(s.to_string())).collect(),
                    ),
                    _ => None,
                };
                let raw = url.get("raw").and_then(Value::as_str);
                match (host, path, raw) {
                    (Some(host), Some(path), raw) if !host.is_empty() => {
                        let meta = Self::new(method, host, path);
                        match raw {
                            Some(raw) => meta.with_raw(raw),
                            None => meta,
                        }
                    }
                    (_, _, Some(raw)) => Self::from_raw(method, raw),
                    (host, path, None) => Self::new(method, host.unwrap_or_default(), path.unwrap_or_default()),
                }
            }
            _ => Self::new(method, Vec::new(), Vec::new()),
        }
    }

    /// Split a raw URL string into host and path segments
    #[must_use]
    pub fn from_raw(method: impl Into<String>, raw: &str) -> Self {
        let without_scheme = strip_scheme(raw);
        let end = without_scheme.find(['?', '#']).unwrap_or(without_scheme.len());
        let mut parts = without_scheme[..end].split('/');
        let host = parts
            .next()
            .filter(|h| !h.is_empty())
            .map(|h| h.split('.').map(str::to_string).collect())
            .unwrap_or_default();
        let path = parts.map(|p| Some(p.to_string())).collect();
        Self::new(method, host, path).with_raw(raw)
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// First host segment plus non-null path segments, joined with `/`
    #[must_use]
    pub fn canonical_url(&self) -> String {
        self.host
            .first()
            .into_iter()
            .chain(self.path.iter().flatten())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// `METHOD url`, the exact input of the fingerprint hash
    #[must_use]
    pub fn canonical_form(&self) -> String {
        format!("{} {}", self.method.to_ascii_uppercase(), self.canonical_url())
    }

    /// Whether the URL has a non-empty path before any query string
    ///
    /// Requests without one cannot be fingerprinted meaningfully.
    #[must_use]
    pub fn has_path_component(&self) -> bool {
        match &self.raw {
            Some(raw) => raw_has_path(raw),
            None => self.path.iter().flatten().any(|s| !s.is_empty()),
        }
    }

    /// Fingerprint of this request
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint(ContentHash::of_str(&self.canonical_form()))
    }
}

/// Whether a raw URL string carries a non-empty path component
#[must_use]
pub fn raw_has_path(raw: &str) -> bool {
    let Ok(pattern) = AUTHORITY_PATH.as_ref() else {
        return false;
    };
    pattern
        .captures(strip_scheme(raw))
        .and_then(|caps| caps.get(1))
        .is_some_and(|path| path.as_str().split('/').any(|s| !s.is_empty()))
}

fn strip_scheme(raw: &str) -> &str {
    match SCHEME.as_ref() {
        Ok(scheme) => scheme.find(raw).map_or(raw, |m| &raw[m.end()..]),
        Err(_) => raw,
    }
}

fn segment(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("value").and_then(Value::as_str).map(str::to_string),
        other => Some(other.to_string()),
    }
}
