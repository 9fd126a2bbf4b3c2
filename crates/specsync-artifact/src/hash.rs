//! Request identity hashes
//!
//! [`ContentHash`] is a blake3 digest over a canonical string. Only equality
//! and ordering matter to the engines; the hex form exists for logs.

use std::fmt::{self, Display, Formatter};

/// blake3 digest of a canonical form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Digest of raw bytes
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Digest of a canonical string
    #[inline]
    #[must_use]
    pub fn of_str(canonical: &str) -> Self {
        Self::compute(canonical.as_bytes())
    }

    #[inline]
    #[must_use]
    pub fn digest(&self) -> &[u8; 32] {
        &self.0
    }

    /// Leading 8 bytes as hex
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
