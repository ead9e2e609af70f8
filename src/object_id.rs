//! Opaque 24-hex-character record identifiers.
//!
//! Ids are generated server-side from a 4-byte unix-seconds prefix and
//! 8 random bytes, so they sort roughly by creation time and are
//! unguessable enough for a public URL path segment.

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

/// A validated store identifier: exactly 24 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 12];
        let secs = chrono::Utc::now().timestamp();
        // Truncation is fine until 2106; ids only need rough time ordering.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let prefix = (secs as u32).to_be_bytes();
        bytes[..4].copy_from_slice(&prefix);
        rand::thread_rng().fill_bytes(&mut bytes[4..]);
        Self(hex::encode(bytes))
    }

    /// Parse an untrusted string into an identifier.
    ///
    /// Returns `None` for anything that is not exactly 24 ASCII hex
    /// characters. Never panics and never surfaces a parse error;
    /// callers treat `None` as a malformed request.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 24 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(s.to_ascii_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_valid() {
        let id = ObjectId::generate();
        assert_eq!(id.as_str().len(), 24);
        assert!(ObjectId::parse(id.as_str()).is_some());
    }

    #[test]
    fn test_generate_is_unique() {
        assert_ne!(ObjectId::generate(), ObjectId::generate());
    }

    #[test]
    fn test_parse_normalizes_case() {
        let id = ObjectId::parse("5D273F9ED65273C3B0A2B552").expect("valid id");
        assert_eq!(id.as_str(), "5d273f9ed65273c3b0a2b552");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(ObjectId::parse("").is_none());
        assert!(ObjectId::parse("not-an-id").is_none());
        assert!(ObjectId::parse("5d273f9ed65273c3b0a2b55").is_none()); // 23 chars
        assert!(ObjectId::parse("5d273f9ed65273c3b0a2b5521").is_none()); // 25 chars
        assert!(ObjectId::parse("5d273f9ed65273c3b0a2b55z").is_none()); // non-hex
        assert!(ObjectId::parse("5d273f9ed65273c3b0a2b55 ").is_none());
    }
}
