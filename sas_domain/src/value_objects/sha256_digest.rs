// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SHA-256 Digest Value Object
//!
//! Content addressing is the spine of the ingestion pipeline: pieces are
//! keyed by `(sha256, dossier_id)`, chunks are keyed by `(piece_sha256,
//! dossier_id, index)`. A bare `String` anywhere near that key space invites
//! case-mismatches and malformed-hex bugs, so every digest that crosses a
//! component boundary is this type.

use crate::error::IngestError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display};

/// A lower-case, 64-character hex-encoded SHA-256 digest.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Parses a hex digest, rejecting anything that isn't exactly 64 lower-
    /// or upper-case hex characters. The stored form is always lower-case.
    pub fn parse(candidate: impl AsRef<str>) -> Result<Self, IngestError> {
        let candidate = candidate.as_ref();
        if candidate.len() != 64 || !candidate.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(IngestError::invalid_argument(format!(
                "'{candidate}' is not a 64-character hex SHA-256 digest"
            )));
        }
        Ok(Self(candidate.to_ascii_lowercase()))
    }

    /// Computes the digest of a single byte slice in one shot.
    pub fn of_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = IngestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Sha256Digest> for String {
    fn from(digest: Sha256Digest) -> Self {
        digest.0
    }
}

/// Incremental SHA-256 hasher, used by the streaming chunker to compute both
/// per-chunk and whole-piece digests without buffering the file.
#[derive(Default)]
pub struct RunningDigest(Sha256);

impl RunningDigest {
    pub fn new() -> Self {
        Self(Sha256::new())
    }

    pub fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    pub fn finalize(self) -> Sha256Digest {
        Sha256Digest(hex::encode(self.0.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_hex_and_lowercases() {
        let digest = Sha256Digest::parse("A".repeat(64)).unwrap();
        assert_eq!(digest.as_str(), "a".repeat(64));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Sha256Digest::parse("ab").is_err());
    }

    #[test]
    fn rejects_non_hex() {
        assert!(Sha256Digest::parse("g".repeat(64)).is_err());
    }

    #[test]
    fn of_bytes_matches_known_vector() {
        // SHA-256("") = e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
        let digest = Sha256Digest::of_bytes(b"");
        assert_eq!(
            digest.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b85"
        );
    }

    #[test]
    fn running_digest_matches_one_shot() {
        let data = b"AAAAAAAAAAAAAAABBBBBBBBBBBBBBB";
        let mut running = RunningDigest::new();
        running.update(&data[..10]);
        running.update(&data[10..]);
        assert_eq!(running.finalize(), Sha256Digest::of_bytes(data));
    }
}
