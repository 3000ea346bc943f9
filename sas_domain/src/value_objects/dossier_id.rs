// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Dossier Identifier Value Object
//!
//! The dossier id is the only identifier allowed to cross the identity
//! cutoff (see [`crate::GLOSSARY`]-level docs in the workspace README) and
//! the only user-controlled string that is ever used to build a filesystem
//! path. Every filesystem path builder in the chunk store and resumable
//! staging layer must consume a validated `DossierId`, never a raw
//! `String` — this closes the "implicit path construction from user input"
//! design note by construction.
//!
//! ## Validation rules
//!
//! - Non-empty, length <= 128
//! - Characters drawn from `[A-Za-z0-9_-]`
//! - No leading `.`
//! - No path separators (enforced transitively by the character whitelist,
//!   called out explicitly because it's the property that actually matters)

use crate::error::IngestError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

const MAX_LEN: usize = 128;

/// A tenant identifier that has passed the identifier whitelist.
///
/// Construction is the only way to obtain a value of this type: there is no
/// public constructor that skips validation, including in test code, so a
/// `DossierId` in hand is always safe to use as a directory component.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DossierId(String);

impl DossierId {
    /// Validates and wraps a candidate dossier id.
    pub fn parse(candidate: impl Into<String>) -> Result<Self, IngestError> {
        let candidate = candidate.into();

        if candidate.is_empty() {
            return Err(IngestError::invalid_argument("dossier id must not be empty"));
        }
        if candidate.len() > MAX_LEN {
            return Err(IngestError::invalid_argument(format!(
                "dossier id exceeds maximum length of {MAX_LEN}"
            )));
        }
        if candidate.starts_with('.') {
            return Err(IngestError::invalid_argument(
                "dossier id must not start with '.'",
            ));
        }
        if !candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            return Err(IngestError::invalid_argument(
                "dossier id must contain only [A-Za-z0-9_-]",
            ));
        }

        Ok(Self(candidate))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DossierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DossierId {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DossierId {
    type Error = IngestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<DossierId> for String {
    fn from(id: DossierId) -> Self {
        id.0
    }
}

impl AsRef<str> for DossierId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_ids() {
        assert!(DossierId::parse("dos_a").is_ok());
        assert!(DossierId::parse("Tenant-42").is_ok());
        assert!(DossierId::parse("a").is_ok());
        assert!(DossierId::parse("a".repeat(MAX_LEN)).is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(DossierId::parse("").is_err());
    }

    #[test]
    fn rejects_too_long() {
        assert!(DossierId::parse("a".repeat(MAX_LEN + 1)).is_err());
    }

    #[test]
    fn rejects_leading_dot() {
        assert!(DossierId::parse(".hidden").is_err());
    }

    #[test]
    fn rejects_path_traversal_attempts() {
        assert!(DossierId::parse("../etc/passwd").is_err());
        assert!(DossierId::parse("a/b").is_err());
        assert!(DossierId::parse("a\\b").is_err());
        assert!(DossierId::parse("a b").is_err());
        assert!(DossierId::parse("a.b").is_err());
    }

    #[test]
    fn round_trips_through_display_and_from_str() {
        let id = DossierId::parse("dos_a").unwrap();
        let text = id.to_string();
        let parsed: DossierId = text.parse().unwrap();
        assert_eq!(id, parsed);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn never_panics_on_arbitrary_input(s in ".*") {
            let _ = DossierId::parse(s);
        }
    }
}
