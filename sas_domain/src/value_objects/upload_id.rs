// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Upload Identifier
//!
//! Time-ordered handle for a resumable upload session, minted once at
//! `Create` and presented by the client on every subsequent `Head` /
//! `Append` / `Finalize` call. Backed by a ULID rather than a random UUID
//! so upload ids sort by creation time, which is convenient for staging
//! directory cleanup sweeps.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use ulid::Ulid;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadId(Ulid);

impl UploadId {
    /// Mints a fresh id. Not available under `cfg(test)` determinism
    /// concerns because the orchestrator never needs a fixed upload id
    /// across a test run to assert behavior; tests that need stability
    /// construct via [`UploadId::from_str`] instead.
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid upload id '{0}'")]
pub struct InvalidUploadId(pub String);

impl FromStr for UploadId {
    type Err = InvalidUploadId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_str(s)
            .map(Self)
            .map_err(|_| InvalidUploadId(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_unique_ids() {
        assert_ne!(UploadId::generate(), UploadId::generate());
    }

    #[test]
    fn round_trips_through_str() {
        let id = UploadId::generate();
        let parsed: UploadId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn rejects_garbage() {
        assert!("not-a-ulid".parse::<UploadId>().is_err());
    }
}
