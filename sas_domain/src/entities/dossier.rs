// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Dossier
//!
//! The tenant bucket. `owner_principal` is write-once: [`Dossier::check_owner`]
//! is the only place that ever compares it against a candidate, and the
//! orchestrator stops holding a copy of either value the instant the call
//! returns (see the identity-cutoff design note).

use crate::entities::RouteSpec;
use crate::error::IngestError;
use crate::value_objects::DossierId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dossier {
    pub id: DossierId,
    pub owner_principal: String,
    pub name: Option<String>,
    /// Non-empty routes here override global configuration entirely; no
    /// merge ever happens between the two.
    pub routes: Vec<RouteSpec>,
    pub created_at: DateTime<Utc>,
}

impl Dossier {
    pub fn new(id: DossierId, owner_principal: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_principal,
            name: None,
            routes: Vec::new(),
            created_at,
        }
    }

    /// Enforces the write-once owner-principal invariant: an existing
    /// dossier row may only ever be re-opened by the same owner.
    pub fn check_owner(&self, candidate: &str) -> Result<(), IngestError> {
        if self.owner_principal != candidate {
            return Err(IngestError::OwnershipConflict {
                dossier_id: self.id.as_str().to_string(),
            });
        }
        Ok(())
    }

    pub fn effective_routes<'a>(&'a self, global: &'a [RouteSpec]) -> &'a [RouteSpec] {
        if self.routes.is_empty() {
            global
        } else {
            &self.routes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dossier() -> Dossier {
        Dossier::new(DossierId::parse("dos_a").unwrap(), "u1".to_string(), Utc::now())
    }

    #[test]
    fn check_owner_accepts_matching_principal() {
        assert!(dossier().check_owner("u1").is_ok());
    }

    #[test]
    fn check_owner_rejects_mismatch() {
        assert!(dossier().check_owner("u2").is_err());
    }

    #[test]
    fn effective_routes_falls_back_to_global_when_empty() {
        let d = dossier();
        let global = vec![];
        assert!(d.effective_routes(&global).is_empty());
    }
}
