// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Piece
//!
//! A single content-addressed file belonging to one dossier. `compose_final_state`
//! is the one place the "ready vs flagged vs blocked" decision is made; the
//! orchestrator calls it once, after both the structural and injection scans
//! have reported in, and persists whatever it returns.

use crate::value_objects::{AntivirusStatus, DossierId, InjectionRisk, PieceState, Sha256Digest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub sha256: Sha256Digest,
    pub dossier_id: DossierId,
    pub state: PieceState,
    pub mime: Option<String>,
    pub size_bytes: u64,
    /// Opaque, unparsed by the domain: structural-scan warnings and similar
    /// scanner output, stored as raw JSON text.
    pub metadata: Option<String>,
    pub injection_risk: InjectionRisk,
    pub antivirus_status: AntivirusStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Piece {
    pub fn new_received(
        sha256: Sha256Digest,
        dossier_id: DossierId,
        size_bytes: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            sha256,
            dossier_id,
            state: PieceState::Received,
            mime: None,
            size_bytes,
            metadata: None,
            injection_risk: InjectionRisk::None,
            antivirus_status: AntivirusStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Decides the post-scan state per the data model invariant: `ready`
    /// requires both a non-blocking antivirus status and sub-high injection
    /// risk; a structural block always wins outright.
    pub fn compose_final_state(structurally_blocked: bool, injection_risk: InjectionRisk) -> PieceState {
        if structurally_blocked {
            return PieceState::Blocked;
        }
        if injection_risk.is_high() {
            return PieceState::Flagged;
        }
        PieceState::Ready
    }

    pub fn is_ready_eligible(&self) -> bool {
        self.antivirus_status.permits_ready() && !self.injection_risk.is_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_final_state_blocked_wins_over_injection() {
        assert_eq!(
            Piece::compose_final_state(true, InjectionRisk::High),
            PieceState::Blocked
        );
    }

    #[test]
    fn compose_final_state_high_injection_flags() {
        assert_eq!(
            Piece::compose_final_state(false, InjectionRisk::High),
            PieceState::Flagged
        );
    }

    #[test]
    fn compose_final_state_clean_is_ready() {
        assert_eq!(
            Piece::compose_final_state(false, InjectionRisk::Medium),
            PieceState::Ready
        );
    }

    #[test]
    fn is_ready_eligible_requires_permitting_antivirus_status() {
        let mut piece = Piece::new_received(
            Sha256Digest::of_bytes(b"x"),
            DossierId::parse("dos_a").unwrap(),
            1,
            Utc::now(),
        );
        assert!(!piece.is_ready_eligible());
        piece.antivirus_status = AntivirusStatus::Ok;
        assert!(piece.is_ready_eligible());
        piece.injection_risk = InjectionRisk::High;
        assert!(!piece.is_ready_eligible());
    }
}
