// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Piece Repository Interface

use crate::entities::Piece;
use crate::error::IngestError;
use crate::value_objects::{AntivirusStatus, DossierId, InjectionRisk, PieceState, Sha256Digest};
use async_trait::async_trait;

#[async_trait]
pub trait PieceRepository: Send + Sync {
    async fn insert_piece(&self, piece: &Piece) -> Result<(), IngestError>;

    async fn get_piece(&self, sha256: &Sha256Digest, dossier: &DossierId) -> Result<Option<Piece>, IngestError>;

    async fn list_pieces_by_state(
        &self,
        dossier: &DossierId,
        state: PieceState,
    ) -> Result<Vec<Piece>, IngestError>;

    /// Transitions `state` and refreshes `updated_at`. Callers are expected
    /// to have already validated the transition via
    /// [`PieceState::can_transition_to`].
    async fn update_piece_state(
        &self,
        sha256: &Sha256Digest,
        dossier: &DossierId,
        new_state: PieceState,
    ) -> Result<(), IngestError>;

    async fn update_piece_metadata(
        &self,
        sha256: &Sha256Digest,
        dossier: &DossierId,
        mime: Option<&str>,
        metadata: Option<&str>,
        injection_risk: InjectionRisk,
        antivirus_status: &AntivirusStatus,
    ) -> Result<(), IngestError>;
}
