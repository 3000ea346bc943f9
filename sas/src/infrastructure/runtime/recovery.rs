// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Crash Recovery
//!
//! Runs once at startup, per dossier the process is configured to own:
//! pieces left in `scanned` (crashed between the structural checkpoint and
//! the terminal state transition) are reset to `received`. Chunk files on
//! disk are content-addressed and therefore trusted as-is; this step only
//! resets the metadata store's view of where a piece is in its lifecycle.
//! It returns the reset pieces rather than just a count so the caller can
//! requeue them through the scan pipeline — resetting the row alone would
//! otherwise leave the piece stuck at `received` forever.

use sas_domain::entities::Piece;
use sas_domain::repositories::PieceRepository;
use sas_domain::{DossierId, IngestError, PieceState};
use std::sync::Arc;
use tracing::info;

pub struct RecoveryService {
    pieces: Arc<dyn PieceRepository>,
}

impl RecoveryService {
    pub fn new(pieces: Arc<dyn PieceRepository>) -> Self {
        Self { pieces }
    }

    /// Idempotent: running it twice in a row against an already-recovered
    /// dossier is a no-op, since there would be nothing left in `scanned`
    /// to reset.
    pub async fn recover_dossier(&self, dossier: &DossierId) -> Result<Vec<Piece>, IngestError> {
        let stuck = self.pieces.list_pieces_by_state(dossier, PieceState::Scanned).await?;

        for piece in &stuck {
            self.pieces
                .update_piece_state(&piece.sha256, dossier, PieceState::Received)
                .await?;
        }

        if !stuck.is_empty() {
            info!(dossier = dossier.as_str(), reset_count = stuck.len(), "recovery reset stuck pieces to received");
        }

        Ok(stuck)
    }
}
