// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Review Piece
//!
//! Admin-triggered resolution of a `flagged` piece: approve moves it to
//! `ready` and enqueues routes; reject moves it to `blocked`. This is the
//! only path besides the automatic scan pipeline that can advance a piece
//! out of `flagged`.

use crate::application::orchestrator::IngestionOrchestrator;
use sas_domain::{DossierId, IngestError, PieceState, Sha256Digest};
use std::sync::Arc;

pub struct ReviewPiece {
    orchestrator: Arc<IngestionOrchestrator>,
}

impl ReviewPiece {
    pub fn new(orchestrator: Arc<IngestionOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn execute(
        &self,
        dossier_id: &DossierId,
        sha256: &Sha256Digest,
        approve: bool,
        carried_token: Option<&str>,
    ) -> Result<PieceState, IngestError> {
        self.orchestrator.review_piece(dossier_id, sha256, approve, carried_token).await
    }
}
