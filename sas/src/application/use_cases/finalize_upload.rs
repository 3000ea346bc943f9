// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Finalize Upload
//!
//! Steps 5-10 of the ingestion sequence, triggered the moment a resumable
//! upload completes. `carried_token` is whatever opaque bearer token the
//! transport layer pulled off the original request; it is the only thing
//! besides `dossier_id` allowed to survive past this call, and only ever
//! reaches a downstream webhook for `jwt_passthru` routes.

use crate::application::orchestrator::IngestionOrchestrator;
use crate::infrastructure::runtime::{FinalizeOutcome, ResumableReceiver};
use sas_domain::repositories::{PieceRepository, UploadRepository};
use sas_domain::{IngestError, PieceState, UploadId};
use std::sync::Arc;

pub struct FinalizeUpload {
    orchestrator: Arc<IngestionOrchestrator>,
    receiver: Arc<ResumableReceiver>,
    uploads: Arc<dyn UploadRepository>,
    pieces: Arc<dyn PieceRepository>,
}

pub struct FinalizeResult {
    pub outcome: FinalizeOutcome,
    pub piece_state: PieceState,
}

impl FinalizeUpload {
    pub fn new(
        orchestrator: Arc<IngestionOrchestrator>,
        receiver: Arc<ResumableReceiver>,
        uploads: Arc<dyn UploadRepository>,
        pieces: Arc<dyn PieceRepository>,
    ) -> Self {
        Self {
            orchestrator,
            receiver,
            uploads,
            pieces,
        }
    }

    pub async fn execute(&self, upload_id: &UploadId, carried_token: Option<&str>) -> Result<FinalizeResult, IngestError> {
        let upload = self
            .uploads
            .get(upload_id)
            .await?
            .ok_or_else(|| IngestError::not_found(format!("upload {upload_id} not found")))?;
        let dossier_id = upload.dossier_id.clone();

        let outcome = self.receiver.finalize(upload_id).await?;

        let piece_state = if outcome.deduplicated {
            self.pieces
                .get_piece(&outcome.sha256, &dossier_id)
                .await?
                .map(|p| p.state)
                .unwrap_or(PieceState::Ready)
        } else {
            self.orchestrator
                .process_piece(&dossier_id, &outcome.sha256, outcome.chunk_count, None, carried_token)
                .await?
        };

        Ok(FinalizeResult { outcome, piece_state })
    }
}
