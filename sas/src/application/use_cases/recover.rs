// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Recover
//!
//! Runs [`RecoveryService`] once per dossier at startup, then re-drives the
//! scan pipeline for every piece it reset to `received` — resetting the row
//! alone would otherwise leave it parked there forever, since nothing else
//! in this process revisits a piece once it has left `received` the first
//! time. The list of dossiers to recover comes from the caller (bootstrap
//! reads it from the metadata store's dossier table at process start)
//! rather than from this use case, which stays dossier-agnostic.

use crate::application::orchestrator::IngestionOrchestrator;
use crate::infrastructure::runtime::RecoveryService;
use sas_domain::repositories::ChunkRepository;
use sas_domain::{DossierId, IngestError};
use std::sync::Arc;
use tracing::warn;

pub struct Recover {
    recovery: Arc<RecoveryService>,
    orchestrator: Arc<IngestionOrchestrator>,
    chunks: Arc<dyn ChunkRepository>,
}

impl Recover {
    pub fn new(recovery: Arc<RecoveryService>, orchestrator: Arc<IngestionOrchestrator>, chunks: Arc<dyn ChunkRepository>) -> Self {
        Self { recovery, orchestrator, chunks }
    }

    pub async fn execute(&self, dossier_id: &DossierId) -> Result<usize, IngestError> {
        let reset = self.recovery.recover_dossier(dossier_id).await?;
        let reset_count = reset.len();

        for piece in reset {
            let chunk_count = self.chunks.list_chunks(&piece.sha256, dossier_id).await?.len() as u32;
            // filename_hint and carried_token are never persisted (the latter
            // by design, per the identity cutoff); a piece recovered after a
            // crash re-scans without them.
            if let Err(e) = self
                .orchestrator
                .process_piece(dossier_id, &piece.sha256, chunk_count, None, None)
                .await
            {
                warn!(
                    dossier_id = dossier_id.as_str(),
                    sha256 = piece.sha256.as_str(),
                    error = %e,
                    "recovery re-scan failed, piece left at received for the next startup"
                );
            }
        }

        Ok(reset_count)
    }
}
