// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Create Upload
//!
//! Steps 1-4 of the ingestion sequence: validate the dossier id, ensure
//! the dossier (the final pre-cutoff use of `owner_principal`), then open
//! a resumable-upload session. `owner_principal` does not escape this
//! function — the returned [`UploadId`] and the caller's own `dossier_id`
//! are all that's needed for every subsequent call.

use crate::application::orchestrator::IngestionOrchestrator;
use crate::infrastructure::runtime::ResumableReceiver;
use sas_domain::{DossierId, IngestError, UploadId};
use std::sync::Arc;

pub struct CreateUpload {
    orchestrator: Arc<IngestionOrchestrator>,
    receiver: Arc<ResumableReceiver>,
}

impl CreateUpload {
    pub fn new(orchestrator: Arc<IngestionOrchestrator>, receiver: Arc<ResumableReceiver>) -> Self {
        Self { orchestrator, receiver }
    }

    pub async fn execute(&self, dossier_id: &str, owner_principal: &str, total_size: u64) -> Result<UploadId, IngestError> {
        let dossier_id = DossierId::parse(dossier_id)?;
        self.orchestrator
            .ensure_dossier_and_cut_identity(&dossier_id, owner_principal)
            .await?;
        self.receiver
            .create(dossier_id, owner_principal.to_string(), total_size)
            .await
    }
}
