// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Dossier Repository Interface

use crate::entities::Dossier;
use crate::error::IngestError;
use crate::value_objects::DossierId;
use async_trait::async_trait;

#[async_trait]
pub trait DossierRepository: Send + Sync {
    /// Creates the dossier row if absent. On an existing row, fails with
    /// `IngestError::OwnershipConflict` if `owner_principal` mismatches.
    /// This is the final pre-cutoff use of the owner principal.
    async fn ensure_dossier(&self, id: &DossierId, owner_principal: &str) -> Result<Dossier, IngestError>;

    async fn get(&self, id: &DossierId) -> Result<Option<Dossier>, IngestError>;

    /// Cascades to pieces, chunks, and pending routes.
    async fn delete(&self, id: &DossierId) -> Result<(), IngestError>;
}
