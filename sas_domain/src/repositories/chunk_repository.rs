// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunk Repository Interface

use crate::entities::Chunk;
use crate::error::IngestError;
use crate::value_objects::{ChunkIndex, DossierId, Sha256Digest};
use async_trait::async_trait;

#[async_trait]
pub trait ChunkRepository: Send + Sync {
    /// Idempotent on `(piece_sha256, dossier_id, index)`.
    async fn insert_chunk(
        &self,
        piece_sha256: &Sha256Digest,
        dossier: &DossierId,
        index: ChunkIndex,
        chunk_sha256: &Sha256Digest,
        received: bool,
    ) -> Result<(), IngestError>;

    async fn list_chunks(
        &self,
        piece_sha256: &Sha256Digest,
        dossier: &DossierId,
    ) -> Result<Vec<Chunk>, IngestError>;
}
