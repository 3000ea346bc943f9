// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunk Store Port
//!
//! Content-addressed, filesystem-backed chunk storage, keyed by
//! `(dossier_id, piece_sha256, chunk_index)`. Implementations own the
//! directory layout and the ephemeral-staging-then-atomic-rename dance;
//! this trait only specifies the three operations the rest of the pipeline
//! needs.

use crate::error::IngestError;
use crate::value_objects::{ChunkIndex, DossierId, Sha256Digest};
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Moves a completed staging directory of chunk files into its final
    /// content-addressed location. Implementations attempt an atomic
    /// rename first and fall back to recording the ephemeral path when the
    /// rename crosses filesystems.
    async fn place(
        &self,
        dossier: &DossierId,
        piece_sha: &Sha256Digest,
        staging_dir: &Path,
    ) -> Result<(), IngestError>;

    async fn read_chunk(
        &self,
        dossier: &DossierId,
        piece_sha: &Sha256Digest,
        index: ChunkIndex,
    ) -> Result<Vec<u8>, IngestError>;

    /// Returns the directory holding an already-placed piece's chunk files,
    /// for scanners that need bounded reads across several chunks.
    fn piece_dir(&self, dossier: &DossierId, piece_sha: &Sha256Digest) -> std::path::PathBuf;

    async fn remove_piece(&self, dossier: &DossierId, piece_sha: &Sha256Digest) -> Result<(), IngestError>;
}
