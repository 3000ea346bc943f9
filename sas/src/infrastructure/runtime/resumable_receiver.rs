// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Resumable Receiver
//!
//! Implements the offset-based upload protocol: Create, Head, Append,
//! Finalize. Staging lives at `<chunks_root>/<dossier_id>/_staging_<upload_id>/
//! partial.bin`; Finalize hands that file to the [`ChunkerService`], places
//! the resulting chunk directory via the [`ChunkStore`], and either records
//! a new piece row or reports a dedup hit. `(sha256, dossier)` dedup is what
//! serializes concurrent ingestion of the same bytes — the second Finalize
//! to reach `insert_piece` loses the race and reports `deduplicated = true`
//! instead of erroring.

use chrono::Utc;
use sas_domain::entities::Piece;
use sas_domain::repositories::{ChunkRepository, PieceRepository, UploadRepository};
use sas_domain::services::{ChunkStore, ChunkerService};
use sas_domain::{DossierId, IngestError, ResumableUpload, Sha256Digest, UploadId};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub struct FinalizeOutcome {
    pub sha256: Sha256Digest,
    pub size_bytes: u64,
    pub chunk_count: u32,
    pub deduplicated: bool,
}

pub struct ResumableReceiver {
    chunks_root: PathBuf,
    max_file_bytes: u64,
    chunk_size_bytes: usize,
    uploads: Arc<dyn UploadRepository>,
    pieces: Arc<dyn PieceRepository>,
    chunks: Arc<dyn ChunkRepository>,
    chunker: Arc<dyn ChunkerService>,
    chunk_store: Arc<dyn ChunkStore>,
}

impl ResumableReceiver {
    pub fn new(
        chunks_root: impl Into<PathBuf>,
        max_file_bytes: u64,
        chunk_size_bytes: usize,
        uploads: Arc<dyn UploadRepository>,
        pieces: Arc<dyn PieceRepository>,
        chunks: Arc<dyn ChunkRepository>,
        chunker: Arc<dyn ChunkerService>,
        chunk_store: Arc<dyn ChunkStore>,
    ) -> Self {
        Self {
            chunks_root: chunks_root.into(),
            max_file_bytes,
            chunk_size_bytes,
            uploads,
            pieces,
            chunks,
            chunker,
            chunk_store,
        }
    }

    fn staging_dir(&self, dossier: &DossierId, upload_id: &UploadId) -> PathBuf {
        self.chunks_root.join(dossier.as_str()).join(format!("_staging_{upload_id}"))
    }

    pub async fn create(&self, dossier_id: DossierId, owner_principal: String, total_size: u64) -> Result<UploadId, IngestError> {
        if total_size == 0 {
            return Err(IngestError::invalid_argument("total_size must be greater than zero"));
        }
        if total_size > self.max_file_bytes {
            return Err(IngestError::SizeExceeded(format!(
                "requested size {total_size} exceeds max_file_bytes {}",
                self.max_file_bytes
            )));
        }

        let id = UploadId::generate();
        let staging = self.staging_dir(&dossier_id, &id);
        tokio::fs::create_dir_all(&staging).await?;

        let upload = ResumableUpload::new(id, dossier_id, owner_principal, total_size, staging, Utc::now());
        self.uploads.create(&upload).await?;
        Ok(id)
    }

    pub async fn head(&self, upload_id: &UploadId) -> Result<(u64, u64, bool), IngestError> {
        let upload = self
            .uploads
            .get(upload_id)
            .await?
            .ok_or_else(|| IngestError::not_found(format!("upload {upload_id} not found")))?;
        Ok((upload.offset, upload.total_size, upload.completed))
    }

    /// Appends `bytes` at `client_offset`. Returns the new offset, which
    /// may fall short of `client_offset + bytes.len()` if the operation
    /// was cancelled mid-write — the file length on disk is authoritative.
    pub async fn append(&self, upload_id: &UploadId, client_offset: u64, bytes: &[u8]) -> Result<u64, IngestError> {
        let upload = self
            .uploads
            .get(upload_id)
            .await?
            .ok_or_else(|| IngestError::not_found(format!("upload {upload_id} not found")))?;

        upload.validate_append(client_offset)?;

        if client_offset + bytes.len() as u64 > upload.total_size {
            return Err(IngestError::SizeExceeded(format!(
                "append would exceed declared total_size {}",
                upload.total_size
            )));
        }

        let partial_path = upload.chunk_dir.join("partial.bin");
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .open(&partial_path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;

        let new_offset = client_offset + bytes.len() as u64;
        self.uploads.advance_offset(upload_id, new_offset).await?;
        Ok(new_offset)
    }

    /// Chunks the staged file, places it content-addressed, and either
    /// inserts a new `received` piece row or reports a dedup hit.
    pub async fn finalize(&self, upload_id: &UploadId) -> Result<FinalizeOutcome, IngestError> {
        let upload = self
            .uploads
            .get(upload_id)
            .await?
            .ok_or_else(|| IngestError::not_found(format!("upload {upload_id} not found")))?;

        upload.validate_finalize()?;

        let partial_path = upload.chunk_dir.join("partial.bin");
        let staging_chunks_dir = upload.chunk_dir.join("_chunks");
        let manifest = self
            .chunker
            .chunk_file(&partial_path, &staging_chunks_dir, self.chunk_size_bytes)
            .await?;

        if let Some(existing) = self.pieces.get_piece(&manifest.piece_sha256, &upload.dossier_id).await? {
            tokio::fs::remove_dir_all(&upload.chunk_dir).await.ok();
            self.uploads.mark_complete(upload_id).await?;
            self.uploads.delete(upload_id).await?;
            return Ok(FinalizeOutcome {
                sha256: existing.sha256,
                size_bytes: existing.size_bytes,
                chunk_count: manifest.chunk_count(),
                deduplicated: true,
            });
        }

        self.chunk_store
            .place(&upload.dossier_id, &manifest.piece_sha256, &staging_chunks_dir)
            .await?;

        let piece = Piece::new_received(manifest.piece_sha256.clone(), upload.dossier_id.clone(), manifest.total_size_bytes, Utc::now());

        match self.pieces.insert_piece(&piece).await {
            Ok(()) => {
                for entry in &manifest.chunks {
                    self.chunks
                        .insert_chunk(&manifest.piece_sha256, &upload.dossier_id, entry.index, &entry.chunk_sha256, true)
                        .await?;
                }
            }
            Err(_) => {
                // Lost the dedup race: another Finalize inserted first.
                self.chunk_store.remove_piece(&upload.dossier_id, &manifest.piece_sha256).await.ok();
            }
        }

        tokio::fs::remove_dir_all(&upload.chunk_dir).await.ok();
        self.uploads.mark_complete(upload_id).await?;
        self.uploads.delete(upload_id).await?;

        Ok(FinalizeOutcome {
            sha256: manifest.piece_sha256,
            size_bytes: manifest.total_size_bytes,
            chunk_count: manifest.chunk_count(),
            deduplicated: false,
        })
    }
}
