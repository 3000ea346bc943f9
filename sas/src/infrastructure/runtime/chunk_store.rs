// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Filesystem Chunk Store
//!
//! Content-addressed layout: `<root>/<dossier>/<piece_sha>/chunk_NNNNNNNN.bin`.
//! `place` is handed an already-chunked staging directory and attempts an
//! atomic rename into the final path; a cross-filesystem rename falls back
//! to a recursive copy, after which the staging directory is removed.

use async_trait::async_trait;
use sas_domain::services::ChunkStore;
use sas_domain::{ChunkIndex, DossierId, IngestError, Sha256Digest};
use std::path::{Path, PathBuf};

use super::streaming_chunker::chunk_file_name;

pub struct FsChunkStore {
    root: PathBuf,
}

impl FsChunkStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn piece_dir_path(&self, dossier: &DossierId, piece_sha: &Sha256Digest) -> PathBuf {
        self.root.join(dossier.as_str()).join(piece_sha.as_str())
    }

    async fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<(), IngestError> {
        tokio::fs::create_dir_all(dst).await?;
        let mut entries = tokio::fs::read_dir(src).await?;
        while let Some(entry) = entries.next_entry().await? {
            let dst_path = dst.join(entry.file_name());
            if entry.file_type().await?.is_dir() {
                Box::pin(Self::copy_dir_recursive(&entry.path(), &dst_path)).await?;
            } else {
                tokio::fs::copy(entry.path(), dst_path).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ChunkStore for FsChunkStore {
    async fn place(
        &self,
        dossier: &DossierId,
        piece_sha: &Sha256Digest,
        staging_dir: &Path,
    ) -> Result<(), IngestError> {
        let final_dir = self.piece_dir_path(dossier, piece_sha);
        if let Some(parent) = final_dir.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        match tokio::fs::rename(staging_dir, &final_dir).await {
            Ok(()) => Ok(()),
            Err(_) => {
                // Cross-filesystem rename: fall back to copy-then-remove.
                Self::copy_dir_recursive(staging_dir, &final_dir).await?;
                tokio::fs::remove_dir_all(staging_dir).await?;
                Ok(())
            }
        }
    }

    async fn read_chunk(
        &self,
        dossier: &DossierId,
        piece_sha: &Sha256Digest,
        index: ChunkIndex,
    ) -> Result<Vec<u8>, IngestError> {
        let path = self.piece_dir_path(dossier, piece_sha).join(chunk_file_name(index));
        tokio::fs::read(&path)
            .await
            .map_err(|e| IngestError::storage_io(format!("failed to read chunk {path:?}: {e}")))
    }

    fn piece_dir(&self, dossier: &DossierId, piece_sha: &Sha256Digest) -> PathBuf {
        self.piece_dir_path(dossier, piece_sha)
    }

    async fn remove_piece(&self, dossier: &DossierId, piece_sha: &Sha256Digest) -> Result<(), IngestError> {
        let dir = self.piece_dir_path(dossier, piece_sha);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn dossier() -> DossierId {
        DossierId::parse("dos_a").unwrap()
    }

    #[tokio::test]
    async fn place_moves_staging_into_content_addressed_path() {
        let root = tempdir().unwrap();
        let store = FsChunkStore::new(root.path());
        let staging = root.path().join("_staging_x");
        tokio::fs::create_dir_all(&staging).await.unwrap();
        tokio::fs::write(staging.join(chunk_file_name(ChunkIndex::ZERO)), b"data")
            .await
            .unwrap();

        let sha = Sha256Digest::of_bytes(b"data");
        store.place(&dossier(), &sha, &staging).await.unwrap();

        let bytes = store.read_chunk(&dossier(), &sha, ChunkIndex::ZERO).await.unwrap();
        assert_eq!(bytes, b"data");
        assert!(!staging.exists());
    }

    #[tokio::test]
    async fn remove_piece_is_idempotent() {
        let root = tempdir().unwrap();
        let store = FsChunkStore::new(root.path());
        let sha = Sha256Digest::of_bytes(b"x");
        store.remove_piece(&dossier(), &sha).await.unwrap();
        store.remove_piece(&dossier(), &sha).await.unwrap();
    }
}
