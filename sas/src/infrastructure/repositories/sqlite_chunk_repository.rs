// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SQLite Chunk Repository

use async_trait::async_trait;
use sas_domain::repositories::ChunkRepository;
use sas_domain::{Chunk, ChunkIndex, DossierId, IngestError, Sha256Digest};
use sqlx::{Row, SqlitePool};

pub struct SqliteChunkRepository {
    pool: SqlitePool,
}

impl SqliteChunkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChunkRepository for SqliteChunkRepository {
    async fn insert_chunk(
        &self,
        piece_sha256: &Sha256Digest,
        dossier: &DossierId,
        index: ChunkIndex,
        chunk_sha256: &Sha256Digest,
        received: bool,
    ) -> Result<(), IngestError> {
        sqlx::query(
            "INSERT INTO chunks (piece_sha256, dossier_id, idx, chunk_sha256, received) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT(piece_sha256, dossier_id, idx) DO UPDATE SET received = excluded.received",
        )
        .bind(piece_sha256.as_str())
        .bind(dossier.as_str())
        .bind(index.value() as i64)
        .bind(chunk_sha256.as_str())
        .bind(received)
        .execute(&self.pool)
        .await
        .map_err(|e| IngestError::Database(format!("failed to insert chunk: {e}")))?;
        Ok(())
    }

    async fn list_chunks(
        &self,
        piece_sha256: &Sha256Digest,
        dossier: &DossierId,
    ) -> Result<Vec<Chunk>, IngestError> {
        let rows = sqlx::query(
            "SELECT piece_sha256, dossier_id, idx, chunk_sha256, received FROM chunks \
             WHERE piece_sha256 = ? AND dossier_id = ? ORDER BY idx ASC",
        )
        .bind(piece_sha256.as_str())
        .bind(dossier.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| IngestError::Database(format!("failed to list chunks: {e}")))?;

        rows.into_iter()
            .map(|row| {
                let idx: i64 = row
                    .try_get("idx")
                    .map_err(|e| IngestError::Database(format!("row decode error: {e}")))?;
                let chunk_sha256: String = row
                    .try_get("chunk_sha256")
                    .map_err(|e| IngestError::Database(format!("row decode error: {e}")))?;
                let received: bool = row
                    .try_get("received")
                    .map_err(|e| IngestError::Database(format!("row decode error: {e}")))?;
                let mut chunk = Chunk::new(
                    piece_sha256.clone(),
                    dossier.clone(),
                    ChunkIndex::new(idx as u32),
                    Sha256Digest::parse(chunk_sha256)?,
                );
                chunk.received = received;
                Ok(chunk)
            })
            .collect()
    }
}
