// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SQLite Upload Repository

use async_trait::async_trait;
use chrono::Utc;
use sas_domain::repositories::UploadRepository;
use sas_domain::{DossierId, IngestError, ResumableUpload, UploadId};
use sqlx::{Row, SqlitePool};
use std::path::PathBuf;

pub struct SqliteUploadRepository {
    pool: SqlitePool,
}

impl SqliteUploadRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UploadRepository for SqliteUploadRepository {
    async fn create(&self, upload: &ResumableUpload) -> Result<(), IngestError> {
        sqlx::query(
            "INSERT INTO resumable_uploads \
             (id, dossier_id, owner_principal, total_size, offset_bytes, chunk_dir, created_at, updated_at, completed) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(upload.id.to_string())
        .bind(upload.dossier_id.as_str())
        .bind(&upload.owner_principal)
        .bind(upload.total_size as i64)
        .bind(upload.offset as i64)
        .bind(upload.chunk_dir.to_string_lossy().to_string())
        .bind(upload.created_at)
        .bind(upload.updated_at)
        .bind(upload.completed)
        .execute(&self.pool)
        .await
        .map_err(|e| IngestError::Database(format!("failed to insert upload: {e}")))?;
        Ok(())
    }

    async fn get(&self, id: &UploadId) -> Result<Option<ResumableUpload>, IngestError> {
        let row = sqlx::query("SELECT * FROM resumable_uploads WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| IngestError::Database(format!("failed to fetch upload: {e}")))?;

        let Some(row) = row else { return Ok(None) };

        let dossier_id: String = row.try_get("dossier_id").map_err(|e| IngestError::Database(e.to_string()))?;
        let total_size: i64 = row.try_get("total_size").map_err(|e| IngestError::Database(e.to_string()))?;
        let offset: i64 = row.try_get("offset_bytes").map_err(|e| IngestError::Database(e.to_string()))?;
        let chunk_dir: String = row.try_get("chunk_dir").map_err(|e| IngestError::Database(e.to_string()))?;

        Ok(Some(ResumableUpload {
            id: *id,
            dossier_id: DossierId::parse(dossier_id)?,
            owner_principal: row.try_get("owner_principal").map_err(|e| IngestError::Database(e.to_string()))?,
            total_size: total_size as u64,
            offset: offset as u64,
            chunk_dir: PathBuf::from(chunk_dir),
            created_at: row.try_get("created_at").map_err(|e| IngestError::Database(e.to_string()))?,
            updated_at: row.try_get("updated_at").map_err(|e| IngestError::Database(e.to_string()))?,
            completed: row.try_get("completed").map_err(|e| IngestError::Database(e.to_string()))?,
        }))
    }

    async fn advance_offset(&self, id: &UploadId, new_offset: u64) -> Result<(), IngestError> {
        sqlx::query("UPDATE resumable_uploads SET offset_bytes = ?, updated_at = ? WHERE id = ?")
            .bind(new_offset as i64)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| IngestError::Database(format!("failed to advance upload offset: {e}")))?;
        Ok(())
    }

    async fn mark_complete(&self, id: &UploadId) -> Result<(), IngestError> {
        sqlx::query("UPDATE resumable_uploads SET completed = 1, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| IngestError::Database(format!("failed to mark upload complete: {e}")))?;
        Ok(())
    }

    async fn delete(&self, id: &UploadId) -> Result<(), IngestError> {
        sqlx::query("DELETE FROM resumable_uploads WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| IngestError::Database(format!("failed to delete upload: {e}")))?;
        Ok(())
    }
}
