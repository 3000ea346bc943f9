// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SQLite Piece Repository

use async_trait::async_trait;
use chrono::Utc;
use sas_domain::repositories::PieceRepository;
use sas_domain::{AntivirusStatus, DossierId, IngestError, InjectionRisk, Piece, PieceState, Sha256Digest};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

pub struct SqlitePieceRepository {
    pool: SqlitePool,
}

impl SqlitePieceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_err(e: sqlx::Error) -> IngestError {
    IngestError::Database(format!("row decode error: {e}"))
}

fn row_to_piece(row: &sqlx::sqlite::SqliteRow) -> Result<Piece, IngestError> {
    let sha256: String = row.try_get("sha256").map_err(row_err)?;
    let dossier_id: String = row.try_get("dossier_id").map_err(row_err)?;
    let state: String = row.try_get("state").map_err(row_err)?;
    let injection_risk: String = row.try_get("injection_risk").map_err(row_err)?;
    let antivirus_status: String = row.try_get("antivirus_status").map_err(row_err)?;

    Ok(Piece {
        sha256: Sha256Digest::parse(sha256)?,
        dossier_id: DossierId::parse(dossier_id)?,
        state: PieceState::from_str(&state)
            .map_err(|e| IngestError::internal(format!("stored piece state unreadable: {e}")))?,
        mime: row.try_get("mime").map_err(row_err)?,
        size_bytes: {
            let raw: i64 = row.try_get("size_bytes").map_err(row_err)?;
            raw as u64
        },
        metadata: row.try_get("metadata").map_err(row_err)?,
        injection_risk: InjectionRisk::from_str(&injection_risk)
            .map_err(|e| IngestError::internal(format!("stored injection_risk unreadable: {e}")))?,
        antivirus_status: AntivirusStatus::try_from(antivirus_status)
            .unwrap_or(AntivirusStatus::Pending),
        created_at: row.try_get("created_at").map_err(row_err)?,
        updated_at: row.try_get("updated_at").map_err(row_err)?,
    })
}

#[async_trait]
impl PieceRepository for SqlitePieceRepository {
    async fn insert_piece(&self, piece: &Piece) -> Result<(), IngestError> {
        sqlx::query(
            "INSERT INTO pieces \
             (sha256, dossier_id, state, mime, size_bytes, metadata, injection_risk, antivirus_status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(sha256, dossier_id) DO NOTHING",
        )
        .bind(piece.sha256.as_str())
        .bind(piece.dossier_id.as_str())
        .bind(piece.state.as_str())
        .bind(&piece.mime)
        .bind(piece.size_bytes as i64)
        .bind(&piece.metadata)
        .bind(piece.injection_risk.as_str())
        .bind(piece.antivirus_status.to_string())
        .bind(piece.created_at)
        .bind(piece.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| IngestError::Database(format!("failed to insert piece: {e}")))?;
        Ok(())
    }

    async fn get_piece(&self, sha256: &Sha256Digest, dossier: &DossierId) -> Result<Option<Piece>, IngestError> {
        let row = sqlx::query("SELECT * FROM pieces WHERE sha256 = ? AND dossier_id = ?")
            .bind(sha256.as_str())
            .bind(dossier.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| IngestError::Database(format!("failed to fetch piece: {e}")))?;

        row.as_ref().map(row_to_piece).transpose()
    }

    async fn list_pieces_by_state(
        &self,
        dossier: &DossierId,
        state: PieceState,
    ) -> Result<Vec<Piece>, IngestError> {
        let rows = sqlx::query("SELECT * FROM pieces WHERE dossier_id = ? AND state = ?")
            .bind(dossier.as_str())
            .bind(state.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| IngestError::Database(format!("failed to list pieces: {e}")))?;

        rows.iter().map(row_to_piece).collect()
    }

    async fn update_piece_state(
        &self,
        sha256: &Sha256Digest,
        dossier: &DossierId,
        new_state: PieceState,
    ) -> Result<(), IngestError> {
        let now = Utc::now();
        sqlx::query("UPDATE pieces SET state = ?, updated_at = ? WHERE sha256 = ? AND dossier_id = ?")
            .bind(new_state.as_str())
            .bind(now)
            .bind(sha256.as_str())
            .bind(dossier.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| IngestError::Database(format!("failed to update piece state: {e}")))?;
        Ok(())
    }

    async fn update_piece_metadata(
        &self,
        sha256: &Sha256Digest,
        dossier: &DossierId,
        mime: Option<&str>,
        metadata: Option<&str>,
        injection_risk: InjectionRisk,
        antivirus_status: &AntivirusStatus,
    ) -> Result<(), IngestError> {
        let now = Utc::now();
        sqlx::query(
            "UPDATE pieces SET mime = ?, metadata = ?, injection_risk = ?, antivirus_status = ?, updated_at = ? \
             WHERE sha256 = ? AND dossier_id = ?",
        )
        .bind(mime)
        .bind(metadata)
        .bind(injection_risk.as_str())
        .bind(antivirus_status.to_string())
        .bind(now)
        .bind(sha256.as_str())
        .bind(dossier.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| IngestError::Database(format!("failed to update piece metadata: {e}")))?;
        Ok(())
    }
}
