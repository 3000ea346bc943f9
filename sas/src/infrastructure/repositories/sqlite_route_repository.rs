// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SQLite Route Repository
//!
//! `carried_token` is stored in its own nullable column, never merged into
//! any logged or audited field. Nothing in this module formats a row for
//! logging: see [`sas::infrastructure::runtime::router_dispatcher`] for
//! where the redaction discipline is enforced.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sas_domain::repositories::RouteRepository;
use sas_domain::{AuthMode, DossierId, IngestError, PendingRoute, RouteUrl, Sha256Digest};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

pub struct SqliteRouteRepository {
    pool: SqlitePool,
}

impl SqliteRouteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_route(row: &sqlx::sqlite::SqliteRow) -> Result<PendingRoute, IngestError> {
    let piece_sha256: String = row
        .try_get("piece_sha256")
        .map_err(|e| IngestError::Database(e.to_string()))?;
    let dossier_id: String = row
        .try_get("dossier_id")
        .map_err(|e| IngestError::Database(e.to_string()))?;
    let target_url: String = row
        .try_get("target_url")
        .map_err(|e| IngestError::Database(e.to_string()))?;
    let auth_mode: String = row
        .try_get("auth_mode")
        .map_err(|e| IngestError::Database(e.to_string()))?;

    Ok(PendingRoute {
        piece_sha256: Sha256Digest::parse(piece_sha256)?,
        dossier_id: DossierId::parse(dossier_id)?,
        target_url: RouteUrl::parse(target_url)?,
        auth_mode: AuthMode::from_str(&auth_mode)
            .map_err(|e| IngestError::internal(format!("stored auth_mode unreadable: {e}")))?,
        require_review: row
            .try_get("require_review")
            .map_err(|e| IngestError::Database(e.to_string()))?,
        reviewed: row.try_get("reviewed").map_err(|e| IngestError::Database(e.to_string()))?,
        attempts: {
            let raw: i64 = row.try_get("attempts").map_err(|e| IngestError::Database(e.to_string()))?;
            raw as u32
        },
        last_error: row.try_get("last_error").map_err(|e| IngestError::Database(e.to_string()))?,
        next_retry_at: row
            .try_get("next_retry_at")
            .map_err(|e| IngestError::Database(e.to_string()))?,
        carried_token: row
            .try_get("carried_token")
            .map_err(|e| IngestError::Database(e.to_string()))?,
        secret: row.try_get("secret").map_err(|e| IngestError::Database(e.to_string()))?,
        size_bytes: {
            let raw: i64 = row.try_get("size_bytes").map_err(|e| IngestError::Database(e.to_string()))?;
            raw as u64
        },
        mime: row.try_get("mime").map_err(|e| IngestError::Database(e.to_string()))?,
    })
}

#[async_trait]
impl RouteRepository for SqliteRouteRepository {
    async fn insert_route(&self, route: &PendingRoute) -> Result<(), IngestError> {
        sqlx::query(
            "INSERT INTO pending_routes \
             (piece_sha256, dossier_id, target_url, auth_mode, require_review, reviewed, \
              attempts, last_error, next_retry_at, carried_token, secret, size_bytes, mime) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(piece_sha256, dossier_id, target_url) DO NOTHING",
        )
        .bind(route.piece_sha256.as_str())
        .bind(route.dossier_id.as_str())
        .bind(route.target_url.as_str())
        .bind(route.auth_mode.as_str())
        .bind(route.require_review)
        .bind(route.reviewed)
        .bind(route.attempts as i64)
        .bind(&route.last_error)
        .bind(route.next_retry_at)
        .bind(&route.carried_token)
        .bind(&route.secret)
        .bind(route.size_bytes as i64)
        .bind(&route.mime)
        .execute(&self.pool)
        .await
        .map_err(|e| IngestError::Database(format!("failed to insert route: {e}")))?;
        Ok(())
    }

    async fn list_routes_due(&self, now: DateTime<Utc>) -> Result<Vec<PendingRoute>, IngestError> {
        let rows = sqlx::query(
            "SELECT * FROM pending_routes \
             WHERE attempts < 5 AND (require_review = 0 OR reviewed = 1) AND next_retry_at <= ?",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| IngestError::Database(format!("failed to list due routes: {e}")))?;

        rows.iter().map(row_to_route).collect()
    }

    async fn update_route_attempt(
        &self,
        piece_sha256: &Sha256Digest,
        dossier: &DossierId,
        target_url: &RouteUrl,
        attempts: u32,
        last_error: Option<&str>,
        next_retry_at: DateTime<Utc>,
    ) -> Result<(), IngestError> {
        sqlx::query(
            "UPDATE pending_routes SET attempts = ?, last_error = ?, next_retry_at = ? \
             WHERE piece_sha256 = ? AND dossier_id = ? AND target_url = ?",
        )
        .bind(attempts as i64)
        .bind(last_error)
        .bind(next_retry_at)
        .bind(piece_sha256.as_str())
        .bind(dossier.as_str())
        .bind(target_url.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| IngestError::Database(format!("failed to update route attempt: {e}")))?;
        Ok(())
    }

    async fn delete_route(
        &self,
        piece_sha256: &Sha256Digest,
        dossier: &DossierId,
        target_url: &RouteUrl,
    ) -> Result<(), IngestError> {
        sqlx::query(
            "DELETE FROM pending_routes WHERE piece_sha256 = ? AND dossier_id = ? AND target_url = ?",
        )
        .bind(piece_sha256.as_str())
        .bind(dossier.as_str())
        .bind(target_url.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| IngestError::Database(format!("failed to delete route: {e}")))?;
        Ok(())
    }
}
