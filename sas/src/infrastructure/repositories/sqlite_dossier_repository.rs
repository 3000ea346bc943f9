// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SQLite Dossier Repository
//!
//! `ensure_dossier` is the last place `owner_principal` is ever compared;
//! see the identity-cutoff note on [`sas_domain::Dossier::check_owner`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sas_domain::repositories::DossierRepository;
use sas_domain::{Dossier, DossierId, IngestError, RouteSpec};
use sqlx::{Row, SqlitePool};

pub struct SqliteDossierRepository {
    pool: SqlitePool,
}

impl SqliteDossierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: &DossierId) -> Result<Option<Dossier>, IngestError> {
        let row = sqlx::query("SELECT id, owner_principal, name, created_at FROM dossiers WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| IngestError::Database(format!("failed to fetch dossier: {e}")))?;

        let Some(row) = row else { return Ok(None) };

        let route_rows = sqlx::query(
            "SELECT url, auth_mode, secret, require_review FROM dossier_routes \
             WHERE dossier_id = ? ORDER BY seq ASC",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| IngestError::Database(format!("failed to fetch dossier routes: {e}")))?;

        let mut routes = Vec::with_capacity(route_rows.len());
        for r in route_rows {
            let url: String = r.try_get("url").map_err(row_err)?;
            let auth_mode: String = r.try_get("auth_mode").map_err(row_err)?;
            let secret: Option<String> = r.try_get("secret").map_err(row_err)?;
            let require_review: bool = r.try_get("require_review").map_err(row_err)?;
            routes.push(RouteSpec::new(
                sas_domain::RouteUrl::parse(url)?,
                auth_mode
                    .parse()
                    .map_err(|e| IngestError::internal(format!("stored auth_mode unreadable: {e}")))?,
                secret,
                require_review,
            ));
        }

        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(row_err)?;
        Ok(Some(Dossier {
            id: id.clone(),
            owner_principal: row.try_get("owner_principal").map_err(row_err)?,
            name: row.try_get("name").map_err(row_err)?,
            routes,
            created_at,
        }))
    }
}

fn row_err(e: sqlx::Error) -> IngestError {
    IngestError::Database(format!("row decode error: {e}"))
}

#[async_trait]
impl DossierRepository for SqliteDossierRepository {
    async fn ensure_dossier(&self, id: &DossierId, owner_principal: &str) -> Result<Dossier, IngestError> {
        if let Some(existing) = self.fetch(id).await? {
            existing.check_owner(owner_principal)?;
            return Ok(existing);
        }

        let now = Utc::now();
        sqlx::query("INSERT INTO dossiers (id, owner_principal, name, created_at) VALUES (?, ?, NULL, ?)")
            .bind(id.as_str())
            .bind(owner_principal)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| IngestError::Database(format!("failed to insert dossier: {e}")))?;

        Ok(Dossier::new(id.clone(), owner_principal.to_string(), now))
    }

    async fn get(&self, id: &DossierId) -> Result<Option<Dossier>, IngestError> {
        self.fetch(id).await
    }

    async fn delete(&self, id: &DossierId) -> Result<(), IngestError> {
        sqlx::query("DELETE FROM dossiers WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| IngestError::Database(format!("failed to delete dossier: {e}")))?;
        Ok(())
    }
}
