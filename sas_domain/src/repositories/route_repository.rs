// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Route Repository Interface
//!
//! Persistence for pending webhook deliveries. `list_routes_due` is the
//! dispatcher's polling query; `update_route_attempt` is the "claim" used
//! under the metadata store's serialized-write discipline to guarantee at
//! most one in-flight delivery attempt per route.

use crate::entities::PendingRoute;
use crate::error::IngestError;
use crate::value_objects::{DossierId, RouteUrl, Sha256Digest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait RouteRepository: Send + Sync {
    async fn insert_route(&self, route: &PendingRoute) -> Result<(), IngestError>;

    /// Routes with `attempts < 5`, `(not require_review or reviewed)`, and
    /// `next_retry_at <= now`.
    async fn list_routes_due(&self, now: DateTime<Utc>) -> Result<Vec<PendingRoute>, IngestError>;

    async fn update_route_attempt(
        &self,
        piece_sha256: &Sha256Digest,
        dossier: &DossierId,
        target_url: &RouteUrl,
        attempts: u32,
        last_error: Option<&str>,
        next_retry_at: DateTime<Utc>,
    ) -> Result<(), IngestError>;

    async fn delete_route(
        &self,
        piece_sha256: &Sha256Digest,
        dossier: &DossierId,
        target_url: &RouteUrl,
    ) -> Result<(), IngestError>;
}
