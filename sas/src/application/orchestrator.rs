// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Ingestion Orchestrator
//!
//! Drives one piece through the post-Finalize pipeline: ensure the dossier,
//! cross the identity cutoff, run the structural and injection scans,
//! compose the final state, persist it, and enqueue routes if the piece
//! came out `ready`. This is the one place that calls `owner_principal`
//! after Finalize and before dropping it — every type this function
//! returns or passes downstream carries `dossier_id` only.

use chrono::Utc;
use sas_domain::entities::Piece;
use sas_domain::repositories::{DossierRepository, PieceRepository, RouteRepository};
use sas_domain::services::{AntivirusGateway, ChunkStore, InjectionScanner, StructuralScanner};
use sas_domain::{DossierId, IngestError, PendingRoute, PieceState, RouteSpec, Sha256Digest};
use std::sync::Arc;
use tracing::{info, warn};

pub struct IngestionOrchestrator {
    dossiers: Arc<dyn DossierRepository>,
    pieces: Arc<dyn PieceRepository>,
    routes: Arc<dyn RouteRepository>,
    chunk_store: Arc<dyn ChunkStore>,
    structural_scanner: Arc<dyn StructuralScanner>,
    antivirus_gateway: Arc<dyn AntivirusGateway>,
    injection_scanner: Arc<dyn InjectionScanner>,
    global_routes: Vec<RouteSpec>,
}

impl IngestionOrchestrator {
    pub fn new(
        dossiers: Arc<dyn DossierRepository>,
        pieces: Arc<dyn PieceRepository>,
        routes: Arc<dyn RouteRepository>,
        chunk_store: Arc<dyn ChunkStore>,
        structural_scanner: Arc<dyn StructuralScanner>,
        antivirus_gateway: Arc<dyn AntivirusGateway>,
        injection_scanner: Arc<dyn InjectionScanner>,
        global_routes: Vec<RouteSpec>,
    ) -> Self {
        Self {
            dossiers,
            pieces,
            routes,
            chunk_store,
            structural_scanner,
            antivirus_gateway,
            injection_scanner,
            global_routes,
        }
    }

    /// Ensures the dossier exists (or validates ownership of an existing
    /// one) and emits the pre-cutoff audit record. Returns only the
    /// `dossier_id` — callers must not retain `owner_principal` past this
    /// call; that is the identity cutoff.
    pub async fn ensure_dossier_and_cut_identity(
        &self,
        dossier_id: &DossierId,
        owner_principal: &str,
    ) -> Result<(), IngestError> {
        self.dossiers.ensure_dossier(dossier_id, owner_principal).await?;
        info!(dossier_id = dossier_id.as_str(), "pre-cutoff audit: dossier ensured for principal");
        // owner_principal goes out of scope here; everything below this
        // function's return only ever sees `dossier_id`.
        Ok(())
    }

    /// Runs the post-cutoff scan pipeline for a freshly-received piece and
    /// persists the resulting state. `carried_token` is the opaque
    /// identity-cutoff token, forwarded untouched to route enqueue.
    pub async fn process_piece(
        &self,
        dossier_id: &DossierId,
        sha256: &Sha256Digest,
        chunk_count: u32,
        filename_hint: Option<&str>,
        carried_token: Option<&str>,
    ) -> Result<PieceState, IngestError> {
        let piece_dir = self.chunk_store.piece_dir(dossier_id, sha256);

        let structural = self.structural_scanner.scan(&piece_dir, chunk_count, filename_hint).await?;
        if structural.blocked {
            self.pieces.update_piece_state(sha256, dossier_id, PieceState::Blocked).await?;
            warn!(dossier_id = dossier_id.as_str(), sha256 = sha256.as_str(), "post-cutoff audit: piece blocked by structural scan");
            return Ok(PieceState::Blocked);
        }

        // Checkpoint: the structural step has run and did not block. If the
        // process crashes before the terminal transition below, startup
        // recovery finds the piece here and requeues it from this point.
        self.pieces.update_piece_state(sha256, dossier_id, PieceState::Scanned).await?;

        let antivirus_status = self.antivirus_gateway.scan(&piece_dir, chunk_count).await;
        let injection_risk = self.injection_scanner.scan(&piece_dir, chunk_count).await?;

        let metadata = if structural.warnings.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&structural.warnings).map_err(|e| IngestError::internal(e.to_string()))?)
        };

        self.pieces
            .update_piece_metadata(sha256, dossier_id, structural.mime.as_deref(), metadata.as_deref(), injection_risk, &antivirus_status)
            .await?;

        if antivirus_status.blocks_piece() {
            self.pieces.update_piece_state(sha256, dossier_id, PieceState::Blocked).await?;
            warn!(dossier_id = dossier_id.as_str(), sha256 = sha256.as_str(), "post-cutoff audit: piece blocked by antivirus");
            return Ok(PieceState::Blocked);
        }

        let final_state = Piece::compose_final_state(false, injection_risk);
        self.pieces.update_piece_state(sha256, dossier_id, final_state).await?;

        if final_state == PieceState::Ready {
            self.enqueue_routes(dossier_id, sha256, carried_token).await?;
        }

        Ok(final_state)
    }

    /// Admin action: moves a `flagged` piece to `ready` (enqueuing routes)
    /// or to `blocked`.
    pub async fn review_piece(
        &self,
        dossier_id: &DossierId,
        sha256: &Sha256Digest,
        approve: bool,
        carried_token: Option<&str>,
    ) -> Result<PieceState, IngestError> {
        let next = if approve { PieceState::Ready } else { PieceState::Blocked };
        self.pieces.update_piece_state(sha256, dossier_id, next).await?;
        if next == PieceState::Ready {
            self.enqueue_routes(dossier_id, sha256, carried_token).await?;
        }
        Ok(next)
    }

    async fn enqueue_routes(&self, dossier_id: &DossierId, sha256: &Sha256Digest, carried_token: Option<&str>) -> Result<(), IngestError> {
        let dossier = self
            .dossiers
            .get(dossier_id)
            .await?
            .ok_or_else(|| IngestError::not_found(format!("dossier {dossier_id} vanished after cutoff")))?;

        let piece = self
            .pieces
            .get_piece(sha256, dossier_id)
            .await?
            .ok_or_else(|| IngestError::not_found(format!("piece {} vanished before route enqueue", sha256.as_str())))?;

        let routes = dossier.effective_routes(&self.global_routes);
        let now = Utc::now();

        for spec in routes {
            let route = PendingRoute::new(
                sha256.clone(),
                dossier_id.clone(),
                spec.url.clone(),
                spec.auth_mode,
                spec.require_review,
                carried_token.map(str::to_string),
                spec.secret.clone(),
                piece.size_bytes,
                piece.mime.clone(),
                now,
            );
            self.routes.insert_route(&route).await?;
        }

        Ok(())
    }
}
