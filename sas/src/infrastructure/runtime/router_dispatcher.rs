// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Router Dispatcher
//!
//! Polls [`RouteRepository::list_routes_due`] and attempts delivery for
//! each due route, up to `delivery_concurrency` in flight at once. Each
//! route is "claimed" by writing its updated `attempts`/`next_retry_at`
//! under the metadata store's serialized-write discipline before the next
//! poll can pick it up again, so at most one delivery attempt is ever in
//! flight per route.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use sas_domain::entities::PendingRoute;
use sas_domain::repositories::RouteRepository;
use sas_domain::services::Signer;
use sas_domain::IngestError;
use std::sync::Arc;
use tracing::{info, warn};

use super::super::adapters::{WebhookClient, WebhookPayload};

pub struct RouterDispatcher {
    routes: Arc<dyn RouteRepository>,
    webhook_client: Arc<WebhookClient>,
    signer: Arc<dyn Signer>,
    delivery_concurrency: usize,
}

impl RouterDispatcher {
    pub fn new(routes: Arc<dyn RouteRepository>, webhook_client: Arc<WebhookClient>, signer: Arc<dyn Signer>, delivery_concurrency: usize) -> Self {
        Self {
            routes,
            webhook_client,
            signer,
            delivery_concurrency,
        }
    }

    /// Runs one dispatch pass: fetch due routes, attempt each, record the
    /// outcome. Returns the number of routes attempted.
    pub async fn dispatch_once(&self) -> Result<usize, IngestError> {
        let due = self.routes.list_routes_due(Utc::now()).await?;
        let count = due.len();

        stream::iter(due)
            .for_each_concurrent(self.delivery_concurrency, |route| async move {
                if let Err(e) = self.attempt(&route).await {
                    warn!(error = %e, piece_sha256 = %route.piece_sha256, "route delivery attempt failed");
                }
            })
            .await;

        Ok(count)
    }

    async fn attempt(&self, route: &PendingRoute) -> Result<(), IngestError> {
        let payload = WebhookPayload::piece_ready(
            route.dossier_id.as_str().to_string(),
            route.piece_sha256.as_str().to_string(),
            route.size_bytes,
            route.mime.clone(),
            Utc::now(),
        );

        let result = self
            .webhook_client
            .deliver(
                route.target_url.as_str(),
                route.auth_mode,
                route.secret.as_deref(),
                route.carried_token.as_deref(),
                self.signer.as_ref(),
                &payload,
            )
            .await;

        match result {
            Ok(()) => {
                self.routes
                    .delete_route(&route.piece_sha256, &route.dossier_id, &route.target_url)
                    .await?;
                info!(piece_sha256 = %route.piece_sha256, url = route.target_url.as_str(), "webhook delivered");
                Ok(())
            }
            Err(e) => {
                let mut retry = route.clone();
                retry.record_failure(e.to_string(), Utc::now());
                self.routes
                    .update_route_attempt(
                        &retry.piece_sha256,
                        &retry.dossier_id,
                        &retry.target_url,
                        retry.attempts,
                        retry.last_error.as_deref(),
                        retry.next_retry_at,
                    )
                    .await?;
                Err(e)
            }
        }
    }
}
