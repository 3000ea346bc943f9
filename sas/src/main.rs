// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Sas Ingestion Worker
//!
//! The standalone process: load config, open the metadata store and chunk
//! store, run crash recovery for every known dossier, then loop the
//! webhook router's dispatch pass on a timer until a shutdown signal
//! arrives. The resumable-upload and review use cases are constructed
//! here too, but this binary has no transport layer of its own — an HTTP
//! or gRPC frontend embedding this crate would call into `application`
//! directly rather than through this process.

use sas::application::orchestrator::IngestionOrchestrator;
use sas::application::use_cases::{AppendUpload, CreateUpload, DeliverRoutes, FinalizeUpload, Recover, ReviewPiece};
use sas::infrastructure::adapters::{
    AntivirusConfig, ClamAvGateway, HeuristicStructuralScanner, HmacSha256Signer, RegexInjectionScanner, WebhookClient,
};
use sas::infrastructure::config::SasConfig;
use sas::infrastructure::repositories::schema::initialize_database;
use sas::infrastructure::repositories::{
    SqliteChunkRepository, SqliteDossierRepository, SqlitePieceRepository, SqliteRouteRepository, SqliteUploadRepository,
};
use sas::infrastructure::runtime::{FileStreamingChunker, FsChunkStore, RecoveryService, ResumableReceiver, RouterDispatcher};
use sas::infrastructure::{logging, metrics};
use sas_bootstrap::shutdown::ShutdownCoordinator;
use sas_domain::repositories::{ChunkRepository, DossierRepository, PieceRepository, RouteRepository, UploadRepository};
use sas_domain::services::{AntivirusGateway, ChunkStore, ChunkerService, InjectionScanner, Signer, StructuralScanner};
use sas_domain::{AuthMode, DossierId, IngestError, RouteSpec, RouteUrl};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = match sas_bootstrap::parse_and_validate() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("argument error: {e}");
            return sas_bootstrap::ExitCode::Usage.as_process_exit_code();
        }
    };

    sas_bootstrap::result_to_exit_code(run(cli).await)
}

async fn run(cli: sas_bootstrap::ValidatedCli) -> Result<(), IngestError> {
    let config_path = sas_bootstrap::config::resolve_config_path(cli.config.clone());
    let mut config = SasConfig::load(&config_path)?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging);

    info!(config_path = %config_path.display(), "starting sas ingestion worker");
    init_metrics_registry(&config);

    let pool = initialize_database(&config.database_url)
        .await
        .map_err(|e| IngestError::Database(e.to_string()))?;

    let dossiers: Arc<dyn DossierRepository> = Arc::new(SqliteDossierRepository::new(pool.clone()));
    let pieces: Arc<dyn PieceRepository> = Arc::new(SqlitePieceRepository::new(pool.clone()));
    let routes: Arc<dyn RouteRepository> = Arc::new(SqliteRouteRepository::new(pool.clone()));
    let uploads: Arc<dyn UploadRepository> = Arc::new(SqliteUploadRepository::new(pool.clone()));
    let chunks: Arc<dyn ChunkRepository> = Arc::new(SqliteChunkRepository::new(pool.clone()));
    let recovery_chunks = chunks.clone();

    let chunk_store: Arc<dyn ChunkStore> = Arc::new(FsChunkStore::new(config.chunks_root.clone()));
    let chunker: Arc<dyn ChunkerService> = Arc::new(FileStreamingChunker::new());
    let structural_scanner: Arc<dyn StructuralScanner> = Arc::new(HeuristicStructuralScanner::new());
    let injection_scanner: Arc<dyn InjectionScanner> = Arc::new(RegexInjectionScanner::new());
    let antivirus_gateway: Arc<dyn AntivirusGateway> = Arc::new(ClamAvGateway::new(AntivirusConfig {
        enabled: config.antivirus.enabled,
        address: config.antivirus.address.clone(),
    }));

    let global_routes = resolve_global_routes(&config)?;

    let orchestrator = Arc::new(IngestionOrchestrator::new(
        dossiers,
        pieces.clone(),
        routes.clone(),
        chunk_store.clone(),
        structural_scanner,
        antivirus_gateway,
        injection_scanner,
        global_routes,
    ));

    let receiver = Arc::new(ResumableReceiver::new(
        config.chunks_root.clone(),
        config.max_file_bytes,
        config.chunk_size_bytes,
        uploads.clone(),
        pieces.clone(),
        chunks,
        chunker,
        chunk_store,
    ));

    let create_upload = CreateUpload::new(orchestrator.clone(), receiver.clone());
    let append_upload = AppendUpload::new(receiver.clone());
    let finalize_upload = FinalizeUpload::new(orchestrator.clone(), receiver, uploads, pieces.clone());
    let review_piece = ReviewPiece::new(orchestrator.clone());
    // These four use cases are what a transport layer embedding this crate
    // would call into; this worker process exercises none of them directly,
    // but constructs them eagerly so a misconfigured dependency graph fails
    // at startup rather than on first request.
    let _ = (&create_upload, &append_upload, &finalize_upload, &review_piece);

    let recovery = Recover::new(Arc::new(RecoveryService::new(pieces)), orchestrator, recovery_chunks);
    run_startup_recovery(&pool, &recovery).await?;

    let signer: Arc<dyn Signer> = Arc::new(HmacSha256Signer::new());
    let webhook_client = Arc::new(WebhookClient::new());
    let dispatcher = Arc::new(RouterDispatcher::new(
        routes,
        webhook_client,
        signer,
        config.webhooks.delivery_concurrency,
    ));
    let deliver_routes = DeliverRoutes::new(dispatcher);

    let shutdown = ShutdownCoordinator::new(Duration::from_secs(DEFAULT_SHUTDOWN_GRACE_SECS));
    let token = shutdown.token();
    tokio::spawn(async move {
        let signal = sas_bootstrap::signals::wait_for_shutdown_signal().await;
        info!(%signal, "received shutdown signal");
        shutdown.initiate_shutdown();
        shutdown.wait_for_shutdown().await;
    });

    let poll_interval = Duration::from_secs(config.router.poll_interval_secs);
    info!(poll_interval_secs = config.router.poll_interval_secs, "entering router dispatch loop");

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                info!("shutdown signal received, exiting dispatch loop");
                break;
            }
            _ = tokio::time::sleep(poll_interval) => {
                match deliver_routes.execute().await {
                    Ok(count) if count > 0 => info!(routes_attempted = count, "dispatch pass complete"),
                    Ok(_) => {}
                    Err(e) => error!(error = %e, "router dispatch pass failed"),
                }
            }
        }
    }

    Ok(())
}

fn init_metrics_registry(config: &SasConfig) {
    if config.metrics.enabled {
        metrics::METRICS.registry.gather();
        info!(bind_address = %config.metrics.bind_address, "metrics registry initialized (no embedded scrape server in this build)");
    }
}

fn resolve_global_routes(config: &SasConfig) -> Result<Vec<RouteSpec>, IngestError> {
    config
        .webhooks
        .global_routes
        .iter()
        .map(|route| {
            Ok(RouteSpec {
                url: RouteUrl::parse(route.url.clone())?,
                auth_mode: AuthMode::from_str(&route.auth_mode)
                    .map_err(|e| IngestError::invalid_argument(format!("config webhooks.global_routes: {e}")))?,
                secret: route.secret.clone(),
                require_review: route.require_review,
            })
        })
        .collect()
}

/// Recovers every dossier the metadata store knows about. There is no
/// domain-level "list all dossiers" port (the domain only ever addresses a
/// dossier by id), so this reads the table directly the way a bootstrap
/// step that owns the whole database is allowed to.
async fn run_startup_recovery(pool: &sqlx::SqlitePool, recovery: &Recover) -> Result<(), IngestError> {
    let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM dossiers")
        .fetch_all(pool)
        .await
        .map_err(|e| IngestError::Database(e.to_string()))?;

    let mut total_reset = 0;
    for id in ids {
        let dossier_id = match DossierId::parse(id.clone()) {
            Ok(id) => id,
            Err(e) => {
                warn!(dossier_id = %id, error = %e, "skipping malformed dossier id during recovery");
                continue;
            }
        };
        total_reset += recovery.execute(&dossier_id).await?;
    }

    if total_reset > 0 {
        info!(total_reset, "startup recovery reset stuck pieces across all dossiers");
    }

    Ok(())
}
