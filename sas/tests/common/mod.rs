// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Shared wiring for integration tests: a full in-process stack backed by a
//! temp-file SQLite database and a temp chunk root, the same components
//! `main.rs` wires together minus the router poll loop and signal handling.

use sas::application::orchestrator::IngestionOrchestrator;
use sas::application::use_cases::{AppendUpload, CreateUpload, FinalizeUpload, ReviewPiece};
use sas::infrastructure::adapters::{AntivirusConfig, ClamAvGateway, HeuristicStructuralScanner, RegexInjectionScanner};
use sas::infrastructure::repositories::schema::initialize_database;
use sas::infrastructure::repositories::{
    SqliteChunkRepository, SqliteDossierRepository, SqlitePieceRepository, SqliteRouteRepository, SqliteUploadRepository,
};
use sas::infrastructure::runtime::{FileStreamingChunker, FsChunkStore, ResumableReceiver};
use sas_domain::repositories::{ChunkRepository, DossierRepository, PieceRepository, RouteRepository, UploadRepository};
use sas_domain::RouteSpec;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

pub const CHUNK_SIZE_BYTES: usize = 64 * 1024;
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

pub struct TestStack {
    pub pool: SqlitePool,
    pub dossiers: Arc<dyn DossierRepository>,
    pub pieces: Arc<dyn PieceRepository>,
    pub routes: Arc<dyn RouteRepository>,
    pub create_upload: CreateUpload,
    pub append_upload: AppendUpload,
    pub finalize_upload: FinalizeUpload,
    pub review_piece: ReviewPiece,
    // Kept alive for the duration of the test; chunk files live under here.
    _chunks_root: TempDir,
    // Kept alive so the SQLite file isn't deleted mid-test.
    _db_file: TempDir,
}

impl TestStack {
    pub async fn build(global_routes: Vec<RouteSpec>) -> Self {
        let db_dir = tempdir().unwrap();
        let db_path = db_dir.path().join("sas.db");
        let database_url = format!("sqlite://{}", db_path.display());
        let pool = initialize_database(&database_url).await.unwrap();

        let dossiers: Arc<dyn DossierRepository> = Arc::new(SqliteDossierRepository::new(pool.clone()));
        let pieces: Arc<dyn PieceRepository> = Arc::new(SqlitePieceRepository::new(pool.clone()));
        let routes: Arc<dyn RouteRepository> = Arc::new(SqliteRouteRepository::new(pool.clone()));
        let uploads: Arc<dyn UploadRepository> = Arc::new(SqliteUploadRepository::new(pool.clone()));
        let chunks: Arc<dyn ChunkRepository> = Arc::new(SqliteChunkRepository::new(pool.clone()));

        let chunks_root = tempdir().unwrap();
        let chunk_store = Arc::new(FsChunkStore::new(chunks_root.path()));
        let chunker = Arc::new(FileStreamingChunker::new());
        let structural_scanner = Arc::new(HeuristicStructuralScanner::new());
        let injection_scanner = Arc::new(RegexInjectionScanner::new());
        let antivirus_gateway = Arc::new(ClamAvGateway::new(AntivirusConfig {
            enabled: false,
            address: "127.0.0.1:1".to_string(),
        }));

        let orchestrator = Arc::new(IngestionOrchestrator::new(
            dossiers.clone(),
            pieces.clone(),
            routes.clone(),
            chunk_store.clone(),
            structural_scanner,
            antivirus_gateway,
            injection_scanner,
            global_routes,
        ));

        let receiver = Arc::new(ResumableReceiver::new(
            chunks_root.path(),
            MAX_FILE_BYTES,
            CHUNK_SIZE_BYTES,
            uploads.clone(),
            pieces.clone(),
            chunks,
            chunker,
            chunk_store,
        ));

        let create_upload = CreateUpload::new(orchestrator.clone(), receiver.clone());
        let append_upload = AppendUpload::new(receiver.clone());
        let finalize_upload = FinalizeUpload::new(orchestrator.clone(), receiver, uploads, pieces.clone());
        let review_piece = ReviewPiece::new(orchestrator);

        Self {
            pool,
            dossiers,
            pieces,
            routes,
            create_upload,
            append_upload,
            finalize_upload,
            review_piece,
            _chunks_root: chunks_root,
            _db_file: db_dir,
        }
    }

    /// Drives a whole file through Create/Append/Finalize in one call and
    /// returns the finalize result.
    pub async fn ingest(
        &self,
        dossier_id: &str,
        owner: &str,
        bytes: &[u8],
    ) -> Result<sas::application::use_cases::finalize_upload::FinalizeResult, sas_domain::IngestError> {
        let upload_id = self.create_upload.execute(dossier_id, owner, bytes.len() as u64).await?;
        self.append_upload.execute(&upload_id, 0, bytes).await?;
        self.finalize_upload.execute(&upload_id, None).await
    }
}
