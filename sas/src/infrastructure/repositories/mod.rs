// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! SQLite-backed implementations of the domain's repository ports, one
//! module per aggregate, plus shared schema and transaction helpers.

pub mod schema;
pub mod transaction;

mod sqlite_chunk_repository;
mod sqlite_dossier_repository;
mod sqlite_piece_repository;
mod sqlite_route_repository;
mod sqlite_upload_repository;

pub use sqlite_chunk_repository::SqliteChunkRepository;
pub use sqlite_dossier_repository::SqliteDossierRepository;
pub use sqlite_piece_repository::SqlitePieceRepository;
pub use sqlite_route_repository::SqliteRouteRepository;
pub use sqlite_upload_repository::SqliteUploadRepository;
