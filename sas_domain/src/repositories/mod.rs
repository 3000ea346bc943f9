// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Persistence ports for the metadata store's five aggregates. Concrete
//! implementations live in `sas::infrastructure::repositories` and are
//! backed by a single SQLite database per the metadata-store design.

mod chunk_repository;
mod dossier_repository;
mod piece_repository;
mod route_repository;
mod upload_repository;

pub use chunk_repository::ChunkRepository;
pub use dossier_repository::DossierRepository;
pub use piece_repository::PieceRepository;
pub use route_repository::RouteRepository;
pub use upload_repository::UploadRepository;
