// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Sas Domain
//!
//! Pure business logic for the multi-tenant file-ingestion pipeline:
//! entities, value objects, and the port traits (services/repositories)
//! that infrastructure adapters implement. Nothing in this crate touches a
//! filesystem, a socket, or a database driver directly.
//!
//! ## Module Structure
//!
//! - [`value_objects`]: identifiers, digests, and the closed tagged-variant
//!   fields of the metadata model (`PieceState`, `InjectionRisk`,
//!   `AntivirusStatus`, `AuthMode`).
//! - [`entities`]: the five aggregates of the metadata model — `Dossier`,
//!   `Piece`, `Chunk`, `RouteSpec`, `PendingRoute`, `ResumableUpload`.
//! - [`services`]: capability interfaces the orchestrator depends on —
//!   chunk storage, chunking, the three scanners, and HMAC signing.
//! - [`repositories`]: persistence ports for the metadata store's
//!   aggregates.
//! - [`error`]: the closed [`IngestError`] enum shared across layers.
//!
//! ## Identity Cutoff
//!
//! `owner_principal` is only ever read or compared by
//! [`entities::Dossier::check_owner`], invoked from
//! [`repositories::DossierRepository::ensure_dossier`]. No other type in
//! this crate holds a field named `owner_principal`; everything downstream
//! of dossier creation carries only a [`value_objects::DossierId`] and,
//! for `jwt_passthru` routes, an opaque `carried_token`.

pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::{Chunk, Dossier, PendingRoute, Piece, ResumableUpload, RouteSpec};
pub use error::IngestError;
pub use value_objects::{
    AntivirusStatus, AuthMode, ChunkIndex, DossierId, InjectionRisk, PieceState, RouteUrl,
    RunningDigest, Sha256Digest, UploadId,
};
