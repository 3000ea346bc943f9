// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Aggregates of the ingestion pipeline's metadata model: dossiers, pieces,
//! chunks, route specifications, pending deliveries, and resumable-upload
//! sessions.

mod chunk;
mod dossier;
mod pending_route;
mod piece;
mod resumable_upload;
mod route_spec;

pub use chunk::{indices_are_contiguous, Chunk};
pub use dossier::Dossier;
pub use pending_route::PendingRoute;
pub use piece::Piece;
pub use resumable_upload::ResumableUpload;
pub use route_spec::RouteSpec;
