// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Immutable value types shared across the domain: identifiers, digests,
//! and the closed tagged-variant fields of the metadata model.

mod antivirus_status;
mod auth_mode;
mod chunk_index;
mod dossier_id;
mod injection_risk;
mod piece_state;
mod route_url;
mod sha256_digest;
mod upload_id;

pub use antivirus_status::AntivirusStatus;
pub use auth_mode::{AuthMode, UnknownAuthMode};
pub use chunk_index::ChunkIndex;
pub use dossier_id::DossierId;
pub use injection_risk::{InjectionRisk, UnknownInjectionRisk};
pub use piece_state::{PieceState, UnknownPieceState};
pub use route_url::RouteUrl;
pub use sha256_digest::{RunningDigest, Sha256Digest};
pub use upload_id::{InvalidUploadId, UploadId};
