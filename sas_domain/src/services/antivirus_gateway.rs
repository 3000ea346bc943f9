// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Antivirus Gateway Port
//!
//! Capability interface for the external scanner: `scan(piece) -> status`.
//! Modeling this as a trait rather than a direct socket call scattered
//! through the orchestrator is what lets a disabled/misconfigured scanner
//! degrade to `skipped`/`error` without the caller needing to know why.

use crate::value_objects::AntivirusStatus;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait AntivirusGateway: Send + Sync {
    /// Streams a piece's chunk files to the scanner and returns the worst
    /// status observed. Never returns an `Err`: connect/read failures and
    /// a disabled configuration are themselves represented as
    /// [`AntivirusStatus`] variants so the orchestrator can apply the
    /// "degrade, don't block" rule uniformly.
    async fn scan(&self, piece_dir: &Path, chunk_count: u32) -> AntivirusStatus;
}
