// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Structural Scanner Port
//!
//! Header/trailer/magic-byte heuristics over a piece's chunk files: MIME
//! sniffing, entropy estimation, and the zip-bomb / polyglot / macro
//! warning rules. Pure in the sense that it never mutates piece state
//! itself — it only reports findings for the orchestrator to act on.

use crate::error::IngestError;
use async_trait::async_trait;
use std::path::Path;

/// Findings from a single structural scan pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuralScanResult {
    pub mime: Option<String>,
    pub magic: Option<String>,
    pub header_entropy: f64,
    pub full_file_entropy: f64,
    pub warnings: Vec<String>,
    pub blocked: bool,
}

impl StructuralScanResult {
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

#[async_trait]
pub trait StructuralScanner: Send + Sync {
    /// Scans a piece's already-placed chunk directory. `chunk_count` lets
    /// the implementation locate the final chunk for trailer analysis
    /// without listing the directory.
    async fn scan(
        &self,
        piece_dir: &Path,
        chunk_count: u32,
        filename_hint: Option<&str>,
    ) -> Result<StructuralScanResult, IngestError>;
}
