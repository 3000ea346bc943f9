// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Injection Scanner Port
//!
//! Regex-based prompt-injection detection across a piece's chunk text.
//! Aggregation (worst-across-chunks) is the implementation's job; this
//! trait only asks for the final risk level.

use crate::error::IngestError;
use crate::value_objects::InjectionRisk;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait InjectionScanner: Send + Sync {
    async fn scan(&self, piece_dir: &Path, chunk_count: u32) -> Result<InjectionRisk, IngestError>;
}
