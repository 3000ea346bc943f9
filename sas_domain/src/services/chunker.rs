// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Streaming Chunker Port
//!
//! Splits an already-staged input file into fixed-size chunk files,
//! producing per-chunk digests, the whole-piece digest, and a manifest.
//! The port takes a file path rather than a byte stream because the
//! Resumable Receiver has already persisted the upload to a staging file
//! by the time Finalize invokes the chunker; the `O(chunk_size)` memory
//! bound is an implementation property of the reader loop, not something
//! the trait signature needs to express.

use crate::error::IngestError;
use crate::value_objects::{ChunkIndex, Sha256Digest};
use async_trait::async_trait;
use std::path::Path;

/// One entry of a chunk manifest: `index -> (chunk_sha256, size)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkManifestEntry {
    pub index: ChunkIndex,
    pub chunk_sha256: Sha256Digest,
    pub size_bytes: u64,
}

/// Output of chunking a single staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkManifest {
    pub piece_sha256: Sha256Digest,
    pub total_size_bytes: u64,
    pub chunks: Vec<ChunkManifestEntry>,
}

impl ChunkManifest {
    pub fn chunk_count(&self) -> u32 {
        self.chunks.len() as u32
    }
}

#[async_trait]
pub trait ChunkerService: Send + Sync {
    /// Reads `input_path` once and writes zero-padded chunk files of at
    /// most `chunk_size_bytes` into `output_dir`. A caller whose input ends
    /// mid-chunk (the incomplete-final-chunk failure mode) should treat any
    /// `Err` return as "discard `output_dir` entirely, no rows inserted."
    async fn chunk_file(
        &self,
        input_path: &Path,
        output_dir: &Path,
        chunk_size_bytes: usize,
    ) -> Result<ChunkManifest, IngestError>;
}
