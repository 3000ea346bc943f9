// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Streaming Chunker
//!
//! Reads a staged input file exactly once, writing fixed-size chunk files
//! and tracking a running whole-file digest alongside each chunk's own
//! digest. Memory use is bounded by `chunk_size_bytes`: one read buffer,
//! reused across chunks.

use async_trait::async_trait;
use sas_domain::services::{ChunkManifest, ChunkManifestEntry, ChunkerService};
use sas_domain::value_objects::RunningDigest;
use sas_domain::{ChunkIndex, IngestError, Sha256Digest};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

/// Width of the zero-padded chunk file suffix. Eight digits comfortably
/// covers `ceil(max_file_bytes / chunk_size_bytes)` for any file up to
/// many terabytes at a 1-byte chunk size, which is the worst case the
/// layout needs to survive.
const INDEX_WIDTH: usize = 8;

pub fn chunk_file_name(index: ChunkIndex) -> String {
    format!("chunk_{:0width$}.bin", index.value(), width = INDEX_WIDTH)
}

pub struct FileStreamingChunker;

impl FileStreamingChunker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileStreamingChunker {
    fn default() -> Self {
        Self::new()
    }
}

/// The actual read-chunk-write loop, factored out so `chunk_file` can run
/// `output_dir` cleanup on every exit path, not just the empty-input case.
async fn chunk_loop(input_path: &Path, output_dir: &Path, chunk_size_bytes: usize) -> Result<ChunkManifest, IngestError> {
    let input = File::open(input_path).await?;
    let mut reader = BufReader::new(input);
    let mut whole_file_digest = RunningDigest::new();
    let mut buffer = vec![0u8; chunk_size_bytes];
    let mut entries = Vec::new();
    let mut total_size: u64 = 0;
    let mut index = ChunkIndex::ZERO;

    loop {
        let mut filled = 0usize;
        while filled < chunk_size_bytes {
            let read = reader.read(&mut buffer[filled..]).await?;
            if read == 0 {
                break;
            }
            filled += read;
        }
        if filled == 0 {
            break;
        }

        let chunk_bytes = &buffer[..filled];
        whole_file_digest.update(chunk_bytes);
        let chunk_sha256 = Sha256Digest::of_bytes(chunk_bytes);

        let chunk_path = output_dir.join(chunk_file_name(index));
        let mut chunk_file = File::create(&chunk_path).await?;
        chunk_file.write_all(chunk_bytes).await?;
        chunk_file.flush().await?;

        entries.push(ChunkManifestEntry {
            index,
            chunk_sha256,
            size_bytes: filled as u64,
        });
        total_size += filled as u64;
        index = index.next();

        if filled < chunk_size_bytes {
            break;
        }
    }

    if entries.is_empty() {
        return Err(IngestError::invalid_argument("input produced zero chunks"));
    }

    Ok(ChunkManifest {
        piece_sha256: whole_file_digest.finalize(),
        total_size_bytes: total_size,
        chunks: entries,
    })
}

#[async_trait]
impl ChunkerService for FileStreamingChunker {
    async fn chunk_file(
        &self,
        input_path: &Path,
        output_dir: &Path,
        chunk_size_bytes: usize,
    ) -> Result<ChunkManifest, IngestError> {
        tokio::fs::create_dir_all(output_dir).await?;

        match chunk_loop(input_path, output_dir, chunk_size_bytes).await {
            Ok(manifest) => Ok(manifest),
            Err(e) => {
                tokio::fs::remove_dir_all(output_dir).await.ok();
                Err(e)
            }
        }
    }
}
