// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunk
//!
//! A single fixed-size byte range of a piece. The `received` flag exists so
//! the metadata store's `insert_chunk` can be idempotent on the primary key
//! without caring whether the caller is replaying a retried write.

use crate::value_objects::{ChunkIndex, DossierId, Sha256Digest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub piece_sha256: Sha256Digest,
    pub dossier_id: DossierId,
    pub index: ChunkIndex,
    pub chunk_sha256: Sha256Digest,
    pub received: bool,
}

impl Chunk {
    pub fn new(
        piece_sha256: Sha256Digest,
        dossier_id: DossierId,
        index: ChunkIndex,
        chunk_sha256: Sha256Digest,
    ) -> Self {
        Self {
            piece_sha256,
            dossier_id,
            index,
            chunk_sha256,
            received: true,
        }
    }
}

/// Verifies a set of chunk indices is contiguous from 0 with no gaps, per
/// the chunk-row invariant.
pub fn indices_are_contiguous(indices: &[ChunkIndex]) -> bool {
    let mut sorted: Vec<u32> = indices.iter().map(|i| i.value()).collect();
    sorted.sort_unstable();
    sorted.iter().enumerate().all(|(i, &v)| i as u32 == v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_indices_pass() {
        let indices: Vec<ChunkIndex> = (0..5).map(ChunkIndex::new).collect();
        assert!(indices_are_contiguous(&indices));
    }

    #[test]
    fn gap_in_indices_fails() {
        let indices = vec![ChunkIndex::new(0), ChunkIndex::new(2)];
        assert!(!indices_are_contiguous(&indices));
    }

    #[test]
    fn empty_is_contiguous() {
        assert!(indices_are_contiguous(&[]));
    }
}
