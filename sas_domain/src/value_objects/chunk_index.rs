// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunk Index
//!
//! Zero-based ordinal of a chunk within its piece. A thin newtype over
//! `u32` so chunk ordinals can't be silently mixed up with byte offsets or
//! chunk sizes at call sites.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkIndex(u32);

impl ChunkIndex {
    pub const ZERO: ChunkIndex = ChunkIndex(0);

    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl Display for ChunkIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ChunkIndex {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<ChunkIndex> for u32 {
    fn from(index: ChunkIndex) -> Self {
        index.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_increments() {
        assert_eq!(ChunkIndex::ZERO.next(), ChunkIndex::new(1));
    }

    #[test]
    fn orders_numerically() {
        assert!(ChunkIndex::new(1) < ChunkIndex::new(2));
    }
}
