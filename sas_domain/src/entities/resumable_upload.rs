// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Resumable Upload
//!
//! Session state for the offset-based upload protocol. `validate_append`
//! is the single point where the `client_offset == stored_offset`
//! invariant is enforced, so both the in-process receiver and any future
//! alternate transport share the exact same rejection logic.

use crate::error::IngestError;
use crate::value_objects::{DossierId, UploadId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumableUpload {
    pub id: UploadId,
    pub dossier_id: DossierId,
    pub owner_principal: String,
    pub total_size: u64,
    pub offset: u64,
    pub chunk_dir: PathBuf,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed: bool,
}

impl ResumableUpload {
    pub fn new(
        id: UploadId,
        dossier_id: DossierId,
        owner_principal: String,
        total_size: u64,
        chunk_dir: PathBuf,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            dossier_id,
            owner_principal,
            total_size,
            offset: 0,
            chunk_dir,
            created_at: now,
            updated_at: now,
            completed: false,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.total_size.saturating_sub(self.offset)
    }

    /// Validates an incoming `Append(client_offset, ...)` call against the
    /// stored offset before any bytes are written.
    pub fn validate_append(&self, client_offset: u64) -> Result<(), IngestError> {
        if self.completed {
            return Err(IngestError::invalid_argument(format!(
                "upload {} is already completed",
                self.id
            )));
        }
        if client_offset != self.offset {
            return Err(IngestError::OffsetMismatch {
                expected: self.offset,
                actual: client_offset,
            });
        }
        Ok(())
    }

    /// Records the actual bytes persisted by an append, which may be less
    /// than requested if the stream was cut short — the stored file length
    /// is always authoritative.
    pub fn advance_offset(&mut self, new_offset: u64, now: DateTime<Utc>) {
        debug_assert!(new_offset >= self.offset && new_offset <= self.total_size);
        self.offset = new_offset;
        self.updated_at = now;
    }

    pub fn validate_finalize(&self) -> Result<(), IngestError> {
        if self.offset != self.total_size {
            return Err(IngestError::Incomplete {
                received: self.offset,
                total: self.total_size,
            });
        }
        Ok(())
    }

    pub fn mark_complete(&mut self, now: DateTime<Utc>) {
        self.completed = true;
        self.updated_at = now;
    }
}
