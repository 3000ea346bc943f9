// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Upload Repository Interface
//!
//! CRUD for resumable-upload session rows, keyed by `upload_id`.

use crate::entities::ResumableUpload;
use crate::error::IngestError;
use crate::value_objects::UploadId;
use async_trait::async_trait;

#[async_trait]
pub trait UploadRepository: Send + Sync {
    async fn create(&self, upload: &ResumableUpload) -> Result<(), IngestError>;

    async fn get(&self, id: &UploadId) -> Result<Option<ResumableUpload>, IngestError>;

    /// Accepts the new offset unconditionally; callers validate the
    /// monotonic-advance invariant before calling this.
    async fn advance_offset(&self, id: &UploadId, new_offset: u64) -> Result<(), IngestError>;

    async fn mark_complete(&self, id: &UploadId) -> Result<(), IngestError>;

    async fn delete(&self, id: &UploadId) -> Result<(), IngestError>;
}
