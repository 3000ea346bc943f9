// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Append Upload
//!
//! Thin pass-through to [`ResumableReceiver::append`]; kept as its own use
//! case so the transport layer (HTTP handler, CLI, whatever) depends on
//! `application`, never on `infrastructure::runtime` directly.

use crate::infrastructure::runtime::ResumableReceiver;
use sas_domain::{IngestError, UploadId};
use std::sync::Arc;

pub struct AppendUpload {
    receiver: Arc<ResumableReceiver>,
}

impl AppendUpload {
    pub fn new(receiver: Arc<ResumableReceiver>) -> Self {
        Self { receiver }
    }

    pub async fn execute(&self, upload_id: &UploadId, client_offset: u64, bytes: &[u8]) -> Result<u64, IngestError> {
        self.receiver.append(upload_id, client_offset, bytes).await
    }

    pub async fn head(&self, upload_id: &UploadId) -> Result<(u64, u64, bool), IngestError> {
        self.receiver.head(upload_id).await
    }
}
