// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! A single closed error enum for the ingestion pipeline, covering every
//! error kind named in the error-handling design: invalid arguments,
//! ownership conflicts, not-found, size limits, storage I/O, antivirus
//! unavailability (a degrade signal, not a block), hard scan blocks,
//! delivery failures and poisoned routes.
//!
//! `dedup_conflict` is deliberately absent here: a duplicate upload is not
//! an error, it is a successful result with `deduplicated = true`.

use thiserror::Error;

/// Errors that can occur anywhere in the ingestion pipeline's domain logic.
///
/// Infrastructure adapters convert their own error types (`sqlx::Error`,
/// `std::io::Error`, transport errors) into one of these variants at the
/// boundary; nothing outside `sas_domain` should be visible past that point.
#[derive(Error, Debug, Clone)]
pub enum IngestError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("ownership conflict: dossier {dossier_id} is owned by a different principal")]
    OwnershipConflict { dossier_id: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("size exceeded: {0}")]
    SizeExceeded(String),

    #[error("storage I/O error: {0}")]
    StorageIo(String),

    #[error("antivirus unavailable: {0}")]
    AntivirusUnavailable(String),

    #[error("scan blocked: {0}")]
    ScanBlocked(String),

    #[error("delivery failure: {0}")]
    DeliveryFailure(String),

    #[error("route poisoned after exhausting retry budget: {0}")]
    Poison(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("offset mismatch: expected {expected}, got {actual}")]
    OffsetMismatch { expected: u64, actual: u64 },

    #[error("upload incomplete: {received} of {total} bytes received")]
    Incomplete { received: u64, total: u64 },

    #[error("internal error: {0}")]
    Internal(String),
}

impl IngestError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn storage_io(msg: impl Into<String>) -> Self {
        Self::StorageIo(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the failure indicates a transient condition worth retrying.
    ///
    /// Used by the router dispatcher and the busy-retry transaction helper
    /// to decide whether to back off and try again versus surfacing the
    /// error immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StorageIo(_) | Self::Database(_) | Self::DeliveryFailure(_) | Self::AntivirusUnavailable(_)
        )
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageIo(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(IngestError::StorageIo("disk full".into()).is_retryable());
        assert!(!IngestError::InvalidArgument("bad id".into()).is_retryable());
        assert!(!IngestError::Poison("exhausted".into()).is_retryable());
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: IngestError = io_err.into();
        assert!(matches!(err, IngestError::StorageIo(_)));
    }
}
