// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Mapping
//!
//! Maps domain and bootstrap errors onto the BSD `sysexits.h` convention so
//! shell callers and process supervisors get a stable, meaningful exit
//! status rather than a bare `1`.

use sas_domain::IngestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Successful termination.
    Ok = 0,
    /// Catch-all for unclassified errors.
    General = 1,
    /// Command line usage error (`EX_USAGE`).
    Usage = 64,
    /// Input data was incorrect in some way (`EX_DATAERR`).
    DataError = 65,
    /// A service this program uses is not available (`EX_UNAVAILABLE`).
    Unavailable = 69,
    /// Internal software error (`EX_SOFTWARE`).
    Software = 70,
    /// An error occurred while doing I/O on some file (`EX_IOERR`).
    IoError = 74,
    /// Configuration error (`EX_CONFIG`).
    Config = 78,
}

impl ExitCode {
    pub fn as_process_exit_code(self) -> std::process::ExitCode {
        std::process::ExitCode::from(self as u8)
    }
}

/// Maps a domain error to the exit code a process supervisor should see.
pub fn map_error_to_exit_code(error: &IngestError) -> ExitCode {
    match error {
        IngestError::InvalidArgument(_) => ExitCode::Usage,
        IngestError::OwnershipConflict { .. } => ExitCode::DataError,
        IngestError::NotFound(_) => ExitCode::DataError,
        IngestError::SizeExceeded(_) => ExitCode::DataError,
        IngestError::StorageIo(_) => ExitCode::IoError,
        IngestError::AntivirusUnavailable(_) => ExitCode::Unavailable,
        IngestError::ScanBlocked(_) => ExitCode::DataError,
        IngestError::DeliveryFailure(_) => ExitCode::Unavailable,
        IngestError::Poison(_) => ExitCode::Software,
        IngestError::Database(_) => ExitCode::IoError,
        IngestError::OffsetMismatch { .. } => ExitCode::DataError,
        IngestError::Incomplete { .. } => ExitCode::DataError,
        IngestError::Internal(_) => ExitCode::Software,
    }
}

/// Converts a top-level `Result` into the process exit code `main` returns.
pub fn result_to_exit_code<T>(result: Result<T, IngestError>) -> std::process::ExitCode {
    match result {
        Ok(_) => ExitCode::Ok.as_process_exit_code(),
        Err(e) => {
            tracing::error!(error = %e, "process exiting with error");
            map_error_to_exit_code(&e).as_process_exit_code()
        }
    }
}
