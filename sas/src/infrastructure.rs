// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Layer
//!
//! Concrete implementations of the domain's ports: SQLite repositories,
//! filesystem chunk storage, the antivirus/injection/structural scanners,
//! the HMAC signer and webhook client, and the process-level concerns
//! (config, logging, metrics) that sit outside the domain on purpose.
//!
//! ## Module Structure
//!
//! ```text
//! infrastructure/
//! ├── adapters/     # scanners, antivirus client, signer, webhook client
//! ├── repositories/ # SQLite implementations of the domain repository ports
//! ├── runtime/      # streaming chunker, chunk store, resumable receiver,
//! │                 # router dispatcher, crash recovery
//! ├── config.rs     # SasConfig
//! ├── logging.rs     # tracing-subscriber setup
//! └── metrics.rs     # prometheus registry
//! ```

pub mod adapters;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod repositories;
pub mod runtime;
