// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Sas: Multi-Tenant Resumable File-Ingestion Pipeline
//!
//! Content-addressed chunked storage, a layered security pipeline
//! (structural scan, antivirus, prompt-injection scan), a relational
//! metadata store with strict piece/route state machines, and a webhook
//! router with retry/backoff and HMAC signing.
//!
//! ## Layering
//!
//! ```text
//! sas::application      use cases + orchestrator, depends only on sas_domain ports
//! sas::infrastructure   SQLite repositories, filesystem chunk store, scanners,
//!                       the webhook client, and process-level config/logging/metrics
//! sas_domain            entities, value objects, repository and service traits
//! sas_bootstrap         CLI parsing, signal handling, exit codes — sits below
//!                       everything and knows nothing about either layer's types
//!                       except sas_domain::IngestError
//! ```

pub mod application;
pub mod infrastructure;
