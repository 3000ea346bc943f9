// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Runtime infrastructure: the pieces that move bytes and route deliveries
//! through the pipeline rather than just persisting rows.

pub mod chunk_store;
pub mod recovery;
pub mod resumable_receiver;
pub mod router_dispatcher;
pub mod streaming_chunker;

pub use chunk_store::FsChunkStore;
pub use recovery::RecoveryService;
pub use resumable_receiver::{FinalizeOutcome, ResumableReceiver};
pub use router_dispatcher::RouterDispatcher;
pub use streaming_chunker::{chunk_file_name, FileStreamingChunker};
