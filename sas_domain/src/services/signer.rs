// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Signer Port
//!
//! `Signer.sign(body) -> header_value`, the HMAC capability interface
//! named in the design notes. Synchronous and infallible: HMAC-SHA-256
//! over an in-memory body never does I/O.

pub trait Signer: Send + Sync {
    /// Returns the value of the `X-Signature-256` header: `sha256=<hex>`.
    fn sign(&self, secret: &str, body: &[u8]) -> String;
}
