// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # HMAC Signer
//!
//! `X-Signature-256: sha256=<hex>` over the raw webhook body, keyed by a
//! per-route secret.

use hmac::{Hmac, Mac};
use sas_domain::services::Signer;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub struct HmacSha256Signer;

impl HmacSha256Signer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HmacSha256Signer {
    fn default() -> Self {
        Self::new()
    }
}

impl Signer for HmacSha256Signer {
    fn sign(&self, secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
        mac.update(body);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }
}
