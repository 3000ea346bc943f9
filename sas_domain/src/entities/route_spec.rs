// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Route Specification
//!
//! A configured delivery target, either attached to a dossier (override) or
//! held globally. `RouteSpec` is the declaration; [`crate::entities::PendingRoute`]
//! is the runtime delivery attempt created from it once a piece turns ready.

use crate::value_objects::{AuthMode, RouteUrl};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSpec {
    pub url: RouteUrl,
    pub auth_mode: AuthMode,
    /// HMAC signing key. Absent means outbound requests carry no
    /// `X-Signature-256` header.
    pub secret: Option<String>,
    pub require_review: bool,
}

impl RouteSpec {
    pub fn new(url: RouteUrl, auth_mode: AuthMode, secret: Option<String>, require_review: bool) -> Self {
        Self {
            url,
            auth_mode,
            secret,
            require_review,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructs_with_given_fields() {
        let spec = RouteSpec::new(
            RouteUrl::parse("https://hooks.example.com/sas").unwrap(),
            AuthMode::OpaqueOnly,
            None,
            false,
        );
        assert_eq!(spec.auth_mode, AuthMode::OpaqueOnly);
        assert!(spec.secret.is_none());
    }
}
