// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Route URL
//!
//! The delivery target of a webhook route. Validation here is deliberately
//! shallow: it enforces `http://` or `https://` scheme and a non-empty
//! host, and leaves everything else (reachability, TLS validity) to the
//! delivery attempt itself.

use crate::error::IngestError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouteUrl(String);

impl RouteUrl {
    pub fn parse(candidate: impl Into<String>) -> Result<Self, IngestError> {
        let candidate = candidate.into();
        let rest = candidate
            .strip_prefix("https://")
            .or_else(|| candidate.strip_prefix("http://"))
            .ok_or_else(|| {
                IngestError::invalid_argument(format!(
                    "route url '{candidate}' must start with http:// or https://"
                ))
            })?;
        if rest.trim().is_empty() {
            return Err(IngestError::invalid_argument(format!(
                "route url '{candidate}' has no host"
            )));
        }
        Ok(Self(candidate))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RouteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RouteUrl {
    type Error = IngestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<RouteUrl> for String {
    fn from(url: RouteUrl) -> Self {
        url.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https() {
        assert!(RouteUrl::parse("https://hooks.example.com/sas").is_ok());
    }

    #[test]
    fn rejects_missing_scheme() {
        assert!(RouteUrl::parse("hooks.example.com/sas").is_err());
    }

    #[test]
    fn rejects_empty_host() {
        assert!(RouteUrl::parse("https://").is_err());
    }
}
