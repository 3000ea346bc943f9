// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Route Authentication Mode
//!
//! The two delivery contracts a webhook route may use. This is the type
//! the Router boundary checks against to enforce the identity-cutoff
//! invariant: `auth_mode = opaque_only` implies the carried token is
//! absent, never merely empty.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// No user identity may cross this route: no bearer token, and the
    /// payload must not contain the dossier's owner principal.
    OpaqueOnly,
    /// The identity-cutoff token captured at ingestion time is forwarded as
    /// `Authorization: Bearer <token>`.
    JwtPassthru,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpaqueOnly => "opaque_only",
            Self::JwtPassthru => "jwt_passthru",
        }
    }
}

impl Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown auth mode '{0}'")]
pub struct UnknownAuthMode(pub String);

impl FromStr for AuthMode {
    type Err = UnknownAuthMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opaque_only" => Ok(Self::OpaqueOnly),
            "jwt_passthru" => Ok(Self::JwtPassthru),
            other => Err(UnknownAuthMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        assert_eq!("opaque_only".parse::<AuthMode>().unwrap(), AuthMode::OpaqueOnly);
        assert_eq!("jwt_passthru".parse::<AuthMode>().unwrap(), AuthMode::JwtPassthru);
    }

    #[test]
    fn rejects_unknown() {
        assert!("basic".parse::<AuthMode>().is_err());
    }
}
