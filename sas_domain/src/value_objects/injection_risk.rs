// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Injection Risk Level
//!
//! Aggregated risk level produced by the injection scanner across a piece's
//! chunks: worst-across wins. Ordered so that `max()` over the per-chunk
//! risks yields the piece-level risk with zero extra logic.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionRisk {
    None,
    Low,
    Medium,
    High,
}

impl InjectionRisk {
    /// Maps a per-chunk match count onto a risk level, per the aggregation
    /// rule: >= 3 matches is high, >= 1 is medium, 0 is none. `Low` is
    /// reserved for future finer-grained scoring and is never produced by
    /// the current match-count rule, but remains part of the closed set
    /// the spec defines.
    pub fn from_match_count(matches: usize) -> Self {
        match matches {
            0 => Self::None,
            1..=2 => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, Self::High)
    }
}

impl Display for InjectionRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown injection risk '{0}'")]
pub struct UnknownInjectionRisk(pub String);

impl FromStr for InjectionRisk {
    type Err = UnknownInjectionRisk;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(UnknownInjectionRisk(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregation_thresholds() {
        assert_eq!(InjectionRisk::from_match_count(0), InjectionRisk::None);
        assert_eq!(InjectionRisk::from_match_count(1), InjectionRisk::Medium);
        assert_eq!(InjectionRisk::from_match_count(2), InjectionRisk::Medium);
        assert_eq!(InjectionRisk::from_match_count(3), InjectionRisk::High);
        assert_eq!(InjectionRisk::from_match_count(100), InjectionRisk::High);
    }

    #[test]
    fn worst_across_is_max() {
        let risks = [InjectionRisk::None, InjectionRisk::Medium, InjectionRisk::Low];
        assert_eq!(risks.into_iter().max().unwrap(), InjectionRisk::Medium);
    }

    #[test]
    fn round_trips_through_str() {
        for risk in [
            InjectionRisk::None,
            InjectionRisk::Low,
            InjectionRisk::Medium,
            InjectionRisk::High,
        ] {
            assert_eq!(risk.as_str().parse::<InjectionRisk>().unwrap(), risk);
        }
    }
}
