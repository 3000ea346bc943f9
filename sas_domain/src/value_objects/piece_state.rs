// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Piece State
//!
//! Closed state machine for a piece's lifecycle: `received -> (scanned) ->
//! {ready | flagged | blocked}`, with `deduplicated` as a transient
//! non-persisted signal. This replaces the opaque string-typed state the
//! distilled design called out as needing re-architecture: the metadata
//! store rejects any row whose `state` column doesn't parse into one of
//! these variants, rather than silently defaulting it.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceState {
    Received,
    Scanned,
    Ready,
    Flagged,
    Blocked,
    /// Transient: never persisted as a row's state. Returned directly to
    /// the caller of Finalize when `(sha256, dossier)` already exists.
    Deduplicated,
}

impl PieceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Scanned => "scanned",
            Self::Ready => "ready",
            Self::Flagged => "flagged",
            Self::Blocked => "blocked",
            Self::Deduplicated => "deduplicated",
        }
    }

    /// Whether the state machine allows transitioning into `next` from
    /// `self`. Used by the orchestrator to fail loudly on a malformed
    /// transition rather than writing an inconsistent row.
    pub fn can_transition_to(&self, next: PieceState) -> bool {
        use PieceState::*;
        matches!(
            (self, next),
            (Received, Scanned)
                | (Received, Ready)
                | (Received, Flagged)
                | (Received, Blocked)
                | (Scanned, Ready)
                | (Scanned, Flagged)
                | (Scanned, Blocked)
                | (Flagged, Ready)
                | (Flagged, Blocked)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Blocked)
    }
}

impl Display for PieceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown piece state '{0}'")]
pub struct UnknownPieceState(pub String);

impl FromStr for PieceState {
    type Err = UnknownPieceState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "received" => Ok(Self::Received),
            "scanned" => Ok(Self::Scanned),
            "ready" => Ok(Self::Ready),
            "flagged" => Ok(Self::Flagged),
            "blocked" => Ok(Self::Blocked),
            "deduplicated" => Ok(Self::Deduplicated),
            other => Err(UnknownPieceState(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for state in [
            PieceState::Received,
            PieceState::Scanned,
            PieceState::Ready,
            PieceState::Flagged,
            PieceState::Blocked,
            PieceState::Deduplicated,
        ] {
            assert_eq!(state.as_str().parse::<PieceState>().unwrap(), state);
        }
    }

    #[test]
    fn rejects_unknown_state_strings() {
        assert!("archived".parse::<PieceState>().is_err());
    }

    #[test]
    fn legal_transitions() {
        assert!(PieceState::Received.can_transition_to(PieceState::Scanned));
        assert!(PieceState::Scanned.can_transition_to(PieceState::Ready));
        assert!(PieceState::Flagged.can_transition_to(PieceState::Ready));
        assert!(PieceState::Flagged.can_transition_to(PieceState::Blocked));
    }

    #[test]
    fn blocked_is_terminal() {
        assert!(PieceState::Blocked.is_terminal());
        assert!(!PieceState::Blocked.can_transition_to(PieceState::Ready));
        assert!(!PieceState::Blocked.can_transition_to(PieceState::Flagged));
    }

    #[test]
    fn illegal_transitions_rejected() {
        assert!(!PieceState::Ready.can_transition_to(PieceState::Received));
        assert!(!PieceState::Blocked.can_transition_to(PieceState::Scanned));
    }
}
