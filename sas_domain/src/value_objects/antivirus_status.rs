// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Antivirus Status
//!
//! `antivirus_status` is one of the few fields in the data model that is
//! NOT a closed set in the literal sense — a virus name is free text
//! supplied by the external scanner. It is still a tagged variant rather
//! than a bare string field, so callers can't mistake an arbitrary string
//! for `ok`/`pending`/`skipped`/`error` by accident.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AntivirusStatus {
    Pending,
    Ok,
    Skipped,
    /// A named threat, as reported verbatim by the scanner's response line.
    Infected(String),
    /// Transport/connect failure; the piece degrades gracefully and is
    /// *not* blocked on this status alone.
    Error(String),
}

impl AntivirusStatus {
    /// Whether this status alone permits a piece to reach `ready`.
    ///
    /// Per the data model invariant: `state = ready` implies
    /// `antivirus_status in {ok, skipped}`.
    pub fn permits_ready(&self) -> bool {
        matches!(self, Self::Ok | Self::Skipped)
    }

    pub fn blocks_piece(&self) -> bool {
        matches!(self, Self::Infected(_))
    }

    fn to_wire(&self) -> String {
        match self {
            Self::Pending => "pending".to_string(),
            Self::Ok => "ok".to_string(),
            Self::Skipped => "skipped".to_string(),
            Self::Infected(name) => name.clone(),
            Self::Error(msg) => format!("error: {msg}"),
        }
    }

    fn from_wire(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "ok" => Self::Ok,
            "skipped" => Self::Skipped,
            other => match other.strip_prefix("error: ") {
                Some(msg) => Self::Error(msg.to_string()),
                None => Self::Infected(other.to_string()),
            },
        }
    }
}

impl Display for AntivirusStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

impl TryFrom<String> for AntivirusStatus {
    type Error = std::convert::Infallible;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self::from_wire(&value))
    }
}

impl From<AntivirusStatus> for String {
    fn from(status: AntivirusStatus) -> Self {
        status.to_wire()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_and_skipped_permit_ready() {
        assert!(AntivirusStatus::Ok.permits_ready());
        assert!(AntivirusStatus::Skipped.permits_ready());
        assert!(!AntivirusStatus::Pending.permits_ready());
        assert!(!AntivirusStatus::Infected("Eicar-Test".into()).permits_ready());
        assert!(!AntivirusStatus::Error("connect refused".into()).permits_ready());
    }

    #[test]
    fn only_infected_blocks() {
        assert!(AntivirusStatus::Infected("Eicar-Test".into()).blocks_piece());
        assert!(!AntivirusStatus::Error("timeout".into()).blocks_piece());
    }

    #[test]
    fn wire_round_trip() {
        for status in [
            AntivirusStatus::Pending,
            AntivirusStatus::Ok,
            AntivirusStatus::Skipped,
            AntivirusStatus::Infected("Eicar-Test-Signature".into()),
            AntivirusStatus::Error("connect timeout".into()),
        ] {
            let wire = status.to_string();
            let parsed = AntivirusStatus::from_wire(&wire);
            assert_eq!(parsed, status);
        }
    }
}
