// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Signal Handling
//!
//! Waits on SIGTERM, SIGINT, and SIGHUP (Unix) so `main` can drive
//! [`crate::shutdown::ShutdownCoordinator`] from a single `tokio::select!`
//! without scattering signal-specific code through the app.

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

/// The signal that triggered shutdown, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Term,
    Interrupt,
    Hangup,
}

impl std::fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Term => "SIGTERM",
            Self::Interrupt => "SIGINT",
            Self::Hangup => "SIGHUP",
        };
        write!(f, "{name}")
    }
}

/// Waits for the first of SIGTERM, SIGINT, or SIGHUP.
///
/// On non-Unix targets this only observes Ctrl-C (SIGINT's closest
/// cross-platform analogue) since the other two have no equivalent.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> ShutdownSignal {
    let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut hup = signal(SignalKind::hangup()).expect("failed to install SIGHUP handler");

    tokio::select! {
        _ = term.recv() => ShutdownSignal::Term,
        _ = hup.recv() => ShutdownSignal::Hangup,
        _ = tokio::signal::ctrl_c() => ShutdownSignal::Interrupt,
    }
}

#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> ShutdownSignal {
    let _ = tokio::signal::ctrl_c().await;
    ShutdownSignal::Interrupt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_posix_signal_names() {
        assert_eq!(ShutdownSignal::Term.to_string(), "SIGTERM");
        assert_eq!(ShutdownSignal::Interrupt.to_string(), "SIGINT");
        assert_eq!(ShutdownSignal::Hangup.to_string(), "SIGHUP");
    }
}
