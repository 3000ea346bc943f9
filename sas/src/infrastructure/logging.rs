// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Logging
//!
//! `tracing`-based structured logging. Format is either `pretty` (human
//! readable, for local runs) or `json` (for aggregation in production),
//! selected by `LoggingSettings::format`. The filter defaults to
//! `LoggingSettings::level` but is overridable by `RUST_LOG`.

use super::config::LoggingSettings;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let subscriber = fmt().with_env_filter(filter).with_target(true);

    let result = if settings.format == "json" {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    if let Err(e) = result {
        eprintln!("logging already initialized: {e}");
    }
}
