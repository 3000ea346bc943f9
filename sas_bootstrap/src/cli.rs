// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface
//!
//! Bootstrap-layer CLI handling with security-first design: parse with
//! `clap`, then validate every path-shaped argument before it's trusted
//! anywhere else in the process.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. Cli::parse()                    │  Parse CLI with clap
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. validate_cli()                  │  Security validation
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedCli                    │  Safe, validated config
//! └─────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Sas ingestion worker: loads config, runs crash recovery, then serves
/// resumable uploads and the webhook router dispatch loop until a shutdown
/// signal arrives.
#[derive(Debug, Parser)]
#[command(name = "sas", version, about)]
pub struct Cli {
    /// Path to the TOML config file. Falls back to `SAS_CONFIG_PATH`, then
    /// `./sas.toml`, then built-in defaults if nothing is found.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose (debug-level) logging, overriding the config file's
    /// logging.level.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid argument {arg}: {reason}")]
    InvalidValue { arg: String, reason: String },
}

/// Validated CLI configuration: all paths have passed a basic traversal
/// check before anything downstream trusts them.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

fn reject_path_traversal(path: &PathBuf) -> Result<(), ParseError> {
    let as_str = path.to_string_lossy();
    if as_str.contains("..") {
        return Err(ParseError::InvalidValue {
            arg: "config".to_string(),
            reason: "path traversal (\"..\") is not allowed".to_string(),
        });
    }
    Ok(())
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    if let Some(ref path) = cli.config {
        reject_path_traversal(path)?;
    }

    Ok(ValidatedCli {
        config: cli.config,
        verbose: cli.verbose,
    })
}

/// Parses `std::env::args` and validates the result. Clap handles
/// `--help`/`--version` and exits the process on its own.
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = Cli::parse();
    validate_cli(cli)
}
