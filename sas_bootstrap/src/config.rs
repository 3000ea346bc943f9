// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Configuration Resolution
//!
//! Bootstrap sits below the application layers and therefore cannot depend
//! on the `sas` crate (`sas` depends on `sas-bootstrap`, not the reverse).
//! This module only resolves *where* the config file lives; parsing it
//! into `sas::infrastructure::config::SasConfig` is the caller's job once
//! control passes into the application.

use std::env;
use std::path::PathBuf;

const CONFIG_PATH_ENV_VAR: &str = "SAS_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "./sas.toml";

/// Resolves the config file path: explicit CLI flag, then `SAS_CONFIG_PATH`,
/// then the default relative path. Existence is not checked here — an
/// absent default path is a normal "use built-in defaults" case, handled by
/// `SasConfig::load`.
pub fn resolve_config_path(cli_flag: Option<PathBuf>) -> PathBuf {
    cli_flag
        .or_else(|| env::var_os(CONFIG_PATH_ENV_VAR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flag_takes_precedence_over_everything() {
        let resolved = resolve_config_path(Some(PathBuf::from("/etc/sas/custom.toml")));
        assert_eq!(resolved, PathBuf::from("/etc/sas/custom.toml"));
    }

    #[test]
    fn falls_back_to_default_when_nothing_set() {
        env::remove_var(CONFIG_PATH_ENV_VAR);
        assert_eq!(resolve_config_path(None), PathBuf::from(DEFAULT_CONFIG_PATH));
    }
}
