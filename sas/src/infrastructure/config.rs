// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Configuration
//!
//! `SasConfig` is loaded from a TOML file (falling back to defaults when
//! absent) with every field overridable by an environment variable
//! prefixed `SAS_`, using the `config` crate's layered sources.

use config::{Config, Environment, File};
use sas_domain::IngestError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntivirusSettings {
    pub enabled: bool,
    pub address: String,
}

impl Default for AntivirusSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            address: "127.0.0.1:3310".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookSettings {
    pub global_routes: Vec<GlobalRouteSettings>,
    pub delivery_concurrency: usize,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            global_routes: Vec::new(),
            delivery_concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalRouteSettings {
    pub url: String,
    pub auth_mode: String,
    pub secret: Option<String>,
    pub require_review: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterSettings {
    pub poll_interval_secs: u64,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self { poll_interval_secs: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSettings {
    pub enabled: bool,
    pub bind_address: String,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Top-level process configuration, recognized per the external-interfaces
/// contract: `max_file_bytes`, `chunk_size_bytes`, `antivirus`, `webhooks`,
/// `owner_principal_source`, `chunks_root`, `database_url`, `router`,
/// `logging`, `metrics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SasConfig {
    pub max_file_bytes: u64,
    pub chunk_size_bytes: usize,
    pub antivirus: AntivirusSettings,
    pub webhooks: WebhookSettings,
    pub owner_principal_source: String,
    pub chunks_root: String,
    pub database_url: String,
    pub router: RouterSettings,
    pub logging: LoggingSettings,
    pub metrics: MetricsSettings,
}

impl Default for SasConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 500 * 1024 * 1024,
            chunk_size_bytes: 4 * 1024 * 1024,
            antivirus: AntivirusSettings::default(),
            webhooks: WebhookSettings::default(),
            owner_principal_source: "header:x-principal".to_string(),
            chunks_root: "./data/chunks".to_string(),
            database_url: "sqlite://./data/sas.db".to_string(),
            router: RouterSettings::default(),
            logging: LoggingSettings::default(),
            metrics: MetricsSettings::default(),
        }
    }
}

impl SasConfig {
    /// Loads configuration from `path`, layering in `SAS_`-prefixed
    /// environment variables, falling back entirely to defaults if the
    /// file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let mut builder = Config::builder();
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(Environment::with_prefix("SAS").separator("__"));

        let config = builder
            .build()
            .map_err(|e| IngestError::invalid_argument(format!("failed to load config {path:?}: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| IngestError::invalid_argument(format!("failed to parse config {path:?}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = SasConfig::default();
        assert_eq!(config.max_file_bytes, 500 * 1024 * 1024);
        assert!(!config.antivirus.enabled);
    }

    #[test]
    fn load_falls_back_to_defaults_when_file_missing() {
        let config = SasConfig::load("/nonexistent/sas.toml").unwrap();
        assert_eq!(config.chunk_size_bytes, 4 * 1024 * 1024);
    }
}
