// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Metrics
//!
//! A process-wide `prometheus` registry with the counters/histograms the
//! orchestrator and router touch on the ingestion hot path. Metrics are
//! an ambient concern carried regardless of feature scope; the registry
//! is exposed for scraping by whatever HTTP frontend embeds this crate.

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

pub struct SasMetrics {
    pub registry: Registry,
    pub pieces_ingested_total: IntCounter,
    pub pieces_blocked_total: IntCounter,
    pub pieces_flagged_total: IntCounter,
    pub webhook_deliveries_total: IntCounterVec,
    pub structural_scan_duration_seconds: Histogram,
    pub antivirus_scan_duration_seconds: Histogram,
}

impl SasMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let pieces_ingested_total =
            IntCounter::with_opts(Opts::new("sas_pieces_ingested_total", "Pieces that reached a terminal state")).unwrap();
        let pieces_blocked_total =
            IntCounter::with_opts(Opts::new("sas_pieces_blocked_total", "Pieces blocked by a structural or antivirus finding")).unwrap();
        let pieces_flagged_total =
            IntCounter::with_opts(Opts::new("sas_pieces_flagged_total", "Pieces flagged for review by the injection scanner")).unwrap();
        let webhook_deliveries_total = IntCounterVec::new(
            Opts::new("sas_webhook_deliveries_total", "Webhook delivery attempts by outcome"),
            &["outcome"],
        )
        .unwrap();
        let structural_scan_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "sas_structural_scan_duration_seconds",
            "Structural scan wall-clock duration",
        ))
        .unwrap();
        let antivirus_scan_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "sas_antivirus_scan_duration_seconds",
            "Antivirus scan wall-clock duration",
        ))
        .unwrap();

        registry.register(Box::new(pieces_ingested_total.clone())).unwrap();
        registry.register(Box::new(pieces_blocked_total.clone())).unwrap();
        registry.register(Box::new(pieces_flagged_total.clone())).unwrap();
        registry.register(Box::new(webhook_deliveries_total.clone())).unwrap();
        registry.register(Box::new(structural_scan_duration_seconds.clone())).unwrap();
        registry.register(Box::new(antivirus_scan_duration_seconds.clone())).unwrap();

        Self {
            registry,
            pieces_ingested_total,
            pieces_blocked_total,
            pieces_flagged_total,
            webhook_deliveries_total,
            structural_scan_duration_seconds,
            antivirus_scan_duration_seconds,
        }
    }
}

impl Default for SasMetrics {
    fn default() -> Self {
        Self::new()
    }
}

pub static METRICS: Lazy<SasMetrics> = Lazy::new(SasMetrics::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_exposes_registered_families() {
        let metrics = SasMetrics::new();
        let families = metrics.registry.gather();
        assert!(families.iter().any(|f| f.get_name() == "sas_pieces_ingested_total"));
    }
}
