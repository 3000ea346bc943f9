// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Antivirus Gateway
//!
//! ClamAV-style `zINSTREAM` client: one TCP connection per scan, framed as
//! a sequence of big-endian `uint32` length-prefixed chunks terminated by
//! a zero-length chunk, then a single bounded response line.

use async_trait::async_trait;
use sas_domain::services::AntivirusGateway;
use sas_domain::AntivirusStatus;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::warn;

use super::super::runtime::streaming_chunker::chunk_file_name;
use sas_domain::ChunkIndex;

const INSTREAM_COMMAND: &[u8] = b"zINSTREAM\0";
const WIRE_CHUNK_MAX_BYTES: usize = 8 * 1024;
const RESPONSE_MAX_BYTES: usize = 4 * 1024;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const OVERALL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
pub struct AntivirusConfig {
    pub enabled: bool,
    pub address: String,
}

pub struct ClamAvGateway {
    config: AntivirusConfig,
}

impl ClamAvGateway {
    pub fn new(config: AntivirusConfig) -> Self {
        Self { config }
    }

    async fn run_scan(&self, piece_dir: &Path, chunk_count: u32) -> Result<AntivirusStatus, std::io::Error> {
        let connect = timeout(CONNECT_TIMEOUT, TcpStream::connect(&self.config.address));
        let mut stream = timeout(OVERALL_TIMEOUT, connect)
            .await
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "connect deadline exceeded"))?
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "connect deadline exceeded"))??;

        let body = async {
            stream.write_all(INSTREAM_COMMAND).await?;

            for i in 0..chunk_count {
                let path = piece_dir.join(chunk_file_name(ChunkIndex::new(i)));
                let bytes = tokio::fs::read(&path).await?;
                for window in bytes.chunks(WIRE_CHUNK_MAX_BYTES) {
                    let len = (window.len() as u32).to_be_bytes();
                    stream.write_all(&len).await?;
                    stream.write_all(window).await?;
                }
            }
            stream.write_all(&0u32.to_be_bytes()).await?;
            stream.flush().await?;

            let mut response = vec![0u8; RESPONSE_MAX_BYTES];
            let read = stream.read(&mut response).await?;
            let line = String::from_utf8_lossy(&response[..read]).trim().to_string();

            Ok::<AntivirusStatus, std::io::Error>(if line.contains("stream: OK") {
                AntivirusStatus::Ok
            } else {
                AntivirusStatus::Infected(line)
            })
        };

        timeout(OVERALL_TIMEOUT, body)
            .await
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "scan deadline exceeded"))?
    }
}

#[async_trait]
impl AntivirusGateway for ClamAvGateway {
    async fn scan(&self, piece_dir: &Path, chunk_count: u32) -> AntivirusStatus {
        if !self.config.enabled {
            return AntivirusStatus::Skipped;
        }

        match self.run_scan(piece_dir, chunk_count).await {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "antivirus scan degraded, piece not blocked on this status alone");
                AntivirusStatus::Error(e.to_string())
            }
        }
    }
}
