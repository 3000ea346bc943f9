// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Structural Scanner
//!
//! Header/trailer/magic-byte heuristics. All reads are bounded: 8 KiB for
//! header and trailer inspection, 64 KiB per chunk for the full-file
//! entropy sample.

use async_trait::async_trait;
use sas_domain::services::{StructuralScanResult, StructuralScanner};
use sas_domain::IngestError;
use std::path::Path;

use super::super::runtime::streaming_chunker::chunk_file_name;
use sas_domain::ChunkIndex;

const HEADER_READ_BYTES: usize = 8 * 1024;
const TRAILER_READ_BYTES: usize = 8 * 1024;
const ENTROPY_SAMPLE_BYTES: usize = 64 * 1024;
const ZIP_BOMB_SIZE_THRESHOLD: u64 = 1024 * 1024;
const ZIP_BOMB_LOCAL_HEADER_COUNT: usize = 10;

const PDF_MAGIC: &[u8] = b"%PDF";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const ZIP_LOCAL_HEADER: &[u8] = b"PK\x03\x04";
const ZIP_EOCD: &[u8] = b"PK\x05\x06";
const ELF_MAGIC: &[u8] = b"\x7fELF";
const PE_MAGIC: &[u8] = b"MZ";
const OLE2_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xE1, 0xFB, 0xA1, 0xE1];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut counts = [0u64; 256];
    for &b in data {
        counts[b as usize] += 1;
    }
    let len = data.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / len;
            -p * p.log2()
        })
        .sum()
}

fn detect_families(header: &[u8]) -> Vec<&'static str> {
    let mut families = Vec::new();
    if header.starts_with(PDF_MAGIC) {
        families.push("pdf");
    }
    if header.starts_with(ZIP_MAGIC) {
        families.push("zip");
    }
    if header.starts_with(ELF_MAGIC) {
        families.push("elf");
    }
    if header.starts_with(PE_MAGIC) {
        families.push("pe");
    }
    if header.starts_with(JPEG_MAGIC) {
        families.push("jpeg");
    }
    families
}

fn detect_magic(header: &[u8]) -> Option<&'static str> {
    if header.starts_with(PDF_MAGIC) {
        Some("pdf")
    } else if header.starts_with(ZIP_MAGIC) {
        Some("zip")
    } else if header.starts_with(ELF_MAGIC) {
        Some("elf")
    } else if header.starts_with(PE_MAGIC) {
        Some("pe")
    } else if header.starts_with(OLE2_MAGIC) {
        Some("ole2")
    } else if header.starts_with(JPEG_MAGIC) {
        Some("image/jpeg")
    } else if header.starts_with(b"<?xml") {
        Some("xml")
    } else if header.first() == Some(&b'{') || header.first() == Some(&b'[') {
        Some("json")
    } else {
        None
    }
}

fn mime_for_magic(magic: Option<&str>) -> Option<String> {
    magic.map(|m| match m {
        "pdf" => "application/pdf".to_string(),
        "zip" => "application/zip".to_string(),
        "elf" => "application/x-executable".to_string(),
        "pe" => "application/x-msdownload".to_string(),
        "ole2" => "application/x-ole-storage".to_string(),
        "image/jpeg" => "image/jpeg".to_string(),
        "xml" => "application/xml".to_string(),
        "json" => "application/json".to_string(),
        other => other.to_string(),
    })
}

fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    if needle.is_empty() || haystack.len() < needle.len() {
        return 0;
    }
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

pub struct HeuristicStructuralScanner;

impl HeuristicStructuralScanner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeuristicStructuralScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StructuralScanner for HeuristicStructuralScanner {
    async fn scan(
        &self,
        piece_dir: &Path,
        chunk_count: u32,
        filename_hint: Option<&str>,
    ) -> Result<StructuralScanResult, IngestError> {
        let mut result = StructuralScanResult::default();
        if chunk_count == 0 {
            return Ok(result);
        }

        let first_chunk_path = piece_dir.join(chunk_file_name(ChunkIndex::ZERO));
        let first_chunk = tokio::fs::read(&first_chunk_path).await?;
        let header = &first_chunk[..first_chunk.len().min(HEADER_READ_BYTES)];

        let magic = detect_magic(header);
        result.magic = magic.map(str::to_string);
        result.mime = mime_for_magic(magic);
        result.header_entropy = shannon_entropy(header);

        // Full-file entropy: sample up to 64 KiB per chunk across all chunks.
        let mut sample = Vec::new();
        for i in 0..chunk_count {
            let path = piece_dir.join(chunk_file_name(ChunkIndex::new(i)));
            let bytes = tokio::fs::read(&path).await?;
            sample.extend_from_slice(&bytes[..bytes.len().min(ENTROPY_SAMPLE_BYTES)]);
        }
        result.full_file_entropy = shannon_entropy(&sample);

        let last_index = ChunkIndex::new(chunk_count - 1);
        let last_chunk_path = piece_dir.join(chunk_file_name(last_index));
        let last_chunk = tokio::fs::read(&last_chunk_path).await?;
        let trailer_start = last_chunk.len().saturating_sub(TRAILER_READ_BYTES);
        let trailer = &last_chunk[trailer_start..];

        if magic == Some("pdf") {
            let has_eof = trailer.windows(5).any(|w| w == b"%%EOF");
            let has_startxref = count_occurrences(trailer, b"startxref") > 0;
            if !has_eof || !has_startxref {
                result.add_warning("pdf_trailer_incomplete");
            }
        }
        if magic == Some("zip") && !trailer.windows(ZIP_EOCD.len()).any(|w| w == ZIP_EOCD) {
            result.add_warning("zip_eocd_missing");
        }

        let total_size_bytes: u64 = {
            let mut total = 0u64;
            for i in 0..chunk_count {
                let path = piece_dir.join(chunk_file_name(ChunkIndex::new(i)));
                total += tokio::fs::metadata(&path).await?.len();
            }
            total
        };

        let local_header_count = count_occurrences(header, ZIP_LOCAL_HEADER);
        if local_header_count > ZIP_BOMB_LOCAL_HEADER_COUNT && total_size_bytes < ZIP_BOMB_SIZE_THRESHOLD {
            result.add_warning("zip_bomb_suspect");
            result.blocked = true;
        }

        let families = detect_families(header);
        if families.len() >= 2 {
            result.add_warning("polyglot_suspect");
            result.blocked = true;
        }

        let is_macro_extension = filename_hint
            .map(|name| {
                let lower = name.to_ascii_lowercase();
                lower.ends_with(".xlsm") || lower.ends_with(".docm") || lower.ends_with(".pptm")
            })
            .unwrap_or(false);
        let has_vba = magic == Some("ole2")
            && (count_occurrences(&first_chunk, b"_VBA_PROJECT") > 0
                || count_occurrences(&first_chunk, b"VBAProject") > 0);
        if is_macro_extension || has_vba {
            result.add_warning("macro_suspect");
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shannon_entropy_of_uniform_bytes_is_near_max() {
        let data: Vec<u8> = (0..=255u8).collect();
        let entropy = shannon_entropy(&data);
        assert!(entropy > 7.9 && entropy <= 8.0);
    }

    #[test]
    fn shannon_entropy_of_constant_bytes_is_zero() {
        assert_eq!(shannon_entropy(&[7u8; 100]), 0.0);
    }

    #[test]
    fn detects_pdf_and_zip_magic() {
        assert_eq!(detect_magic(b"%PDF-1.4"), Some("pdf"));
        assert_eq!(detect_magic(b"PK\x03\x04rest"), Some("zip"));
        assert_eq!(detect_magic(b"\x7fELFrest"), Some("elf"));
    }

    #[test]
    fn detects_multiple_families_for_polyglot() {
        let mut header = Vec::from(&b"%PDF-1.4"[..]);
        header.extend_from_slice(b"\x7fELFpadding");
        assert_eq!(detect_families(&header).len(), 2);
    }
}
