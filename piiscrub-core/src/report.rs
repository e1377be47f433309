// piiscrub-core/src/report.rs
//! Structured detection reports and PII-safe logging helpers.
//!
//! A report never carries the detected values themselves, only their kind,
//! location, tier and a canonical hash that lets downstream systems group
//! repeated values without seeing them.

use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::span::{ConfidenceTier, Detection};

/// Initialized once: whether matched values may appear verbatim in debug logs.
static PII_DEBUG_ALLOWED: Lazy<bool> = Lazy::new(|| {
    std::env::var("PIISCRUB_ALLOW_DEBUG_PII")
        .map(|s| s.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
});

/// One masked span, with offsets into the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub kind: String,
    pub start: usize,
    pub end: usize,
    pub tier: ConfidenceTier,
    pub sample_hash: String,
}

impl ReportEntry {
    pub fn from_detection(detection: &Detection<'_>) -> Self {
        Self {
            kind: detection.kind().to_string(),
            start: detection.start(),
            end: detection.end(),
            tier: detection.tier(),
            sample_hash: canonical_sample_hash(detection.kind(), detection.text()),
        }
    }
}

/// Per-kind totals for summary output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionSummaryItem {
    pub kind: String,
    pub occurrences: usize,
    pub heuristic: usize,
    /// Distinct canonical hashes, in first-seen order.
    pub sample_hashes: Vec<String>,
}

/// Groups report entries by kind, sorted by kind label.
pub fn summarize(entries: &[ReportEntry]) -> Vec<RedactionSummaryItem> {
    let mut by_kind: BTreeMap<&str, RedactionSummaryItem> = BTreeMap::new();
    for entry in entries {
        let item = by_kind
            .entry(entry.kind.as_str())
            .or_insert_with(|| RedactionSummaryItem {
                kind: entry.kind.clone(),
                occurrences: 0,
                heuristic: 0,
                sample_hashes: Vec::new(),
            });
        item.occurrences += 1;
        if entry.tier == ConfidenceTier::Heuristic {
            item.heuristic += 1;
        }
        if !item.sample_hashes.contains(&entry.sample_hash) {
            item.sample_hashes.push(entry.sample_hash.clone());
        }
    }
    by_kind.into_values().collect()
}

/// SHA-256 over the kind and the whitespace/case-normalized value, hex encoded.
pub fn canonical_sample_hash(kind: &str, value: &str) -> String {
    let normalized = value
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update(b":");
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    let len = s.chars().count();
    if len <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", len)
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_detection_debug(module_path: &str, kind: &str, value: &str, tier: ConfidenceTier) {
    debug!(
        "{} Detection: kind='{}', value='{}', tier={:?}",
        module_path,
        kind,
        get_loggable_content(value),
        tier
    );
}
