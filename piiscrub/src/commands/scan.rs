// piiscrub/src/commands/scan.rs
//! `piiscrub scan`: reports detections without printing masked text.
//!
//! Several input files are scanned in parallel through the headless batch
//! API. A file that fails (unreadable, or rejected by the engine) is reported
//! and does not stop the others.

use anyhow::{anyhow, bail, Context, Result};
use is_terminal::IsTerminal;
use log::{info, warn};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};

use piiscrub_core::{
    headless_sanitize_batch, summarize, RedactionSummaryItem, ReportEntry, SanitizationEngine,
};

use crate::cli::ScanCommand;
use crate::commands::{build_engine, RedactionOverrides};
use crate::ui::{output_format, summary};

/// The JSON report for one input.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub source: String,
    /// Fingerprint of the lexicon that produced the report.
    pub lexicon: String,
    pub detections: Vec<ReportEntry>,
    pub summary: Vec<RedactionSummaryItem>,
}

impl ScanReport {
    pub fn total(&self) -> usize {
        self.detections.len()
    }
}

pub fn run_scan_command(cmd: ScanCommand, quiet: bool) -> Result<()> {
    let engine = build_engine(&cmd.engine, RedactionOverrides::default())?;

    let mut sources: Vec<String> = Vec::new();
    let mut documents: Vec<String> = Vec::new();
    let mut failures = 0usize;

    if cmd.input_files.is_empty() {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        sources.push("<stdin>".to_string());
        documents.push(buf);
    } else {
        for path in &cmd.input_files {
            match fs::read_to_string(path) {
                Ok(text) => {
                    sources.push(path.display().to_string());
                    documents.push(text);
                }
                Err(e) => {
                    failures += 1;
                    error_msg(format!("Failed to read {}: {}", path.display(), e));
                }
            }
        }
    }

    let (reports, scan_failures) = scan_documents(&engine, &sources, &documents);
    failures += scan_failures;

    if !quiet {
        let stderr_supports_color = io::stderr().is_terminal();
        let mut stderr = io::stderr();
        for report in &reports {
            writeln!(stderr, "{}", report.source)?;
            summary::print_summary(&report.summary, &mut stderr, stderr_supports_color)?;
        }
    }

    if cmd.json_stdout {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        serde_json::to_writer_pretty(&mut writer, &reports)?;
        writeln!(writer)?;
    } else if let Some(path) = &cmd.json_file {
        let json = serde_json::to_string_pretty(&reports)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write JSON report: {}", path.display()))?;
        info!("JSON report written to {}", path.display());
    }

    let total: usize = reports.iter().map(ScanReport::total).sum();
    info!("Scan found {} detection(s) in {} input(s).", total, reports.len());

    if failures > 0 {
        bail!("{} input(s) could not be scanned", failures);
    }
    if let Some(threshold) = cmd.fail_over_threshold {
        check_threshold(total, threshold)?;
    }
    Ok(())
}

/// Scans `documents` in parallel and pairs each result with its source.
///
/// Returns the successful reports, in input order, and the failure count.
pub fn scan_documents<E: SanitizationEngine + ?Sized>(
    engine: &E,
    sources: &[String],
    documents: &[String],
) -> (Vec<ScanReport>, usize) {
    let fingerprint = engine.lexicon().fingerprint().to_string();
    let mut reports = Vec::with_capacity(documents.len());
    let mut failures = 0usize;

    for (source, result) in sources.iter().zip(headless_sanitize_batch(engine, documents)) {
        match result {
            Ok(redaction) => reports.push(ScanReport {
                source: source.clone(),
                lexicon: fingerprint.clone(),
                summary: summarize(&redaction.report),
                detections: redaction.report,
            }),
            Err(e) => {
                failures += 1;
                warn!("Scan of {} failed: {}", source, e);
                error_msg(format!("Failed to scan {}: {}", source, e));
            }
        }
    }
    (reports, failures)
}

pub fn check_threshold(total: usize, threshold: usize) -> Result<()> {
    if total > threshold {
        return Err(anyhow!(
            "{} detection(s) exceed the threshold of {}",
            total,
            threshold
        ));
    }
    Ok(())
}

fn error_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}
