// piiscrub/src/commands/sanitize.rs
//! `piiscrub sanitize`: writes a masked copy of the input.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

use piiscrub_core::{summarize, ReportEntry, SanitizationEngine};

use crate::cli::SanitizeCommand;
use crate::commands::{build_engine, RedactionOverrides};
use crate::ui::{output_format, summary};

/// Options for one sanitize run, independent of how they were parsed.
#[derive(Debug, Clone, Default)]
pub struct SanitizeOptions {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub line_buffered: bool,
    pub no_redaction_summary: bool,
    pub quiet: bool,
}

pub fn run_sanitize_command(cmd: SanitizeCommand, quiet: bool) -> Result<()> {
    let engine = build_engine(
        &cmd.engine,
        RedactionOverrides {
            mask_char: cmd.mask_char,
            label: cmd.label,
        },
    )?;
    let opts = SanitizeOptions {
        input_path: cmd.input_file,
        output_path: cmd.output,
        line_buffered: cmd.line_buffered,
        no_redaction_summary: cmd.no_summary,
        quiet,
    };

    if opts.line_buffered {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let report = run_line_buffered(&engine, stdin.lock(), &mut stdout.lock())?;
        return handle_redaction_summary(&report, &opts);
    }

    let input = read_input(opts.input_path.as_deref())?;
    run_sanitize(&engine, &input, &opts)
}

/// Masks one whole document and writes it out.
pub fn run_sanitize(engine: &dyn SanitizationEngine, input: &str, opts: &SanitizeOptions) -> Result<()> {
    info!("Starting sanitize operation.");
    let redaction = engine.sanitize(input).context("Sanitization failed")?;
    debug!(
        "Content sanitized. {} span(s) masked over {} byte(s).",
        redaction.report.len(),
        input.len()
    );

    match &opts.output_path {
        Some(path) => {
            if !opts.quiet {
                info_msg(format!("Writing sanitized content to file: {}", path.display()));
            }
            fs::write(path, &redaction.masked)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            writer.write_all(redaction.masked.as_bytes())?;
            writer.flush()?;
        }
    }

    handle_redaction_summary(&redaction.report, opts)?;
    info!("Sanitize operation completed.");
    Ok(())
}

/// Masks `reader` line by line, flushing after each line.
///
/// Line terminators (`\n` or `\r\n`) are written back as read. Offsets in
/// the returned report are relative to their own line. A line the engine
/// rejects is passed through unchanged with a warning.
pub fn run_line_buffered<R: BufRead, W: Write>(
    engine: &dyn SanitizationEngine,
    mut reader: R,
    writer: &mut W,
) -> Result<Vec<ReportEntry>> {
    let mut report = Vec::new();
    let mut buf = String::new();
    let mut number = 0usize;
    loop {
        buf.clear();
        if reader
            .read_line(&mut buf)
            .context("Failed to read line from stdin")?
            == 0
        {
            break;
        }
        number += 1;

        let body = buf
            .strip_suffix('\n')
            .map(|b| b.strip_suffix('\r').unwrap_or(b))
            .unwrap_or(buf.as_str());
        let terminator = &buf[body.len()..];

        match engine.sanitize(body) {
            Ok(redaction) => {
                writer.write_all(redaction.masked.as_bytes())?;
                report.extend(redaction.report);
            }
            Err(e) => {
                warn_msg(format!("Line {} left unmasked: {}", number, e));
                writer.write_all(body.as_bytes())?;
            }
        }
        writer.write_all(terminator.as_bytes())?;
        writer.flush()?;
    }
    Ok(report)
}

fn read_input(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn handle_redaction_summary(report: &[ReportEntry], opts: &SanitizeOptions) -> Result<()> {
    if !opts.no_redaction_summary && !opts.quiet {
        let stderr_supports_color = io::stderr().is_terminal();
        summary::print_summary(&summarize(report), &mut io::stderr(), stderr_supports_color)?;
    }
    Ok(())
}

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use piiscrub_core::{NameTrie, PiiEngine, ScrubConfig};
    use std::sync::Arc;

    fn engine() -> PiiEngine {
        PiiEngine::new(
            ScrubConfig::load_default_rules().unwrap(),
            Arc::new(NameTrie::build(["jon", "doe"])),
        )
        .unwrap()
    }

    #[test]
    fn test_line_buffered_masks_each_line() -> Result<()> {
        let input = "Jon called\nmail doe@example.org\nnothing here\n";
        let mut out = Vec::new();
        let report = run_line_buffered(&engine(), input.as_bytes(), &mut out)?;
        assert_eq!(
            String::from_utf8(out)?,
            "*** called\nmail ***************\nnothing here\n"
        );
        assert_eq!(report.len(), 2);
        assert_eq!(report[1].start, 5);
        Ok(())
    }

    #[test]
    fn test_line_buffered_keeps_crlf_and_missing_final_newline() -> Result<()> {
        let input = "Jon\r\nssn 123-45-6789\r\nlast line";
        let mut out = Vec::new();
        run_line_buffered(&engine(), input.as_bytes(), &mut out)?;
        assert_eq!(
            String::from_utf8(out)?,
            "***\r\nssn ***********\r\nlast line"
        );
        Ok(())
    }

    #[test]
    fn test_run_sanitize_to_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("masked.txt");
        let opts = SanitizeOptions {
            output_path: Some(out.clone()),
            quiet: true,
            ..Default::default()
        };
        run_sanitize(&engine(), "ssn 123-45-6789\n", &opts)?;
        assert_eq!(fs::read_to_string(out)?, "ssn ***********\n");
        Ok(())
    }
}
