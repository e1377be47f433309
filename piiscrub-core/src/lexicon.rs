//! lexicon.rs - Compiles pattern rules into an immutable `PatternLexicon`.
//!
//! The lexicon is an ordered list of compiled patterns. The position of an
//! entry is its rank, which every later stage uses to break ties between
//! kinds. A lexicon is built once and shared read-only (`Arc<PatternLexicon>`)
//! across any number of concurrent scans.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::config::{PatternRule, ScrubConfig, ValidatorKind, MAX_PATTERN_LENGTH};
use crate::errors::ScrubError;

/// A single compiled lexicon entry.
#[derive(Debug)]
pub struct LexiconEntry {
    /// Kind label shared with every span this entry produces.
    pub kind: Arc<str>,
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// Whether matches need a dictionary hit to become detections.
    pub dictionary_gated: bool,
    pub validator: Option<ValidatorKind>,
    /// Insertion index within the lexicon.
    pub rank: usize,
}

/// Ordered, read-only mapping from kind label to compiled pattern.
#[derive(Debug)]
pub struct PatternLexicon {
    entries: Vec<LexiconEntry>,
    fingerprint: String,
}

impl PatternLexicon {
    /// Compiles the rules of a configuration.
    pub fn from_config(config: &ScrubConfig) -> Result<Self, ScrubError> {
        Self::compile(&config.rules)
    }

    /// Compiles rules in order. Rules with `enabled: false`, and opt-in rules
    /// not explicitly enabled, are skipped and do not consume a rank.
    ///
    /// Fails with a configuration error if any pattern is invalid, too long,
    /// declared twice, or able to match the empty string.
    pub fn compile(rules: &[PatternRule]) -> Result<Self, ScrubError> {
        debug!("Starting compilation of {} rules.", rules.len());

        let mut entries: Vec<LexiconEntry> = Vec::with_capacity(rules.len());
        let mut compilation_errors = Vec::new();
        let mut hasher = Sha256::new();

        for rule in rules {
            if rule.enabled == Some(false) || (rule.opt_in && rule.enabled != Some(true)) {
                debug!("Skipping inactive rule '{}'.", rule.kind);
                continue;
            }

            if entries.iter().any(|e| &*e.kind == rule.kind.as_str()) {
                compilation_errors.push(ScrubError::DuplicateKind(rule.kind.clone()));
                continue;
            }

            match compile_entry(rule, entries.len()) {
                Ok(entry) => {
                    debug!(
                        target: "piiscrub_core::lexicon",
                        "Rule '{}' compiled successfully at rank {}.",
                        entry.kind,
                        entry.rank
                    );
                    hasher.update(rule.kind.as_bytes());
                    hasher.update([0]);
                    hasher.update(rule.pattern.as_bytes());
                    hasher.update([
                        0,
                        rule.dictionary_gated as u8,
                        rule.case_insensitive as u8,
                        rule.multiline as u8,
                    ]);
                    entries.push(entry);
                }
                Err(e) => compilation_errors.push(e),
            }
        }

        if compilation_errors.len() == 1 {
            return Err(compilation_errors.remove(0));
        }
        if !compilation_errors.is_empty() {
            let error_message = compilation_errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<String>>()
                .join("\n");
            return Err(ScrubError::Configuration(format!(
                "Failed to compile {} rule(s):\n{}",
                compilation_errors.len(),
                error_message
            )));
        }

        debug!("Finished compiling rules. Total compiled: {}.", entries.len());
        Ok(Self {
            entries,
            fingerprint: hex::encode(&hasher.finalize()[..8]),
        })
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn get(&self, kind: &str) -> Option<&LexiconEntry> {
        self.entries.iter().find(|e| &*e.kind == kind)
    }

    /// Entry for a rank, as carried by candidates.
    pub fn by_rank(&self, rank: usize) -> Option<&LexiconEntry> {
        self.entries.get(rank)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Short, stable hex digest of the compiled rules, for report provenance.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn compile_entry(rule: &PatternRule, rank: usize) -> Result<LexiconEntry, ScrubError> {
    let pattern = rule.pattern.as_str();

    if pattern.is_empty() {
        return Err(ScrubError::EmptyMatchPattern(rule.kind.clone()));
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(ScrubError::PatternLengthExceeded(
            rule.kind.clone(),
            pattern.len(),
            MAX_PATTERN_LENGTH,
        ));
    }

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(rule.case_insensitive)
        .multi_line(rule.multiline)
        .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
        .build()
        .map_err(|e| ScrubError::RuleCompilationError(rule.kind.clone(), e))?;

    if can_match_empty(rule)? {
        return Err(ScrubError::EmptyMatchPattern(rule.kind.clone()));
    }

    Ok(LexiconEntry {
        kind: Arc::from(rule.kind.as_str()),
        regex,
        dictionary_gated: rule.dictionary_gated,
        validator: rule.validator,
        rank,
    })
}

/// A pattern whose minimum match length is zero would make the scanner emit
/// empty spans, so it is rejected up front.
fn can_match_empty(rule: &PatternRule) -> Result<bool, ScrubError> {
    let hir = regex_syntax::ParserBuilder::new()
        .case_insensitive(rule.case_insensitive)
        .multi_line(rule.multiline)
        .build()
        .parse(&rule.pattern)
        .map_err(|e| ScrubError::Configuration(format!("Rule '{}': {}", rule.kind, e)))?;

    match hir.properties().minimum_len() {
        Some(0) => Ok(true),
        Some(_) => Ok(false),
        None => {
            warn!("Rule '{}' can never match any input.", rule.kind);
            Ok(false)
        }
    }
}
