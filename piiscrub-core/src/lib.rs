// piiscrub-core/src/lib.rs
//! # piiscrub Core Library
//!
//! `piiscrub-core` finds personally identifying substrings (names, emails,
//! phone numbers, dates of birth, national IDs) in unstructured text and masks
//! them without corrupting the rest of the input. It needs no schema for the
//! text: logs, key-value dumps, CSV fragments and free prose are all handled
//! the same way.
//!
//! The pipeline has three stages:
//!
//! 1. **Scanner** ([`scan`]): every pattern of the [`PatternLexicon`] is run
//!    over the text, producing overlapping [`Candidate`]s.
//! 2. **Evaluator** ([`Evaluator`]): pattern-only kinds are accepted, while
//!    dictionary-gated kinds must be present in the [`NameTrie`]. Ambiguous
//!    words ("Private", "Major") are resolved by the [`ContextRules`] table.
//! 3. **Redactor** ([`Redactor`]): overlaps are resolved (longest span wins)
//!    and each surviving span is masked in place by offset.
//!
//! The lexicon, the trie and the context table are immutable once built and
//! can be shared across threads. [`PiiEngine`] bundles them behind the
//! [`SanitizationEngine`] trait, and [`headless_sanitize_batch`] processes
//! many documents in parallel.
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use piiscrub_core::{NameTrie, PiiEngine, SanitizationEngine, ScrubConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ScrubConfig::load_default_rules()?;
//!     let trie = Arc::new(NameTrie::build(["jon", "doe"]));
//!     let engine = PiiEngine::new(config, trie)?;
//!
//!     let redaction = engine.sanitize("Jon Doe email is jon@example.com")?;
//!     assert_eq!(redaction.masked, "*** *** email is ***************");
//!     assert_eq!(redaction.report.len(), 3);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`ScrubError`]. Configuration problems surface
//! when the engine is built; a per-document failure (`InvalidCandidate`)
//! aborts only that document. Config-file helpers and the headless wrappers
//! use `anyhow::Error`.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod evaluator;
pub mod headless;
pub mod lexicon;
pub mod redactor;
pub mod report;
pub mod scanner;
pub mod span;
pub mod validators;

/// Re-exports the public configuration types and functions.
pub use config::{
    merge_rules, ContextRule, MaskStyle, NeighborRelationship, PatternRule, RedactionSettings,
    ScrubConfig, ValidatorKind, MAX_PATTERN_LENGTH,
};

pub use errors::ScrubError;

pub use engine::SanitizationEngine;
pub use engines::pii_engine::PiiEngine;

pub use evaluator::{ContextRules, Evaluator};
pub use lexicon::{LexiconEntry, PatternLexicon};
pub use redactor::{resolve_overlaps, Redaction, Redactor};
pub use report::{canonical_sample_hash, summarize, RedactionSummaryItem, ReportEntry};
pub use scanner::scan;
pub use span::{Candidate, ConfidenceTier, Detection, Span};

pub use headless::{headless_sanitize_batch, headless_sanitize_string};

/// The name dictionary, re-exported so callers need only this crate.
pub use piiscrub_trie::{NameTrie, NameTrieBuilder};
