// piiscrub-core/src/engine.rs
//! Defines the core `SanitizationEngine` trait.
//!
//! The trait decouples callers (CLI, batch workers, services) from how a
//! pipeline is assembled. Implementations must be `Send + Sync` so a single
//! engine can serve many documents in parallel.
//!
//! License: MIT OR APACHE 2.0

use crate::config::ScrubConfig;
use crate::errors::ScrubError;
use crate::lexicon::PatternLexicon;
use crate::redactor::Redaction;
use crate::report::{summarize, RedactionSummaryItem};
use crate::span::Detection;

/// Core functionality of a PII sanitization engine.
pub trait SanitizationEngine: Send + Sync {
    /// Scans, evaluates and masks one document.
    ///
    /// An error aborts this document only; the engine stays usable.
    fn sanitize(&self, content: &str) -> Result<Redaction, ScrubError>;

    /// Returns the evaluated detections without masking. Overlaps between
    /// kinds are still present.
    fn detect<'t>(&self, content: &'t str) -> Result<Vec<Detection<'t>>, ScrubError>;

    /// Per-kind totals of what `sanitize` would mask, without producing the
    /// masked text for the caller.
    fn analyze_for_stats(&self, content: &str) -> Result<Vec<RedactionSummaryItem>, ScrubError> {
        let redaction = self.sanitize(content)?;
        Ok(summarize(&redaction.report))
    }

    /// The compiled lexicon used by the engine.
    fn lexicon(&self) -> &PatternLexicon;

    /// The configuration the engine was built from.
    fn config(&self) -> &ScrubConfig;
}
