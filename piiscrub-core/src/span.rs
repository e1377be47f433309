// piiscrub-core/src/span.rs
//! Span, candidate and detection types shared by the pipeline stages.
//!
//! Offsets are byte offsets into the UTF-8 source text and always fall on
//! character boundaries. Spans are half-open: `[start, end)`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An immutable, non-empty range of the source text tagged with a kind label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    start: usize,
    end: usize,
    kind: Arc<str>,
}

impl Span {
    /// Returns `None` for empty or inverted ranges.
    pub fn new(start: usize, end: usize, kind: impl Into<Arc<str>>) -> Option<Self> {
        (start < end).then(|| Self {
            start,
            end,
            kind: kind.into(),
        })
    }

    /// Used for regex matches, which the lexicon guarantees are non-empty.
    pub(crate) fn from_match(start: usize, end: usize, kind: Arc<str>) -> Self {
        debug_assert!(start < end, "lexicon admitted an empty match");
        Self { start, end, kind }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A span matched by a lexicon pattern, not yet evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'t> {
    span: Span,
    text: &'t str,
    rank: usize,
}

impl<'t> Candidate<'t> {
    /// `text` is expected to equal the covered slice of the source; the
    /// evaluator rejects candidates where it does not.
    pub fn new(span: Span, text: &'t str, rank: usize) -> Self {
        Self { span, text, rank }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn text(&self) -> &'t str {
        self.text
    }

    /// Lexicon insertion index of this candidate's kind.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn kind(&self) -> &str {
        self.span.kind()
    }
}

/// How strongly the evaluator believes a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    /// Pattern alone, or an exact dictionary hit.
    Confirmed,
    /// Promoted by a context rule.
    Heuristic,
}

/// A candidate that passed evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection<'t> {
    candidate: Candidate<'t>,
    tier: ConfidenceTier,
}

impl<'t> Detection<'t> {
    pub fn new(candidate: Candidate<'t>, tier: ConfidenceTier) -> Self {
        Self { candidate, tier }
    }

    pub fn candidate(&self) -> &Candidate<'t> {
        &self.candidate
    }

    pub fn span(&self) -> &Span {
        self.candidate.span()
    }

    pub fn text(&self) -> &'t str {
        self.candidate.text()
    }

    pub fn kind(&self) -> &str {
        self.candidate.kind()
    }

    pub fn rank(&self) -> usize {
        self.candidate.rank()
    }

    pub fn start(&self) -> usize {
        self.candidate.start()
    }

    pub fn end(&self) -> usize {
        self.candidate.end()
    }

    pub fn tier(&self) -> ConfidenceTier {
        self.tier
    }
}
