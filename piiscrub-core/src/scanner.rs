// piiscrub-core/src/scanner.rs
//! Lexical candidate extraction.
//!
//! Every lexicon pattern is run over the whole input. Candidates of different
//! kinds may overlap; that is resolved later by the evaluator and redactor.

use log::debug;

use crate::lexicon::PatternLexicon;
use crate::span::{Candidate, Span};

/// Finds every candidate in `text`.
///
/// The result is ordered by start offset, ties broken by lexicon rank. Within
/// one kind, matches never overlap: each match consumes its span before the
/// search resumes after its end.
pub fn scan<'t>(text: &'t str, lexicon: &PatternLexicon) -> Vec<Candidate<'t>> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for entry in lexicon.entries() {
        let before = candidates.len();
        candidates.extend(entry.regex.find_iter(text).map(|m| {
            let span = Span::from_match(m.start(), m.end(), entry.kind.clone());
            Candidate::new(span, m.as_str(), entry.rank)
        }));
        debug!(
            "Kind '{}' produced {} candidate(s).",
            entry.kind,
            candidates.len() - before
        );
    }

    // Stable sort: equal keys cannot occur within a kind, and kinds were
    // appended in rank order.
    candidates.sort_by_key(|c| (c.start(), c.rank()));
    candidates
}
