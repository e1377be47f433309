// piiscrub-core/src/evaluator.rs
//! Turns scanner candidates into detections.
//!
//! Pattern-only kinds are trusted (after their optional validator).
//! Dictionary-gated kinds must be found in the [`NameTrie`]. Words listed in
//! the [`ContextRules`] table are ambiguous: they survive only when the
//! adjacent word is a dictionary name, in which case both words are kept at
//! `heuristic` tier.

use log::debug;
use piiscrub_trie::NameTrie;
use std::collections::HashMap;

use crate::config::{ContextRule, NeighborRelationship, ScrubConfig};
use crate::errors::ScrubError;
use crate::lexicon::PatternLexicon;
use crate::report::log_detection_debug;
use crate::span::{Candidate, ConfidenceTier, Detection};
use crate::validators;

/// Lookup table of ambiguous words, keyed by their lowercase form.
#[derive(Debug, Clone, Default)]
pub struct ContextRules {
    rules: HashMap<String, NeighborRelationship>,
}

impl ContextRules {
    pub fn from_config(config: &ScrubConfig) -> Result<Self, ScrubError> {
        Self::from_rules(&config.context_rules)
    }

    /// Builds the table, rejecting empty, multi-word and duplicate entries.
    pub fn from_rules(rules: &[ContextRule]) -> Result<Self, ScrubError> {
        let mut table = HashMap::with_capacity(rules.len());
        for rule in rules {
            let word = rule.word.trim();
            if word.is_empty() {
                return Err(ScrubError::InvalidContextRule(
                    rule.word.clone(),
                    "word is empty".to_string(),
                ));
            }
            if word.chars().any(char::is_whitespace) {
                return Err(ScrubError::InvalidContextRule(
                    rule.word.clone(),
                    "word must not contain whitespace".to_string(),
                ));
            }
            if table.insert(word.to_lowercase(), rule.relationship).is_some() {
                return Err(ScrubError::InvalidContextRule(
                    rule.word.clone(),
                    "word is listed more than once".to_string(),
                ));
            }
        }
        Ok(Self { rules: table })
    }

    /// Case-insensitive lookup.
    pub fn relationship(&self, word: &str) -> Option<NeighborRelationship> {
        self.rules.get(&word.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Borrowing view over the shared, immutable evaluation resources.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    lexicon: &'a PatternLexicon,
    trie: &'a NameTrie,
    context: &'a ContextRules,
}

impl<'a> Evaluator<'a> {
    pub fn new(lexicon: &'a PatternLexicon, trie: &'a NameTrie, context: &'a ContextRules) -> Self {
        Self {
            lexicon,
            trie,
            context,
        }
    }

    /// Evaluates candidates for one document, preserving their order.
    ///
    /// Fails only when a candidate does not describe `text` (wrong offsets,
    /// wrong substring, unknown kind); rejected candidates are simply absent
    /// from the result.
    pub fn evaluate<'t>(
        &self,
        candidates: &[Candidate<'t>],
        text: &'t str,
    ) -> Result<Vec<Detection<'t>>, ScrubError> {
        let mut gated = Vec::new();
        let mut verdicts: Vec<Option<ConfidenceTier>> = vec![None; candidates.len()];

        for (i, candidate) in candidates.iter().enumerate() {
            check_candidate(candidate, text)?;
            let entry = self
                .lexicon
                .by_rank(candidate.rank())
                .filter(|e| &*e.kind == candidate.kind())
                .ok_or_else(|| invalid(candidate, "kind is not part of the lexicon"))?;

            if entry.dictionary_gated {
                gated.push(i);
                if self.context.relationship(candidate.text()).is_none()
                    && self.trie.contains(candidate.text())
                {
                    verdicts[i] = Some(ConfidenceTier::Confirmed);
                }
            } else if entry
                .validator
                .map_or(true, |v| validators::validate(v, candidate.text()))
            {
                verdicts[i] = Some(ConfidenceTier::Confirmed);
            }
        }

        self.apply_context_rules(candidates, text, &gated, &mut verdicts);

        let detections: Vec<Detection<'t>> = candidates
            .iter()
            .zip(verdicts)
            .filter_map(|(candidate, verdict)| {
                verdict.map(|tier| Detection::new(candidate.clone(), tier))
            })
            .collect();

        for d in &detections {
            log_detection_debug(module_path!(), d.kind(), d.text(), d.tier());
        }
        debug!(
            "Evaluated {} candidate(s): {} detection(s).",
            candidates.len(),
            detections.len()
        );
        Ok(detections)
    }

    /// Resolves every ambiguous word first, then promotes the neighbours of
    /// the words that were kept. A promoted neighbour is reported at
    /// `heuristic` tier even if it was a plain dictionary hit.
    fn apply_context_rules(
        &self,
        candidates: &[Candidate<'_>],
        text: &str,
        gated: &[usize],
        verdicts: &mut [Option<ConfidenceTier>],
    ) {
        if self.context.is_empty() {
            return;
        }

        let mut promoted = Vec::new();
        for (pos, &i) in gated.iter().enumerate() {
            let candidate = &candidates[i];
            let Some(relationship) = self.context.relationship(candidate.text()) else {
                continue;
            };

            let neighbour = match relationship {
                NeighborRelationship::FollowedByName => gated[pos + 1..]
                    .iter()
                    .copied()
                    .find(|&j| candidates[j].start() >= candidate.end())
                    .filter(|&j| is_adjacent(&text[candidate.end()..candidates[j].start()])),
                NeighborRelationship::PrecededByName => gated[..pos]
                    .iter()
                    .rev()
                    .copied()
                    .find(|&j| candidates[j].end() <= candidate.start())
                    .filter(|&j| is_adjacent(&text[candidates[j].end()..candidate.start()])),
            };

            match neighbour.filter(|&j| self.trie.contains(candidates[j].text())) {
                Some(j) => {
                    promoted.push(i);
                    promoted.push(j);
                }
                None => {
                    debug!("Ambiguous word at {} dropped: no name beside it.", candidate.start());
                    verdicts[i] = None;
                }
            }
        }

        for i in promoted {
            verdicts[i] = Some(ConfidenceTier::Heuristic);
        }
    }
}

/// Only spaces or tabs may separate two words of one full name, optionally
/// after an abbreviation dot ("Pvt. John").
fn is_adjacent(gap: &str) -> bool {
    let rest = gap.strip_prefix('.').unwrap_or(gap);
    !rest.is_empty() && rest.chars().all(|c| c == ' ' || c == '\t')
}

/// Fails unless `candidate` lies on character boundaries of `text` and its
/// recorded text equals the slice at its offsets.
pub(crate) fn check_candidate(candidate: &Candidate<'_>, text: &str) -> Result<(), ScrubError> {
    let (start, end) = (candidate.start(), candidate.end());
    if end > text.len() {
        return Err(invalid(candidate, "span extends past the end of the text"));
    }
    match text.get(start..end) {
        None => Err(invalid(candidate, "span does not fall on character boundaries")),
        Some(slice) if slice != candidate.text() => {
            Err(invalid(candidate, "recorded text differs from the text at its offsets"))
        }
        Some(_) => Ok(()),
    }
}

fn invalid(candidate: &Candidate<'_>, reason: &str) -> ScrubError {
    ScrubError::InvalidCandidate {
        kind: candidate.kind().to_string(),
        start: candidate.start(),
        end: candidate.end(),
        reason: reason.to_string(),
    }
}
