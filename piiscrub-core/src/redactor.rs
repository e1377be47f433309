// piiscrub-core/src/redactor.rs
//! Offset-driven masking.
//!
//! Output is rebuilt from the recorded `(start, end)` of each surviving
//! detection: text between spans is copied verbatim and each span is replaced
//! by a mask. Values are never searched for and replaced, since the same
//! characters may legitimately appear elsewhere in the text.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{MaskStyle, RedactionSettings};
use crate::errors::ScrubError;
use crate::evaluator::check_candidate;
use crate::report::ReportEntry;
use crate::span::Detection;

/// Masked text plus the spans that were masked, in start order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redaction {
    pub masked: String,
    pub report: Vec<ReportEntry>,
}

/// Keeps, out of every group of intersecting detections, only the longest.
///
/// Ties go to the earliest start, then to the lowest lexicon rank. The result
/// is non-overlapping and sorted by start.
pub fn resolve_overlaps<'t>(detections: &[Detection<'t>]) -> Vec<Detection<'t>> {
    let mut ranked: Vec<&Detection<'t>> = detections.iter().collect();
    ranked.sort_by(|a, b| {
        b.span()
            .len()
            .cmp(&a.span().len())
            .then(a.start().cmp(&b.start()))
            .then(a.rank().cmp(&b.rank()))
    });

    // Survivors keyed by start. They are disjoint, so the survivor with the
    // greatest start below `end` is the only one that can reach into
    // `[start, end)`.
    let mut survivors: BTreeMap<usize, &Detection<'t>> = BTreeMap::new();
    for detection in ranked {
        let clashes = survivors
            .range(..detection.end())
            .next_back()
            .is_some_and(|(_, k)| k.end() > detection.start());
        if !clashes {
            survivors.insert(detection.start(), detection);
        }
    }

    let kept: Vec<Detection<'t>> = survivors.into_values().cloned().collect();
    debug!(
        "Overlap resolution kept {} of {} detection(s).",
        kept.len(),
        detections.len()
    );
    kept
}

/// Applies a fixed masking policy to detections.
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    settings: RedactionSettings,
}

impl Redactor {
    pub fn new(settings: RedactionSettings) -> Self {
        Self { settings }
    }

    /// Produces the masked copy of `text`.
    ///
    /// Overlaps are resolved here. Fails with `InvalidCandidate` if a
    /// detection does not describe `text`.
    pub fn redact(&self, text: &str, detections: &[Detection<'_>]) -> Result<Redaction, ScrubError> {
        for detection in detections {
            check_candidate(detection.candidate(), text)?;
        }
        let kept = resolve_overlaps(detections);
        let mut masked = String::with_capacity(text.len());
        let mut last_end = 0usize;

        for detection in &kept {
            masked.push_str(&text[last_end..detection.start()]);
            self.write_mask(&mut masked, detection);
            last_end = detection.end();
        }
        masked.push_str(&text[last_end..]);

        Ok(Redaction {
            masked,
            report: kept.iter().map(ReportEntry::from_detection).collect(),
        })
    }

    fn write_mask(&self, out: &mut String, detection: &Detection<'_>) {
        match self.settings.mask_style() {
            MaskStyle::Mask => {
                // One mask character per source character keeps the visible
                // width of the line intact for non-ASCII text too.
                let width = detection.text().chars().count();
                out.extend(std::iter::repeat(self.settings.mask_char()).take(width));
            }
            MaskStyle::Label => {
                out.push('[');
                out.push_str(&detection.kind().to_uppercase());
                out.push(']');
            }
        }
    }
}
