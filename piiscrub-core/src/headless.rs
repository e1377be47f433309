// File: piiscrub-core/src/headless.rs

//! Convenience wrappers for using the engine non-interactively.
//!
//! `headless_sanitize_string` is a one-shot call for a single document.
//! `headless_sanitize_batch` fans documents out over the rayon thread pool;
//! every document gets its own `Result`, so one failing document never
//! affects the others.

use anyhow::{Context, Result};
use log::debug;
use piiscrub_trie::NameTrie;
use rayon::prelude::*;
use std::sync::Arc;

use crate::config::ScrubConfig;
use crate::engine::SanitizationEngine;
use crate::engines::pii_engine::PiiEngine;
use crate::errors::ScrubError;
use crate::redactor::Redaction;

/// Builds an engine for `config` and returns the masked copy of `content`.
pub fn headless_sanitize_string(
    config: ScrubConfig,
    trie: Arc<NameTrie>,
    content: &str,
) -> Result<String> {
    let engine = PiiEngine::new(config, trie).context("Failed to build the PII engine")?;
    let redaction = engine
        .sanitize(content)
        .context("Failed to sanitize the input")?;
    Ok(redaction.masked)
}

/// Sanitizes many documents in parallel with one shared engine.
///
/// Results are returned in input order.
pub fn headless_sanitize_batch<E, S>(engine: &E, documents: &[S]) -> Vec<Result<Redaction, ScrubError>>
where
    E: SanitizationEngine + ?Sized,
    S: AsRef<str> + Sync,
{
    debug!("Sanitizing a batch of {} document(s).", documents.len());
    documents
        .par_iter()
        .map(|doc| engine.sanitize(doc.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::PatternLexicon;
    use crate::span::Detection;

    /// Wraps the real engine and refuses documents containing "boom".
    struct FlakyEngine(PiiEngine);

    impl SanitizationEngine for FlakyEngine {
        fn sanitize(&self, content: &str) -> Result<Redaction, ScrubError> {
            if content.contains("boom") {
                return Err(ScrubError::InvalidCandidate {
                    kind: "test".to_string(),
                    start: 0,
                    end: 4,
                    reason: "forced".to_string(),
                });
            }
            self.0.sanitize(content)
        }

        fn detect<'t>(&self, content: &'t str) -> Result<Vec<Detection<'t>>, ScrubError> {
            self.0.detect(content)
        }

        fn lexicon(&self) -> &PatternLexicon {
            self.0.lexicon()
        }

        fn config(&self) -> &ScrubConfig {
            self.0.config()
        }
    }

    fn trie() -> Arc<NameTrie> {
        Arc::new(NameTrie::build(["jon", "doe"]))
    }

    #[test]
    fn test_headless_sanitize_string() -> Result<()> {
        let config = ScrubConfig::load_default_rules()?;
        let masked = headless_sanitize_string(config, trie(), "Doe wrote to jon@example.com")?;
        assert_eq!(masked, "*** wrote to ***************");
        Ok(())
    }

    #[test]
    fn test_batch_preserves_order_and_isolates_failures() -> Result<()> {
        let engine = FlakyEngine(PiiEngine::new(ScrubConfig::load_default_rules()?, trie())?);
        let docs = vec!["Jon here", "boom", "call 556-321-9876", ""];
        let results = headless_sanitize_batch(&engine, &docs);

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().unwrap().masked, "*** here");
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().masked, "call ************");
        assert_eq!(results[3].as_ref().unwrap().masked, "");
        Ok(())
    }

    #[test]
    fn test_batch_accepts_trait_objects() -> Result<()> {
        let engine: Box<dyn SanitizationEngine> =
            Box::new(PiiEngine::new(ScrubConfig::load_default_rules()?, trie())?);
        let docs = vec![String::from("Doe"), String::from("nobody")];
        let results = headless_sanitize_batch(engine.as_ref(), &docs);
        assert_eq!(results[0].as_ref().unwrap().masked, "***");
        assert_eq!(results[1].as_ref().unwrap().masked, "nobody");
        Ok(())
    }
}
