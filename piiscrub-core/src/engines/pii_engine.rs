// piiscrub-core/src/engines/pii_engine.rs
//! The standard scanner → evaluator → redactor pipeline.
//! License: MIT OR APACHE 2.0

use log::debug;
use piiscrub_trie::NameTrie;
use std::sync::Arc;

use crate::config::ScrubConfig;
use crate::engine::SanitizationEngine;
use crate::errors::ScrubError;
use crate::evaluator::{ContextRules, Evaluator};
use crate::lexicon::PatternLexicon;
use crate::redactor::{Redaction, Redactor};
use crate::scanner::scan;
use crate::span::Detection;

/// Holds the immutable resources of one configuration.
///
/// Cloning is cheap: the lexicon, trie and context table are shared.
#[derive(Debug, Clone)]
pub struct PiiEngine {
    config: ScrubConfig,
    lexicon: Arc<PatternLexicon>,
    trie: Arc<NameTrie>,
    context: Arc<ContextRules>,
    redactor: Redactor,
}

impl PiiEngine {
    /// Compiles `config` and binds it to a name dictionary.
    ///
    /// Fails with a configuration error on any invalid pattern or context rule.
    pub fn new(config: ScrubConfig, trie: Arc<NameTrie>) -> Result<Self, ScrubError> {
        let lexicon = Arc::new(PatternLexicon::from_config(&config)?);
        let context = Arc::new(ContextRules::from_config(&config)?);
        let redactor = Redactor::new(config.redaction.clone());

        debug!(
            "Initialized PiiEngine: {} kind(s), {} context rule(s), {} dictionary name(s), lexicon {}.",
            lexicon.len(),
            context.len(),
            trie.len(),
            lexicon.fingerprint()
        );

        Ok(Self {
            config,
            lexicon,
            trie,
            context,
            redactor,
        })
    }

    pub fn trie(&self) -> &NameTrie {
        &self.trie
    }

    pub fn context_rules(&self) -> &ContextRules {
        &self.context
    }
}

impl SanitizationEngine for PiiEngine {
    fn sanitize(&self, content: &str) -> Result<Redaction, ScrubError> {
        let detections = self.detect(content)?;
        self.redactor.redact(content, &detections)
    }

    fn detect<'t>(&self, content: &'t str) -> Result<Vec<Detection<'t>>, ScrubError> {
        let candidates = scan(content, &self.lexicon);
        Evaluator::new(&self.lexicon, &self.trie, &self.context).evaluate(&candidates, content)
    }

    fn lexicon(&self) -> &PatternLexicon {
        &self.lexicon
    }

    fn config(&self) -> &ScrubConfig {
        &self.config
    }
}
