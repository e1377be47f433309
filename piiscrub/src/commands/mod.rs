// piiscrub/src/commands/mod.rs
//! Command implementations and the engine bootstrap they share.

pub mod sanitize;
pub mod scan;

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use std::sync::Arc;

use piiscrub_core::{merge_rules, MaskStyle, NameTrie, PiiEngine, ScrubConfig};

use crate::cli::EngineArgs;
use crate::corpus::load_name_corpus;

/// Redaction settings given on the command line; they win over the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedactionOverrides {
    pub mask_char: Option<char>,
    pub label: bool,
}

/// Assembles the effective configuration: defaults, then `--config`, then the
/// enable/disable lists, then the command-line redaction overrides.
pub fn load_config(args: &EngineArgs, overrides: RedactionOverrides) -> Result<ScrubConfig> {
    let defaults = ScrubConfig::load_default_rules()?;
    let user = args
        .config
        .as_deref()
        .map(ScrubConfig::load_from_file)
        .transpose()?;
    let mut config = merge_rules(defaults, user);
    config.set_active_rules(&args.enable, &args.disable);

    if let Some(c) = overrides.mask_char {
        if c.is_whitespace() {
            bail!("--mask-char must not be whitespace");
        }
        config.redaction.mask_char = Some(c);
    }
    if overrides.label {
        config.redaction.mask_style = Some(MaskStyle::Label);
    }
    Ok(config)
}

/// Builds the engine for one CLI run.
pub fn build_engine(args: &EngineArgs, overrides: RedactionOverrides) -> Result<PiiEngine> {
    let config = load_config(args, overrides)?;

    let trie = match &args.names {
        Some(path) => load_name_corpus(path)?,
        None => {
            if !config.gated_kinds().is_empty() {
                warn!(
                    "No name corpus given (--names); {} will not be detected.",
                    config.gated_kinds().join(", ")
                );
            }
            NameTrie::default()
        }
    };

    let engine = PiiEngine::new(config, Arc::new(trie))
        .context("Failed to build the sanitization engine")?;
    debug!("Engine ready.");
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use piiscrub_core::SanitizationEngine;

    fn args() -> EngineArgs {
        EngineArgs {
            names: None,
            config: None,
            enable: Vec::new(),
            disable: Vec::new(),
        }
    }

    #[test]
    fn test_overrides_apply_after_config() -> Result<()> {
        let config = load_config(
            &args(),
            RedactionOverrides {
                mask_char: Some('#'),
                label: false,
            },
        )?;
        assert_eq!(config.redaction.mask_char(), '#');
        assert_eq!(config.redaction.mask_style(), MaskStyle::Mask);
        Ok(())
    }

    #[test]
    fn test_whitespace_mask_char_is_rejected() {
        let err = load_config(
            &args(),
            RedactionOverrides {
                mask_char: Some(' '),
                label: false,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("--mask-char"));
    }

    #[test]
    fn test_disable_list_removes_kind() -> Result<()> {
        let mut a = args();
        a.disable = vec!["email".to_string()];
        let engine = build_engine(&a, RedactionOverrides::default())?;
        assert!(engine.lexicon().get("email").is_none());
        assert!(engine.lexicon().get("phone").is_some());
        Ok(())
    }
}
