//! Configuration management for `piiscrub-core`.
//!
//! This module defines the data structures describing the pattern lexicon, the
//! ambiguous-word context rules and the redaction settings. It handles
//! deserialization of YAML configurations and provides utilities for loading,
//! merging, filtering and validating them. Compilation into an executable
//! lexicon happens in [`crate::lexicon`].
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::errors::ScrubError;

/// Maximum allowed length for a pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Programmatic checks a pattern kind may require on top of its regex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    /// Mod-10 checksum, used for payment card numbers.
    Luhn,
    /// US Social Security Number structural rules.
    UsSsn,
    /// UK National Insurance Number prefix/suffix rules.
    UkNino,
}

/// A single lexicon entry: one token kind and the pattern that finds it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternRule {
    /// Kind label reported for matches (e.g., "email", "name").
    pub kind: String,
    /// Human-readable description of what the rule targets.
    pub description: Option<String>,
    /// The regex pattern string.
    pub pattern: String,
    /// If true, matches must be confirmed against the name dictionary.
    pub dictionary_gated: bool,
    pub case_insensitive: bool,
    /// If true, `^` and `$` match at line boundaries.
    pub multiline: bool,
    /// Optional programmatic check applied to every match.
    pub validator: Option<ValidatorKind>,
    /// If true, the rule is dropped unless explicitly enabled.
    pub opt_in: bool,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
    pub severity: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Default for PatternRule {
    fn default() -> Self {
        Self {
            kind: String::new(),
            description: None,
            pattern: String::new(),
            dictionary_gated: false,
            case_insensitive: false,
            multiline: false,
            validator: None,
            opt_in: false,
            enabled: None,
            severity: None,
            tags: None,
        }
    }
}

/// Which neighbouring token an ambiguous word needs in order to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborRelationship {
    /// The next word must be a dictionary name ("Private John").
    #[default]
    FollowedByName,
    /// The previous word must be a dictionary name ("John Major").
    PrecededByName,
}

/// An ambiguous word that is only a name when its neighbour is one too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ContextRule {
    pub word: String,
    #[serde(default)]
    pub relationship: NeighborRelationship,
}

/// How a masked span is rendered in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskStyle {
    /// The mask character repeated once per masked character.
    #[default]
    Mask,
    /// The upper-cased kind label in brackets, e.g. `[EMAIL]`.
    Label,
}

/// Redaction output settings. Unset fields fall back to the defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct RedactionSettings {
    pub mask_char: Option<char>,
    pub mask_style: Option<MaskStyle>,
}

impl RedactionSettings {
    pub const DEFAULT_MASK_CHAR: char = '*';

    pub fn mask_char(&self) -> char {
        self.mask_char.unwrap_or(Self::DEFAULT_MASK_CHAR)
    }

    pub fn mask_style(&self) -> MaskStyle {
        self.mask_style.unwrap_or_default()
    }
}

/// The top-level configuration structure for piiscrub.
///
/// Rule order is significant: it is the lexicon rank used to break ties
/// between kinds matching the same region.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScrubConfig {
    pub rules: Vec<PatternRule>,
    #[serde(default)]
    pub context_rules: Vec<ContextRule>,
    #[serde(default)]
    pub redaction: RedactionSettings,
}

impl ScrubConfig {
    /// Loads a configuration from a YAML file and validates it.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .map_err(ScrubError::from)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());
        Ok(config)
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ScrubConfig = serde_yml::from_str(yaml)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Loads the built-in rule set.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default rules from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: ScrubConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default rules")?;

        debug!(
            "Loaded {} default rules and {} context rules.",
            config.rules.len(),
            config.context_rules.len()
        );
        Ok(config)
    }

    /// Filters active rules based on enable/disable lists.
    ///
    /// Disabled kinds are removed. Opt-in kinds survive only if enabled, either
    /// by name or with `enabled: true` in the file.
    pub fn set_active_rules(&mut self, enable_rules: &[String], disable_rules: &[String]) {
        let enable_set: HashSet<&str> = enable_rules.iter().map(String::as_str).collect();
        let disable_set: HashSet<&str> = disable_rules.iter().map(String::as_str).collect();

        debug!("Initial rules count before filtering: {}", self.rules.len());

        let all_kinds: HashSet<&str> = self.rules.iter().map(|r| r.kind.as_str()).collect();

        for kind in enable_set.difference(&all_kinds) {
            warn!("Kind '{}' in `enable` list does not exist.", kind);
        }
        for kind in disable_set.difference(&all_kinds) {
            warn!("Kind '{}' in `disable` list does not exist.", kind);
        }

        self.rules.retain(|rule| {
            let kind = rule.kind.as_str();
            !disable_set.contains(kind)
                && (!rule.opt_in || enable_set.contains(kind) || rule.enabled == Some(true))
        });

        // Rules enabled by name are switched on even if the file disabled them.
        for rule in self.rules.iter_mut() {
            if enable_set.contains(rule.kind.as_str()) {
                rule.enabled = Some(true);
            }
        }

        debug!("Final active rules count after filtering: {}", self.rules.len());
    }

    /// Kinds flagged as dictionary-gated, in lexicon order.
    pub fn gated_kinds(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|r| r.dictionary_gated)
            .map(|r| r.kind.as_str())
            .collect()
    }
}

/// Merges a user configuration into the defaults.
///
/// A user rule replaces the default rule of the same kind at the default's
/// position; new kinds are appended in the order the user declared them.
/// User context rules are added (replacing same-word defaults) and any
/// redaction setting the user specifies wins.
pub fn merge_rules(default_config: ScrubConfig, user_config: Option<ScrubConfig>) -> ScrubConfig {
    debug!(
        "merge_rules called. Initial default rules count: {}",
        default_config.rules.len()
    );

    let Some(user_cfg) = user_config else {
        return default_config;
    };

    let mut rules = default_config.rules;
    debug!("User config provided. Merging {} user rules.", user_cfg.rules.len());
    for user_rule in user_cfg.rules {
        match rules.iter_mut().find(|r| r.kind == user_rule.kind) {
            Some(existing) => *existing = user_rule,
            None => rules.push(user_rule),
        }
    }

    let mut context_rules = default_config.context_rules;
    for user_rule in user_cfg.context_rules {
        match context_rules
            .iter_mut()
            .find(|r| r.word.eq_ignore_ascii_case(&user_rule.word))
        {
            Some(existing) => *existing = user_rule,
            None => context_rules.push(user_rule),
        }
    }

    let mut redaction = default_config.redaction;
    if let Some(mask_char) = user_cfg.redaction.mask_char {
        debug!("Overriding mask character with user value: {:?}", mask_char);
        redaction.mask_char = Some(mask_char);
    }
    if let Some(style) = user_cfg.redaction.mask_style {
        debug!("Overriding mask style with user value: {:?}", style);
        redaction.mask_style = Some(style);
    }

    debug!("Final total rules after merge: {}", rules.len());

    ScrubConfig {
        rules,
        context_rules,
        redaction,
    }
}

/// Validates rule integrity before compilation. All problems are collected
/// into one error so a user sees every broken rule at once.
fn validate_config(config: &ScrubConfig) -> Result<()> {
    let mut kinds = HashSet::new();
    let mut errors = Vec::new();

    for rule in &config.rules {
        if rule.kind.is_empty() {
            errors.push("A rule has an empty `kind` field.".to_string());
        } else if !kinds.insert(rule.kind.as_str()) {
            errors.push(format!("Duplicate kind found: '{}'.", rule.kind));
        }

        if rule.pattern.is_empty() {
            errors.push(format!("Rule '{}' has an empty `pattern` field.", rule.kind));
            continue;
        }

        if rule.pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(format!(
                "Rule '{}': pattern length ({}) exceeds maximum allowed ({}).",
                rule.kind,
                rule.pattern.len(),
                MAX_PATTERN_LENGTH
            ));
            continue;
        }

        if let Err(e) = Regex::new(&rule.pattern) {
            errors.push(format!("Rule '{}' has an invalid regex pattern: {}", rule.kind, e));
        }
    }

    let mut words = HashSet::new();
    for rule in &config.context_rules {
        let word = rule.word.trim();
        if word.is_empty() {
            errors.push("A context rule has an empty `word` field.".to_string());
        } else if word.chars().any(char::is_whitespace) {
            errors.push(format!("Context rule word '{}' must be a single word.", rule.word));
        } else if !words.insert(word.to_lowercase()) {
            errors.push(format!("Duplicate context rule for '{}'.", rule.word));
        }
    }

    if config.redaction.mask_char.is_some_and(char::is_whitespace) {
        errors.push("`mask_char` must not be whitespace.".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("Rule validation failed:\n{}", errors.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(kind: &str, pattern: &str) -> PatternRule {
        PatternRule {
            kind: kind.to_string(),
            pattern: pattern.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_rules_parse_in_order() {
        let config = ScrubConfig::load_default_rules().unwrap();
        let kinds: Vec<&str> = config.rules.iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(&kinds[..5], &["email", "phone", "date_of_birth", "national_id", "name"]);
        assert_eq!(config.gated_kinds(), vec!["name"]);
        assert!(config.context_rules.iter().any(|r| r.word == "private"));
        validate_config(&config).unwrap();
    }

    #[test]
    fn test_merge_keeps_default_position() {
        let defaults = ScrubConfig {
            rules: vec![rule("email", "a@b"), rule("phone", r"\d+")],
            ..Default::default()
        };
        let user = ScrubConfig {
            rules: vec![rule("badge", r"B\d{4}"), rule("email", r"\S+@\S+")],
            redaction: RedactionSettings {
                mask_char: Some('#'),
                mask_style: None,
            },
            ..Default::default()
        };
        let merged = merge_rules(defaults, Some(user));
        let kinds: Vec<&str> = merged.rules.iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(kinds, vec!["email", "phone", "badge"]);
        assert_eq!(merged.rules[0].pattern, r"\S+@\S+");
        assert_eq!(merged.redaction.mask_char(), '#');
        assert_eq!(merged.redaction.mask_style(), MaskStyle::Mask);
    }

    #[test]
    fn test_merge_replaces_context_rule_case_insensitively() {
        let defaults = ScrubConfig {
            context_rules: vec![ContextRule {
                word: "major".to_string(),
                relationship: NeighborRelationship::FollowedByName,
            }],
            ..Default::default()
        };
        let user = ScrubConfig {
            context_rules: vec![ContextRule {
                word: "Major".to_string(),
                relationship: NeighborRelationship::PrecededByName,
            }],
            ..Default::default()
        };
        let merged = merge_rules(defaults, Some(user));
        assert_eq!(merged.context_rules.len(), 1);
        assert_eq!(
            merged.context_rules[0].relationship,
            NeighborRelationship::PrecededByName
        );
    }

    #[test]
    fn test_set_active_rules_handles_opt_in() {
        let mut config = ScrubConfig {
            rules: vec![
                rule("email", "x"),
                PatternRule {
                    opt_in: true,
                    ..rule("credit_card", "y")
                },
                rule("phone", "z"),
            ],
            ..Default::default()
        };
        config.set_active_rules(&["credit_card".to_string()], &["phone".to_string()]);
        let kinds: Vec<&str> = config.rules.iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(kinds, vec!["email", "credit_card"]);
    }

    #[test]
    fn test_opt_in_enabled_in_file_survives_empty_enable_list() {
        let mut config = ScrubConfig {
            rules: vec![
                PatternRule {
                    opt_in: true,
                    enabled: Some(true),
                    ..rule("uk_nino", "a")
                },
                PatternRule {
                    opt_in: true,
                    ..rule("credit_card", "b")
                },
            ],
            ..Default::default()
        };
        config.set_active_rules(&[], &[]);
        let kinds: Vec<&str> = config.rules.iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(kinds, vec!["uk_nino"]);

        config.set_active_rules(&[], &["uk_nino".to_string()]);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_validation_collects_every_problem() {
        let yaml = r#"
rules:
  - kind: email
    pattern: "("
  - kind: email
    pattern: "x"
  - kind: empty
context_rules:
  - word: "two words"
"#;
        let err = ScrubConfig::from_yaml_str(yaml).unwrap_err().to_string();
        assert!(err.contains("invalid regex"), "{err}");
        assert!(err.contains("Duplicate kind"), "{err}");
        assert!(err.contains("empty `pattern`"), "{err}");
        assert!(err.contains("single word"), "{err}");
    }

    #[test]
    fn test_unknown_validator_is_rejected() {
        let yaml = r#"
rules:
  - kind: card
    pattern: "\\d+"
    validator: crc32
"#;
        assert!(ScrubConfig::from_yaml_str(yaml).is_err());
    }
}
