//! errors.rs - Custom error types for the piiscrub-core library.
//!
//! Two classes of failure exist. Configuration errors are raised while the
//! lexicon or context rules are being built and are fatal at startup.
//! `InvalidCandidate` is raised while evaluating a single document and aborts
//! only that document.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// All error types produced by the `piiscrub-core` library.
///
/// A pattern that simply does not match, a name missing from the dictionary,
/// or a detection dropped during overlap resolution is never an error.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScrubError {
    #[error("Failed to compile pattern for kind '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Kind '{0}': pattern can match an empty string")]
    EmptyMatchPattern(String),

    #[error("Kind '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Kind '{0}' is declared more than once in the lexicon")]
    DuplicateKind(String),

    #[error("Context rule for '{0}' is invalid: {1}")]
    InvalidContextRule(String, String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Candidate '{kind}' at {start}..{end} does not match the source text: {reason}")]
    InvalidCandidate {
        kind: String,
        start: usize,
        end: usize,
        reason: String,
    },

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),
}

impl ScrubError {
    /// True for errors raised while building the lexicon or context rules.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ScrubError::RuleCompilationError(..)
                | ScrubError::EmptyMatchPattern(_)
                | ScrubError::PatternLengthExceeded(..)
                | ScrubError::DuplicateKind(_)
                | ScrubError::InvalidContextRule(..)
                | ScrubError::Configuration(_)
        )
    }
}
