//! Error types for ravencheck

use crate::rule::RuleType;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level errors (configuration, input files, CLI)
#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

/// Why a rule analyzer could not verify its claimed family.
///
/// Both variants are recovered by the engine, which routes the question
/// to the fallback analyzer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// Nothing usable could be parsed out of the text for this family.
    #[error("{rule}: nothing to analyze ({detail})")]
    Extraction { rule: RuleType, detail: String },

    /// Terms were found but they do not obey the family's rule.
    #[error("{rule}: pattern does not hold ({detail})")]
    PatternMismatch { rule: RuleType, detail: String },
}

impl RuleError {
    pub fn extraction(rule: RuleType, detail: impl Into<String>) -> Self {
        RuleError::Extraction {
            rule,
            detail: detail.into(),
        }
    }

    pub fn mismatch(rule: RuleType, detail: impl Into<String>) -> Self {
        RuleError::PatternMismatch {
            rule,
            detail: detail.into(),
        }
    }

    pub fn rule(&self) -> RuleType {
        match self {
            RuleError::Extraction { rule, .. } | RuleError::PatternMismatch { rule, .. } => *rule,
        }
    }
}
