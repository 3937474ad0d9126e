//! Uniqueness validation: exactly one option, and it is the declared one
//!
//! The validator turns a [`RuleAnalysis`] into a [`Verdict`]. How hard a
//! disagreement hits depends on the analyzer's confidence: above
//! `hard_error_confidence` an ambiguous or contradicted item is invalid,
//! below it the problem is reported as a warning and the item is left
//! for a human to look at.

use crate::analyzers::RuleAnalysis;
use crate::question::Question;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence cut-offs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Thresholds {
    /// Above this, ambiguity or a wrong declared answer is an error
    pub hard_error_confidence: f64,
    /// Below this, a low-confidence warning is added
    pub low_confidence: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            hard_error_confidence: 0.8,
            low_confidence: 0.7,
        }
    }
}

/// Outcome of analyzing one question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// One option satisfies the rule and it is the declared answer
    Valid,
    /// Accepted with a warning (low-confidence disagreement, no declared answer)
    Provisional,
    /// The rule did not single out an option, but confidence is too low to reject
    Inconclusive,
    /// Ambiguous, unsolvable or contradicted at high confidence
    Invalid,
    /// No analyzer could verify the question
    Unverifiable,
}

impl Verdict {
    pub fn is_valid(self) -> bool {
        matches!(self, Verdict::Valid | Verdict::Provisional)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Valid => "valid",
            Verdict::Provisional => "provisional",
            Verdict::Inconclusive => "inconclusive",
            Verdict::Invalid => "invalid",
            Verdict::Unverifiable => "unverifiable",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict with the messages that justify it
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    pub verdict: Verdict,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Validation {
    fn new(verdict: Verdict) -> Self {
        Self {
            verdict,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn error(mut self, message: impl Into<String>) -> Self {
        self.errors.push(message.into());
        self
    }

    fn warning(mut self, message: impl Into<String>) -> Self {
        self.warnings.push(message.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
    thresholds: Thresholds,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn validate(&self, analysis: &RuleAnalysis, question: &Question) -> Validation {
        let hard = analysis.confidence > self.thresholds.hard_error_confidence;
        let matches = &analysis.valid_options;

        let mut validation = match matches.as_slice() {
            [] if hard => {
                Validation::new(Verdict::Invalid).error("No option satisfies the detected rule")
            }
            [] => Validation::new(Verdict::Inconclusive).warning(format!(
                "No option satisfies the detected rule (confidence {:.2})",
                analysis.confidence
            )),
            [only] => match question.correct_answer {
                Some(declared) if declared == *only => Validation::new(Verdict::Valid),
                Some(declared) if hard => Validation::new(Verdict::Invalid).error(format!(
                    "Declared answer ({}) differs from computed answer ({})",
                    declared, only
                )),
                Some(declared) => Validation::new(Verdict::Provisional).warning(format!(
                    "Possible inconsistency: declared answer ({}) differs from computed answer ({})",
                    declared, only
                )),
                None => Validation::new(Verdict::Provisional).warning(format!(
                    "No declared answer; computed answer is option {}",
                    only
                )),
            },
            many => {
                let listed = many
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                let message = format!(
                    "{} options satisfy the rule (1 expected): {}",
                    many.len(),
                    listed
                );
                if hard {
                    Validation::new(Verdict::Invalid).error(message)
                } else {
                    Validation::new(Verdict::Inconclusive).warning(message)
                }
            }
        };

        if analysis.confidence < self.thresholds.low_confidence {
            validation = validation.warning(format!(
                "Low rule confidence: {:.2}",
                analysis.confidence
            ));
        }
        validation
    }
}
