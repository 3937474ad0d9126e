//! Fallback for questions no analyzer can verify
//!
//! The fallback never produces a [`RuleAnalysis`](super::RuleAnalysis):
//! its only output is [`Unverifiable`], which has no success state and
//! which the validator does not accept. A question that reaches this
//! path always ends up invalid, with a structural diagnostic attached.

use crate::error::RuleError;
use crate::question::Question;
use crate::rule::RuleType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a question, reported for manual review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StructureReport {
    pub has_options: bool,
    pub option_count: usize,
    /// At least one option is flagged `isCorrect`
    pub has_correct_flag: bool,
    pub has_content: bool,
}

impl StructureReport {
    pub fn of(question: &Question) -> Self {
        Self {
            has_options: !question.options.is_empty(),
            option_count: question.options.len(),
            has_correct_flag: question.options.iter().any(|o| o.is_correct),
            has_content: !question.content.trim().is_empty(),
        }
    }
}

impl fmt::Display for StructureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "options: {}, correct flag: {}, content: {}",
            self.option_count,
            if self.has_correct_flag { "yes" } else { "no" },
            if self.has_content { "yes" } else { "no" }
        )
    }
}

/// Terminal state of the fallback: the question cannot be verified
#[derive(Debug, Clone, PartialEq)]
pub struct Unverifiable {
    rule_type: RuleType,
    reason: Option<RuleError>,
    structure: StructureReport,
}

impl Unverifiable {
    pub fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    /// The analyzer error that led here, `None` when no rule was recognized
    pub fn reason(&self) -> Option<&RuleError> {
        self.reason.as_ref()
    }

    pub fn structure(&self) -> &StructureReport {
        &self.structure
    }

    /// First error line of the analysis
    pub fn message(&self) -> String {
        match &self.reason {
            Some(err) => format!("Analysis error: {}", err),
            None => format!("Pattern not recognized ({})", self.structure),
        }
    }
}

impl fmt::Display for Unverifiable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}; manual review required [{}]",
            self.message(),
            self.structure
        )
    }
}

/// Reports structure and refuses to validate
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackAnalyzer;

impl FallbackAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(
        &self,
        question: &Question,
        rule_type: RuleType,
        reason: Option<RuleError>,
    ) -> Unverifiable {
        Unverifiable {
            rule_type,
            reason,
            structure: StructureReport::of(question),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_structure_report() {
        let q = Question::new("  ")
            .with_options(["a", "b", "c"])
            .with_correct_answer(1);
        let report = StructureReport::of(&q);
        assert_eq!(
            report,
            StructureReport {
                has_options: true,
                option_count: 3,
                has_correct_flag: true,
                has_content: false,
            }
        );
    }

    #[test]
    fn test_unrecognized_message() {
        let q = Question::new("Quelle figure complète la série ?").with_options(["A", "B"]);
        let out = FallbackAnalyzer::new().analyze(&q, RuleType::Unknown, None);
        assert_eq!(out.rule_type(), RuleType::Unknown);
        assert!(out.reason().is_none());
        assert_eq!(
            out.message(),
            "Pattern not recognized (options: 2, correct flag: no, content: yes)"
        );
        assert!(out.to_string().contains("manual review required"));
    }

    #[test]
    fn test_analysis_error_message() {
        let err = RuleError::mismatch(RuleType::GeometricSequence, "division by zero");
        let q = Question::new("0, 2, 4, 8, ?").with_options(["16"]);
        let out = FallbackAnalyzer::new().analyze(&q, RuleType::GeometricSequence, Some(err));
        assert_eq!(
            out.message(),
            "Analysis error: geometric_sequence: pattern does not hold (division by zero)"
        );
    }
}
