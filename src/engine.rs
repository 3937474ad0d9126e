//! The analysis pipeline: detect → analyze → validate
//!
//! ```text
//! Question ──► Detector ──► RuleType
//!                              │
//!                              ▼
//!                   analyzers::run(rule, q) ── Err ──► FallbackAnalyzer
//!                              │ Ok                          │
//!                              ▼                             ▼
//!                          Validator                   Unverifiable
//!                              │                             │
//!                              └──────► QuestionAnalysis ◄───┘
//! ```
//!
//! This is the only place where analyzer errors are recovered. Any error
//! ends in the fallback, whose result can never be valid.

use crate::analyzers::{self, FallbackAnalyzer, RuleAnalysis, StructureReport, Unverifiable};
use crate::config::EngineConfig;
use crate::detect::Detector;
use crate::question::{OptionValue, Question};
use crate::rule::RuleType;
use crate::validate::{Validator, Verdict};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Second error line of every unverifiable question
pub const MANUAL_REVIEW: &str = "Manual review required: pattern could not be verified";

/// Analyze one question with the default engine
pub fn analyze(question: &Question) -> QuestionAnalysis {
    Engine::default().analyze(question)
}

/// Result of analyzing one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    /// Hash of the analyzed input
    pub fingerprint: String,
    pub rule_type: RuleType,
    /// `true` iff the verdict is valid or provisional
    pub valid: bool,
    pub verdict: Verdict,
    pub valid_options: Vec<usize>,
    pub expected_answer: Option<usize>,
    pub expected_next: Option<OptionValue>,
    pub confidence: f64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Analyzer output, absent for unverifiable questions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<RuleAnalysis>,
    /// Question shape, present for unverifiable questions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<StructureReport>,
}

/// Detector, analyzers and validator behind one configuration
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    detector: Detector,
    validator: Validator,
    fallback: FallbackAnalyzer,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let detector = Detector::standard().with_disabled(&config.detector.disabled);
        let validator = Validator::with_thresholds(config.thresholds);
        Self {
            config,
            detector,
            validator,
            fallback: FallbackAnalyzer::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    /// Detect the rule family, then analyze under it
    #[instrument(level = "debug", skip_all, fields(qid = question.qid.as_deref().unwrap_or("-")))]
    pub fn analyze(&self, question: &Question) -> QuestionAnalysis {
        let rule_type = self.detector.detect(question);
        debug!(%rule_type, "detected rule");
        self.analyze_rule(question, rule_type)
    }

    /// Analyze under a given rule family, skipping detection
    pub fn analyze_rule(&self, question: &Question, rule_type: RuleType) -> QuestionAnalysis {
        let mut result = if rule_type.is_known() {
            match analyzers::run(rule_type, question) {
                Ok(analysis) => self.validated(question, analysis),
                Err(err) => {
                    warn!(%rule_type, error = %err, "analyzer failed, falling back");
                    self.unverifiable(
                        question,
                        self.fallback.analyze(question, rule_type, Some(err)),
                    )
                }
            }
        } else {
            debug!("no rule recognized, falling back");
            self.unverifiable(question, self.fallback.analyze(question, rule_type, None))
        };

        result.warnings.extend(self.structural_warnings(question));
        debug!(verdict = %result.verdict, valid = result.valid, "analysis done");
        result
    }

    fn validated(&self, question: &Question, analysis: RuleAnalysis) -> QuestionAnalysis {
        let validation = self.validator.validate(&analysis, question);
        QuestionAnalysis {
            question_id: question.qid.clone(),
            fingerprint: question.fingerprint(),
            rule_type: analysis.rule_type,
            valid: validation.verdict.is_valid(),
            verdict: validation.verdict,
            valid_options: analysis.valid_options.clone(),
            expected_answer: analysis.expected_answer,
            expected_next: Some(analysis.expected_next.clone()),
            confidence: analysis.confidence,
            errors: validation.errors,
            warnings: validation.warnings,
            analysis: Some(analysis),
            structure: None,
        }
    }

    fn unverifiable(&self, question: &Question, outcome: Unverifiable) -> QuestionAnalysis {
        let mut warnings = Vec::new();
        if !outcome.rule_type().is_known() {
            warnings.push("Pattern not recognized automatically".to_string());
        }
        QuestionAnalysis {
            question_id: question.qid.clone(),
            fingerprint: question.fingerprint(),
            rule_type: outcome.rule_type(),
            valid: false,
            verdict: Verdict::Unverifiable,
            valid_options: Vec::new(),
            expected_answer: None,
            expected_next: None,
            confidence: 0.0,
            errors: vec![outcome.message(), MANUAL_REVIEW.to_string()],
            warnings,
            analysis: None,
            structure: Some(*outcome.structure()),
        }
    }

    fn structural_warnings(&self, question: &Question) -> Vec<String> {
        let mut warnings = Vec::new();
        let count = question.options.len();
        let limits = &self.config.structure;

        if count < limits.min_options || count > limits.max_options {
            warnings.push(format!(
                "Unusual option count: {} (expected {} to {})",
                count, limits.min_options, limits.max_options
            ));
        }

        if let Some(declared) = question.correct_answer {
            if declared >= count {
                warnings.push(format!(
                    "Declared answer {} is out of range ({} options)",
                    declared, count
                ));
            }
        }

        let flagged = question.flagged_correct();
        let declared: Vec<usize> = question.correct_answer.into_iter().collect();
        if !flagged.is_empty() && flagged != declared {
            warnings.push(format!(
                "isCorrect flags {:?} disagree with correctAnswer {:?}",
                flagged, question.correct_answer
            ));
        }

        warnings
    }
}

impl QuestionAnalysis {
    pub fn to_report(&self) -> String {
        let mut out = String::new();

        let status = match self.verdict {
            Verdict::Valid => "✓ VALID",
            Verdict::Provisional => "✓ PROVISIONAL",
            Verdict::Inconclusive => "? INCONCLUSIVE",
            Verdict::Invalid => "✗ INVALID",
            Verdict::Unverifiable => "✗ UNVERIFIABLE",
        };
        out.push_str(&format!(
            "{} [{}] {}\n",
            self.question_id.as_deref().unwrap_or("(no id)"),
            self.rule_type,
            status
        ));

        if let Some(analysis) = &self.analysis {
            out.push_str(&format!(
                "  Rule: {} (confidence {:.2})\n",
                analysis.rule, self.confidence
            ));
        }
        if let Some(next) = &self.expected_next {
            out.push_str(&format!("  Expected: {}\n", next));
        }
        if !self.valid_options.is_empty() {
            out.push_str(&format!("  Matching options: {:?}\n", self.valid_options));
        }

        for error in &self.errors {
            out.push_str(&format!("  error: {}\n", error));
        }
        for warning in &self.warnings {
            out.push_str(&format!("  warning: {}\n", warning));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn arithmetic(correct: usize) -> Question {
        Question::new("Suite: 1, 4, 7, 10, ?")
            .with_qid("Q1")
            .with_options(["11", "12", "13", "14"])
            .with_correct_answer(correct)
    }

    #[test]
    fn test_valid_question() {
        let result = analyze(&arithmetic(2));
        assert_eq!(result.rule_type, RuleType::ArithmeticSequence);
        assert_eq!(result.verdict, Verdict::Valid);
        assert!(result.valid);
        assert_eq!(result.valid_options, vec![2]);
        assert_eq!(result.expected_next, Some(OptionValue::Number(13.0)));
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_wrong_declared_answer() {
        let result = analyze(&arithmetic(1));
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec!["Declared answer (1) differs from computed answer (2)".to_string()]
        );
    }

    #[test]
    fn test_unknown_goes_to_fallback() {
        let q = Question::new("Quelle figure complète la série ?")
            .with_options(["A", "B", "C", "D"])
            .with_correct_answer(0);
        let result = analyze(&q);
        assert_eq!(result.rule_type, RuleType::Unknown);
        assert_eq!(result.verdict, Verdict::Unverifiable);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[1], MANUAL_REVIEW);
        assert_eq!(result.structure.map(|s| s.option_count), Some(4));
    }

    #[test]
    fn test_analyzer_error_goes_to_fallback() {
        let q = Question::new("Suite géométrique: 0, 2, 4, 8, ?")
            .with_options(["16", "12", "10", "8"])
            .with_correct_answer(0);
        let result = analyze(&q);
        assert_eq!(result.rule_type, RuleType::GeometricSequence);
        assert_eq!(result.verdict, Verdict::Unverifiable);
        assert!(result.errors[0].contains("division by zero"));
    }

    #[test]
    fn test_forced_rule() {
        let result = Engine::default().analyze_rule(&arithmetic(2), RuleType::FibonacciSequence);
        assert_eq!(result.verdict, Verdict::Unverifiable);
        assert_eq!(result.rule_type, RuleType::FibonacciSequence);
    }

    #[test]
    fn test_structural_warnings() {
        let mut q = Question::new("Suite: 1, 4, 7, 10, ?").with_options(["11", "13", "14"]);
        q.correct_answer = Some(5);
        q.options[0].is_correct = true;
        let result = analyze(&q);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.starts_with("Unusual option count: 3")));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("out of range")));
        assert!(result.warnings.iter().any(|w| w.contains("isCorrect flags")));
    }

    #[test]
    fn test_report_lines() {
        let report = analyze(&arithmetic(2)).to_report();
        assert!(report.starts_with("Q1 [arithmetic_sequence] ✓ VALID"));
        assert!(report.contains("Expected: 13"));
    }
}
