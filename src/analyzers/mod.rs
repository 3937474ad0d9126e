//! Rule analyzers, one per rule family
//!
//! Each analyzer extracts the terms its family needs from the question
//! text, checks that they really obey the family's rule, computes the
//! single expected next value and scans the options for it.
//!
//! Analyzers never guess: when the precondition of the family does not
//! hold they return a [`RuleError`], and the engine routes the question
//! to the [`fallback`] analyzer, which cannot validate anything.
//!
//! ```text
//! RuleType ──► analyzer_for() ──► RuleAnalyzer::analyze(question)
//!                                   │
//!                                   ├── Ok(RuleAnalysis)  ──► validator
//!                                   └── Err(RuleError)    ──► fallback
//! ```

pub mod analogy;
pub mod fallback;
pub mod grid;
pub mod logic;
pub mod numeric;
pub mod symbolic;

use crate::error::RuleError;
use crate::question::{option_number, OptionValue, Question, QuestionOption};
use crate::rule::RuleType;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub use fallback::{FallbackAnalyzer, StructureReport, Unverifiable};

/// Tolerance used when comparing computed values with option values
pub const NUMERIC_TOLERANCE: f64 = 1e-3;

static INTEGER_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?\b[0-9]+\b(?:\s*,\s*-?\b[0-9]+\b)+").expect("integer run pattern")
});

static DECIMAL_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?\b[0-9]+(?:\.[0-9]+)?\b(?:\s*,\s*-?\b[0-9]+(?:\.[0-9]+)?\b)+")
        .expect("decimal run pattern")
});

/// A rule family analyzer
pub trait RuleAnalyzer: Send + Sync {
    /// The family this analyzer verifies
    fn rule_type(&self) -> RuleType;

    /// Verify the family on `question` and find the options matching it
    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError>;
}

/// What an analyzer found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleAnalysis {
    pub rule_type: RuleType,
    /// Human readable rule description
    pub rule: String,
    /// Terms extracted from the question
    pub sequence: Vec<OptionValue>,
    pub expected_next: OptionValue,
    /// Indices of options equal to `expected_next`
    pub valid_options: Vec<usize>,
    /// The one matching option; `None` when zero or several match
    pub expected_answer: Option<usize>,
    /// How sure the analyzer is that the family applies (0.0-1.0)
    pub confidence: f64,
    /// Family specific facts (difference, ratio, relation, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}

impl RuleAnalysis {
    pub fn new(
        rule_type: RuleType,
        rule: impl Into<String>,
        expected_next: OptionValue,
        valid_options: Vec<usize>,
        confidence: f64,
    ) -> Self {
        let expected_answer = match valid_options.as_slice() {
            [only] => Some(*only),
            _ => None,
        };
        Self {
            rule_type,
            rule: rule.into(),
            sequence: Vec::new(),
            expected_next,
            valid_options,
            expected_answer,
            confidence,
            details: BTreeMap::new(),
        }
    }

    pub fn with_sequence(mut self, sequence: Vec<OptionValue>) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_detail(mut self, key: &str, value: impl ToString) -> Self {
        self.details.insert(key.to_string(), value.to_string());
        self
    }
}

/// Analyzer for a detected rule type; `None` for `unknown`
pub fn analyzer_for(rule_type: RuleType) -> Option<&'static dyn RuleAnalyzer> {
    let analyzer: &'static dyn RuleAnalyzer = match rule_type {
        RuleType::ArithmeticSequence => &numeric::Arithmetic,
        RuleType::GeometricSequence => &numeric::Geometric,
        RuleType::FibonacciSequence => &numeric::Fibonacci,
        RuleType::PowerSequence => &numeric::Power,
        RuleType::PrimeSequence => &numeric::Prime,
        RuleType::PolynomialSequence => &numeric::Polynomial,
        RuleType::FactorialSequence => &numeric::Factorial,
        RuleType::ScalingPattern => &numeric::Scaling,
        RuleType::LetterProgression => &symbolic::LetterProgression,
        RuleType::SymbolAlternation => &symbolic::Alternation,
        RuleType::RotationPattern => &symbolic::Rotation,
        RuleType::ReflectionPattern => &symbolic::Reflection,
        RuleType::MatrixPattern => &grid::Matrix,
        RuleType::GridCompletion => &grid::GridCompletion,
        RuleType::AnalogyPattern => &analogy::Analogy,
        RuleType::LogicalImplication => &logic::Implication,
        RuleType::SetTheory => &logic::SetTheory,
        RuleType::Unknown => return None,
    };
    Some(analyzer)
}

/// Run the analyzer of `rule_type`, rejecting questions without options
pub fn run(rule_type: RuleType, question: &Question) -> Result<RuleAnalysis, RuleError> {
    let analyzer = analyzer_for(rule_type)
        .ok_or_else(|| RuleError::extraction(rule_type, "no analyzer for this rule type"))?;
    if question.options.is_empty() {
        return Err(RuleError::extraction(rule_type, "question has no options"));
    }
    analyzer.analyze(question)
}

// ─────────────────────────────────────────────────────────────────────────
// Shared extraction helpers
// ─────────────────────────────────────────────────────────────────────────

/// Every run of comma separated integers in `text`, in order
pub(crate) fn integer_runs(text: &str) -> Vec<Vec<i64>> {
    INTEGER_RUN
        .find_iter(text)
        .filter_map(|m| {
            m.as_str()
                .split(',')
                .map(|t| t.trim().parse::<i64>().ok())
                .collect::<Option<Vec<_>>>()
        })
        .collect()
}

/// First run of at least `min_len` integers
pub(crate) fn first_integer_run(text: &str, min_len: usize) -> Option<Vec<i64>> {
    integer_runs(text).into_iter().find(|run| run.len() >= min_len)
}

/// First run of at least `min_len` decimals (`.` separator only)
pub(crate) fn first_decimal_run(text: &str, min_len: usize) -> Option<Vec<f64>> {
    DECIMAL_RUN
        .find_iter(text)
        .filter_map(|m| {
            m.as_str()
                .split(',')
                .map(|t| t.trim().parse::<f64>().ok())
                .collect::<Option<Vec<_>>>()
        })
        .find(|run| run.len() >= min_len)
}

/// Consecutive differences; `None` on overflow
pub(crate) fn differences(terms: &[i64]) -> Option<Vec<i64>> {
    terms.windows(2).map(|w| w[1].checked_sub(w[0])).collect()
}

pub(crate) fn integers(terms: &[i64]) -> Vec<OptionValue> {
    terms.iter().map(|t| OptionValue::integer(*t)).collect()
}

pub(crate) fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Indices of options accepted by `predicate`
pub(crate) fn matching_options<F>(question: &Question, predicate: F) -> Vec<usize>
where
    F: Fn(&QuestionOption) -> bool,
{
    question
        .options
        .iter()
        .enumerate()
        .filter(|(_, option)| predicate(option))
        .map(|(i, _)| i)
        .collect()
}

/// Indices of options whose first embedded integer equals `expected`
pub(crate) fn options_equal_to(question: &Question, expected: f64) -> Vec<usize> {
    matching_options(question, |option| {
        option_number(&option.text).is_some_and(|v| (v - expected).abs() < NUMERIC_TOLERANCE)
    })
}

/// Indices of options whose trimmed text is exactly `expected`
pub(crate) fn options_with_text(question: &Question, expected: &str) -> Vec<usize> {
    matching_options(question, |option| option.text.trim() == expected)
}

/// Truth value written as a word or digit (French and English)
pub(crate) fn truth_value(text: &str) -> Option<bool> {
    match text.trim().trim_end_matches('.').to_lowercase().as_str() {
        "vrai" | "true" | "v" | "t" | "1" | "oui" | "yes" => Some(true),
        "faux" | "false" | "f" | "0" | "non" | "no" => Some(false),
        _ => None,
    }
}

pub(crate) fn truth_word(value: bool) -> &'static str {
    if value {
        "vrai"
    } else {
        "faux"
    }
}
