//! Rule families recognized by the detector

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag naming the generative rule behind a question
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    ArithmeticSequence,
    GeometricSequence,
    FibonacciSequence,
    PowerSequence,
    PrimeSequence,
    PolynomialSequence,
    FactorialSequence,
    LetterProgression,
    SymbolAlternation,
    RotationPattern,
    ReflectionPattern,
    ScalingPattern,
    MatrixPattern,
    GridCompletion,
    AnalogyPattern,
    LogicalImplication,
    SetTheory,
    Unknown,
}

impl RuleType {
    pub const ALL: [RuleType; 18] = [
        RuleType::ArithmeticSequence,
        RuleType::GeometricSequence,
        RuleType::FibonacciSequence,
        RuleType::PowerSequence,
        RuleType::PrimeSequence,
        RuleType::PolynomialSequence,
        RuleType::FactorialSequence,
        RuleType::LetterProgression,
        RuleType::SymbolAlternation,
        RuleType::RotationPattern,
        RuleType::ReflectionPattern,
        RuleType::ScalingPattern,
        RuleType::MatrixPattern,
        RuleType::GridCompletion,
        RuleType::AnalogyPattern,
        RuleType::LogicalImplication,
        RuleType::SetTheory,
        RuleType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::ArithmeticSequence => "arithmetic_sequence",
            RuleType::GeometricSequence => "geometric_sequence",
            RuleType::FibonacciSequence => "fibonacci_sequence",
            RuleType::PowerSequence => "power_sequence",
            RuleType::PrimeSequence => "prime_sequence",
            RuleType::PolynomialSequence => "polynomial_sequence",
            RuleType::FactorialSequence => "factorial_sequence",
            RuleType::LetterProgression => "letter_progression",
            RuleType::SymbolAlternation => "symbol_alternation",
            RuleType::RotationPattern => "rotation_pattern",
            RuleType::ReflectionPattern => "reflection_pattern",
            RuleType::ScalingPattern => "scaling_pattern",
            RuleType::MatrixPattern => "matrix_pattern",
            RuleType::GridCompletion => "grid_completion",
            RuleType::AnalogyPattern => "analogy_pattern",
            RuleType::LogicalImplication => "logical_implication",
            RuleType::SetTheory => "set_theory",
            RuleType::Unknown => "unknown",
        }
    }

    /// Whether this tag names an actual rule family
    pub fn is_known(&self) -> bool {
        !matches!(self, RuleType::Unknown)
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleType::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("Unknown rule type: {}", s))
    }
}
