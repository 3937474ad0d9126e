//! Pattern detection: which rule family does a question claim?
//!
//! The detector is an ordered table of [`DetectionRule`]s evaluated top to
//! bottom on the lower-cased question text. The first rule whose predicate
//! holds decides the [`RuleType`]; when nothing matches the result is
//! [`RuleType::Unknown`]. Named sequences come before generic numeric
//! shapes, so `1, 1, 2, 3, 5` is Fibonacci and not arithmetic-looking noise.
//!
//! The table is built once and only read afterwards, which makes a
//! `Detector` safe to share between threads.

use crate::analyzers::first_integer_run;
use crate::question::Question;
use crate::rule::RuleType;
use regex::Regex;

/// Condition a detection rule checks against lower-cased text
#[derive(Debug, Clone)]
pub enum Predicate {
    /// At least one pattern matches
    Any(Vec<Regex>),
    /// Every pattern matches
    All(Vec<Regex>),
    /// First run of four integers grows by a near constant ratio above 1.5
    GeometricRatio,
}

impl Predicate {
    fn any(patterns: &[&str]) -> Self {
        Predicate::Any(compile(patterns))
    }

    fn all(patterns: &[&str]) -> Self {
        Predicate::All(compile(patterns))
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Predicate::Any(res) => res.iter().any(|re| re.is_match(text)),
            Predicate::All(res) => res.iter().all(|re| re.is_match(text)),
            Predicate::GeometricRatio => growing_ratio(text),
        }
    }
}

// Patterns are literals of this module; a failure is a programming error.
fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("detection pattern"))
        .collect()
}

fn growing_ratio(text: &str) -> bool {
    let Some(run) = first_integer_run(text, 4) else {
        return false;
    };
    let (a, b, c) = (run[0] as f64, run[1] as f64, run[2] as f64);
    if a == 0.0 || b == 0.0 {
        return false;
    }
    let (r1, r2) = (b / a, c / b);
    (r1 - r2).abs() < 0.1 && r1 > 1.5
}

/// One row of the detection table
#[derive(Debug, Clone)]
pub struct DetectionRule {
    pub name: &'static str,
    pub rule_type: RuleType,
    pub predicate: Predicate,
}

impl DetectionRule {
    fn new(name: &'static str, rule_type: RuleType, predicate: Predicate) -> Self {
        Self {
            name,
            rule_type,
            predicate,
        }
    }
}

/// Ordered, first-match-wins rule detector
#[derive(Debug, Clone)]
pub struct Detector {
    rules: Vec<DetectionRule>,
}

impl Default for Detector {
    fn default() -> Self {
        Self::standard()
    }
}

impl Detector {
    /// The standard table
    pub fn standard() -> Self {
        use Predicate as P;
        use RuleType as R;

        let rules = vec![
            DetectionRule::new(
                "fibonacci",
                R::FibonacciSequence,
                P::any(&[r"fibonacci|1,\s*1,\s*2,\s*3,\s*5"]),
            ),
            DetectionRule::new(
                "prime",
                R::PrimeSequence,
                P::any(&[r"prime|nombres premiers|2,\s*3,\s*5,\s*7,\s*11"]),
            ),
            DetectionRule::new(
                "catalan",
                R::PolynomialSequence,
                P::any(&[r"catalan|1,\s*1,\s*2,\s*5,\s*14"]),
            ),
            DetectionRule::new(
                "bell",
                R::PolynomialSequence,
                P::any(&[r"bell|1,\s*1,\s*2,\s*5,\s*15"]),
            ),
            DetectionRule::new(
                "motzkin",
                R::PolynomialSequence,
                P::any(&[r"motzkin|1,\s*1,\s*2,\s*4,\s*9"]),
            ),
            DetectionRule::new(
                "squares",
                R::PolynomialSequence,
                P::any(&[r"carrés|squares|1,\s*4,\s*9,\s*16"]),
            ),
            DetectionRule::new(
                "factorial",
                R::FactorialSequence,
                P::any(&[r"factori|n!|\d+!"]),
            ),
            DetectionRule::new(
                "power",
                R::PowerSequence,
                P::any(&[r"x\^|x²|x³|x⁴|\d+\^\d+"]),
            ),
            // a bare → only counts between two variables, arrow glyph runs stay rotations
            DetectionRule::new(
                "logic_symbols",
                R::LogicalImplication,
                P::any(&[
                    r"[∧∨¬]|&|\||!|implies",
                    r"\b[a-z]\s*(?:→|->|=>)\s*¬?[a-z]\b",
                ]),
            ),
            DetectionRule::new(
                "logic_words",
                R::LogicalImplication,
                P::any(&[r"si .*alors|if .*then|p→q"]),
            ),
            DetectionRule::new(
                "analogy",
                R::AnalogyPattern,
                P::any(&[r"est à.*comme|is to.*as|analogi"]),
            ),
            DetectionRule::new(
                "sets",
                R::SetTheory,
                P::any(&[r"ensemble|union|intersection|∪|∩|⊆"]),
            ),
            DetectionRule::new(
                "rotation",
                R::RotationPattern,
                P::any(&[
                    r"rotation|tourne|rotate|°|[◐◑◒◓]",
                    r"[→↓←↑➡⬇⬅⬆]\s*,?\s*[→↓←↑➡⬇⬅⬆]",
                ]),
            ),
            DetectionRule::new(
                "reflection",
                R::ReflectionPattern,
                P::any(&[r"réflexion|miroir|symétrie|reflection|mirror"]),
            ),
            DetectionRule::new(
                "scaling",
                R::ScalingPattern,
                P::any(&[r"échelle|scale|taille|size"]),
            ),
            DetectionRule::new(
                "grid",
                R::GridCompletion,
                P::all(&[r"complét|missing|manquant|\?", r"grid|grille"]),
            ),
            DetectionRule::new(
                "matrix",
                R::MatrixPattern,
                P::any(&[r"matrice|matrix|\d+x\d+"]),
            ),
            DetectionRule::new(
                "letters",
                R::LetterProgression,
                P::any(&[r"alphabet|lettre|\b[a-z],\s*[a-z],\s*[a-z]\b"]),
            ),
            DetectionRule::new(
                "alternation",
                R::SymbolAlternation,
                P::any(&[r"[★☆](?:\s*[★☆])+|[●○](?:\s*[●○])+|[■□](?:\s*[■□])+|[◼◻](?:\s*[◼◻])+"]),
            ),
            DetectionRule::new(
                "geometric_words",
                R::GeometricSequence,
                P::any(&[r"géométrique|×|\*|ratio"]),
            ),
            DetectionRule::new("geometric_ratio", R::GeometricSequence, P::GeometricRatio),
            DetectionRule::new(
                "arithmetic",
                R::ArithmeticSequence,
                P::any(&[r"\b\d+,\s*\d+,\s*\d+,\s*\d+"]),
            ),
        ];

        Self { rules }
    }

    /// Drop every rule tagging one of `disabled`
    pub fn with_disabled(mut self, disabled: &[RuleType]) -> Self {
        self.rules.retain(|r| !disabled.contains(&r.rule_type));
        self
    }

    /// The table, in evaluation order
    pub fn rules(&self) -> &[DetectionRule] {
        &self.rules
    }

    pub fn detect(&self, question: &Question) -> RuleType {
        self.detect_text(&question.full_text())
    }

    pub fn detect_text(&self, text: &str) -> RuleType {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.predicate.matches(&lower))
            .map_or(RuleType::Unknown, |r| r.rule_type)
    }

    /// Every rule that matches, in order; the first one wins
    pub fn explain(&self, text: &str) -> Vec<&DetectionRule> {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .filter(|r| r.predicate.matches(&lower))
            .collect()
    }
}
