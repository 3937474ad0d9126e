//! Propositional logic and finite sets
//!
//! Formulas are parsed by recursive descent with the usual precedence
//! (`¬` binds tightest, then `∧`, then `∨`/`⊕`, then `→`, which is right
//! associative) and evaluated under the assignments stated in the text.

use super::*;
use std::collections::{BTreeSet, HashMap};

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z])\s*=\s*(vrai|faux|true|false|v|f|1|0)\b").expect("assignment pattern")
});

static FORMULA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[(¬!\s]*\b[a-z]\b(?:[\s)]*(?:∧|∨|→|⊕|&&|&|\|\||\||->|=>)[\s(¬!]*\b[a-z]\b)+\)*",
    )
    .expect("formula pattern")
});

static CONDITIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:si|if)\s+(.+?)\s*,?\s+(?:alors|then)\s+(.+?)\s*[.;!?]")
        .expect("conditional pattern")
});

static NAMED_SET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z])\s*=\s*\{([^{}]*)\}").expect("named set pattern")
});

static SET_SYMBOL_OP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z])\s*(∪|∩|\\|−|-|⊆)\s*([A-Z])\b").expect("set operation pattern")
});

static SET_WORD_OP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i:(union|intersection|différence|difference))\s+(?:(?i:de|of|entre|between)\s+)?\b([A-Z])\b\s+(?i:et|and)\s+\b([A-Z])\b",
    )
    .expect("set word pattern")
});

// ─────────────────────────────────────────────────────────────────────────
// Propositional formulas
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Var(char),
    Not,
    And,
    Or,
    Xor,
    Implies,
    Open,
    Close,
}

/// Formulas longer or deeper than this are refused rather than parsed
const MAX_TOKENS: usize = 256;
const MAX_DEPTH: usize = 64;

fn tokenize(formula: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = formula.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        let (token, width) = match (c, next) {
            (c, _) if c.is_whitespace() => {
                i += 1;
                continue;
            }
            ('&', Some('&')) => (Token::And, 2),
            ('|', Some('|')) => (Token::Or, 2),
            ('-', Some('>')) | ('=', Some('>')) => (Token::Implies, 2),
            ('¬', _) | ('!', _) => (Token::Not, 1),
            ('∧', _) | ('&', _) => (Token::And, 1),
            ('∨', _) | ('|', _) => (Token::Or, 1),
            ('⊕', _) => (Token::Xor, 1),
            ('→', _) => (Token::Implies, 1),
            ('(', _) => (Token::Open, 1),
            (')', _) => (Token::Close, 1),
            (c, _) if c.is_ascii_alphabetic() => (Token::Var(c.to_ascii_lowercase()), 1),
            _ => return None,
        };
        tokens.push(token);
        if tokens.len() > MAX_TOKENS {
            return None;
        }
        i += width;
    }
    Some(tokens)
}

#[derive(Debug, Clone, PartialEq)]
enum Formula {
    Var(char),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Xor(Box<Formula>, Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn parse(formula: &str) -> Option<Formula> {
        let mut parser = Parser {
            tokens: tokenize(formula)?,
            pos: 0,
            depth: 0,
        };
        let parsed = parser.implication()?;
        (parser.pos == parser.tokens.len()).then_some(parsed)
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn eat(&mut self, token: Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn nested(&mut self, rule: fn(&mut Self) -> Option<Formula>) -> Option<Formula> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let parsed = rule(self);
        self.depth -= 1;
        parsed
    }

    fn implication(&mut self) -> Option<Formula> {
        let left = self.disjunction()?;
        if self.eat(Token::Implies) {
            let right = self.nested(Self::implication)?;
            return Some(Formula::Implies(Box::new(left), Box::new(right)));
        }
        Some(left)
    }

    fn disjunction(&mut self) -> Option<Formula> {
        let mut left = self.conjunction()?;
        loop {
            if self.eat(Token::Or) {
                left = Formula::Or(Box::new(left), Box::new(self.conjunction()?));
            } else if self.eat(Token::Xor) {
                left = Formula::Xor(Box::new(left), Box::new(self.conjunction()?));
            } else {
                return Some(left);
            }
        }
    }

    fn conjunction(&mut self) -> Option<Formula> {
        let mut left = self.negation()?;
        while self.eat(Token::And) {
            left = Formula::And(Box::new(left), Box::new(self.negation()?));
        }
        Some(left)
    }

    fn negation(&mut self) -> Option<Formula> {
        if self.eat(Token::Not) {
            return Some(Formula::Not(Box::new(self.nested(Self::negation)?)));
        }
        match self.peek()? {
            Token::Var(v) => {
                self.pos += 1;
                Some(Formula::Var(v))
            }
            Token::Open => {
                self.pos += 1;
                let inner = self.nested(Self::implication)?;
                self.eat(Token::Close).then_some(inner)
            }
            _ => None,
        }
    }
}

impl Formula {
    /// Evaluate, or return the first variable without a value
    fn eval(&self, values: &HashMap<char, bool>) -> Result<bool, char> {
        Ok(match self {
            Formula::Var(v) => *values.get(v).ok_or(*v)?,
            Formula::Not(f) => !f.eval(values)?,
            Formula::And(a, b) => a.eval(values)? && b.eval(values)?,
            Formula::Or(a, b) => a.eval(values)? || b.eval(values)?,
            Formula::Xor(a, b) => a.eval(values)? != b.eval(values)?,
            Formula::Implies(a, b) => !a.eval(values)? || b.eval(values)?,
        })
    }
}

/// Propositional formulas, and modus ponens over plain sentences
pub struct Implication;

impl Implication {
    fn evaluate(&self, question: &Question, text: &str) -> Option<Result<RuleAnalysis, RuleError>> {
        let rule = self.rule_type();
        let values: HashMap<char, bool> = ASSIGNMENT
            .captures_iter(text)
            .filter_map(|c| {
                let var = c[1].chars().next()?.to_ascii_lowercase();
                Some((var, truth_value(&c[2])?))
            })
            .collect();
        if values.is_empty() {
            return None;
        }

        let formula_text = FORMULA
            .find_iter(text)
            .map(|m| m.as_str().trim())
            .max_by_key(|m| m.chars().count())?;
        let formula = match Parser::parse(formula_text) {
            Some(f) => f,
            None => {
                return Some(Err(RuleError::extraction(
                    rule,
                    format!("cannot parse formula '{}'", formula_text),
                )))
            }
        };

        Some(match formula.eval(&values) {
            Ok(result) => {
                let valid = matching_options(question, |o| truth_value(&o.text) == Some(result));
                let mut assigned: Vec<_> = values.iter().collect();
                assigned.sort();
                let assignment = assigned
                    .iter()
                    .map(|(v, b)| format!("{}={}", v, truth_word(**b)))
                    .collect::<Vec<_>>()
                    .join(", ");
                Ok(RuleAnalysis::new(
                    rule,
                    "Propositional formula evaluation",
                    OptionValue::Symbol(truth_word(result).to_string()),
                    valid,
                    0.85,
                )
                .with_detail("formula", formula_text)
                .with_detail("assignment", assignment))
            }
            Err(var) => Err(RuleError::extraction(
                rule,
                format!("no truth value given for '{}'", var),
            )),
        })
    }

    /// `si P, alors Q.` followed by `P.` concludes `Q`
    fn modus_ponens(&self, question: &Question, text: &str) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let caps = CONDITIONAL.captures(text).ok_or_else(|| {
            RuleError::extraction(rule, "no formula with assignments and no 'si ... alors'")
        })?;
        let premise = caps[1].trim().to_lowercase();
        let conclusion = caps[2].trim().to_lowercase();
        let rest = text[caps.get(0).map_or(0, |m| m.end())..].to_lowercase();

        if !rest.contains(&premise) {
            return Err(RuleError::mismatch(
                rule,
                format!("premise '{}' is never asserted", premise),
            ));
        }

        let valid = matching_options(question, |o| o.text.to_lowercase().contains(&conclusion));
        Ok(RuleAnalysis::new(
            rule,
            "Modus ponens",
            OptionValue::Symbol(conclusion.clone()),
            valid,
            0.75,
        )
        .with_detail("premise", premise)
        .with_detail("conclusion", conclusion))
    }
}

impl RuleAnalyzer for Implication {
    fn rule_type(&self) -> RuleType {
        RuleType::LogicalImplication
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        let text = question.full_text();
        match self.evaluate(question, &text) {
            Some(result) => result,
            None => self.modus_ponens(question, &text),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Finite sets
// ─────────────────────────────────────────────────────────────────────────

type Set = BTreeSet<String>;

fn parse_elements(body: &str) -> Set {
    body.split([',', ';'])
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

/// Set written in an option: `{1, 2}`, `∅`, `{}` or a bare list
fn parse_option_set(text: &str) -> Set {
    let trimmed = text.trim();
    if trimmed == "∅" {
        return Set::new();
    }
    let body = trimmed
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .unwrap_or(trimmed);
    parse_elements(body)
}

fn show_set(set: &Set) -> String {
    if set.is_empty() {
        return "∅".to_string();
    }
    let mut items: Vec<&str> = set.iter().map(String::as_str).collect();
    items.sort_by(|a, b| (a.parse::<i64>().ok(), a).cmp(&(b.parse::<i64>().ok(), b)));
    format!("{{{}}}", items.join(", "))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetOp {
    Union,
    Intersection,
    Difference,
    Subset,
}

impl SetOp {
    fn from_symbol(op: &str) -> Option<Self> {
        match op {
            "∪" => Some(SetOp::Union),
            "∩" => Some(SetOp::Intersection),
            "\\" | "−" | "-" => Some(SetOp::Difference),
            "⊆" => Some(SetOp::Subset),
            _ => None,
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "union" => Some(SetOp::Union),
            "intersection" => Some(SetOp::Intersection),
            "différence" | "difference" => Some(SetOp::Difference),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            SetOp::Union => "union",
            SetOp::Intersection => "intersection",
            SetOp::Difference => "difference",
            SetOp::Subset => "inclusion",
        }
    }
}

/// Union, intersection, difference and inclusion of named sets
pub struct SetTheory;

impl SetTheory {
    fn operation(text: &str) -> Option<(SetOp, String, String)> {
        if let Some(c) = SET_SYMBOL_OP.captures(text) {
            return Some((SetOp::from_symbol(&c[2])?, c[1].to_string(), c[3].to_string()));
        }
        let c = SET_WORD_OP.captures(text)?;
        Some((SetOp::from_word(&c[1])?, c[2].to_string(), c[3].to_string()))
    }
}

impl RuleAnalyzer for SetTheory {
    fn rule_type(&self) -> RuleType {
        RuleType::SetTheory
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let text = question.full_text();
        let sets: HashMap<String, Set> = NAMED_SET
            .captures_iter(&text)
            .map(|c| (c[1].to_string(), parse_elements(&c[2])))
            .collect();
        if sets.is_empty() {
            return Err(RuleError::extraction(rule, "no set written as X = {..}"));
        }

        let (op, left, right) = Self::operation(&text)
            .ok_or_else(|| RuleError::extraction(rule, "no set operation found"))?;
        let lookup = |name: &str| {
            sets.get(name)
                .ok_or_else(|| RuleError::extraction(rule, format!("set {} is not defined", name)))
        };
        let (a, b) = (lookup(&left)?, lookup(&right)?);

        let analysis = match op {
            SetOp::Subset => {
                let holds = a.is_subset(b);
                let valid = matching_options(question, |o| truth_value(&o.text) == Some(holds));
                RuleAnalysis::new(
                    rule,
                    "Set inclusion",
                    OptionValue::Symbol(truth_word(holds).to_string()),
                    valid,
                    0.9,
                )
            }
            _ => {
                let result: Set = match op {
                    SetOp::Union => a.union(b).cloned().collect(),
                    SetOp::Intersection => a.intersection(b).cloned().collect(),
                    _ => a.difference(b).cloned().collect(),
                };
                let valid = matching_options(question, |o| parse_option_set(&o.text) == result);
                RuleAnalysis::new(
                    rule,
                    format!("Set {}", op.name()),
                    OptionValue::Symbol(show_set(&result)),
                    valid,
                    0.9,
                )
            }
        };
        Ok(analysis
            .with_detail("operation", format!("{} {} {}", left, op.name(), right))
            .with_detail(&left, show_set(a))
            .with_detail(&right, show_set(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn question(content: &str, options: &[&str]) -> Question {
        Question::new(content).with_options(options.iter().copied())
    }

    #[rstest]
    #[case("p ∧ q", true)]
    #[case("p ∧ ¬q", false)]
    #[case("¬p ∨ r", false)]
    #[case("p → q → r", false)]
    #[case("(p → r) → q", true)]
    #[case("p && !r || q", true)]
    #[case("p ⊕ q", false)]
    fn test_formula_evaluation(#[case] formula: &str, #[case] expected: bool) {
        let values = HashMap::from([('p', true), ('q', true), ('r', false)]);
        let parsed = Parser::parse(formula).unwrap();
        assert_eq!(parsed.eval(&values), Ok(expected));
    }

    #[test]
    fn test_parser_rejects_garbage() {
        assert_eq!(Parser::parse("p ∧"), None);
        assert_eq!(Parser::parse("(p ∨ q"), None);
        assert_eq!(Parser::parse("p q"), None);
    }

    #[test]
    fn test_parser_bounds_nesting() {
        assert!(Parser::parse("¬¬p").is_some());
        assert_eq!(Parser::parse(&format!("{}p", "¬".repeat(100))), None);
        assert_eq!(Parser::parse(&format!("{}p{}", "(".repeat(100), ")".repeat(100))), None);
        assert_eq!(Parser::parse(&vec!["p"; 200].join(" ∧ ")), None);
    }

    #[test]
    fn test_long_negation_run_is_an_extraction_error() {
        let content = format!("p = vrai. Que vaut {}p ∧ p ?", "¬".repeat(20_000));
        let q = question(&content, &["Vrai", "Faux"]);
        assert!(matches!(
            Implication.analyze(&q),
            Err(RuleError::Extraction { .. })
        ));
    }

    #[test]
    fn test_implication_with_assignments() {
        let q = question(
            "Si p = vrai et q = faux, que vaut p → q ?",
            &["Vrai", "Faux", "Indéterminé"],
        );
        let a = Implication.analyze(&q).unwrap();
        assert_eq!(a.expected_next, OptionValue::Symbol("faux".into()));
        assert_eq!(a.valid_options, vec![1]);
        assert_eq!(a.details["formula"], "p → q");
        assert_eq!(a.details["assignment"], "p=vrai, q=faux");
    }

    #[test]
    fn test_missing_assignment() {
        let q = question("Avec p = 1, évaluer p ∧ r", &["1", "0"]);
        let err = Implication.analyze(&q).unwrap_err();
        assert!(err.to_string().contains("'r'"));
    }

    #[test]
    fn test_modus_ponens() {
        let q = question(
            "Si il pleut, alors le sol est mouillé. Il pleut. Que peut-on conclure ?",
            &["Le sol est sec", "Le sol est mouillé", "Il neige"],
        );
        let a = Implication.analyze(&q).unwrap();
        assert_eq!(a.valid_options, vec![1]);
        assert_eq!(a.confidence, 0.75);
    }

    #[test]
    fn test_affirming_the_consequent_is_rejected() {
        let q = question(
            "Si il pleut, alors le sol est mouillé. Le sol est mouillé. Conclusion ?",
            &["Il pleut", "Rien"],
        );
        assert!(matches!(
            Implication.analyze(&q),
            Err(RuleError::PatternMismatch { .. })
        ));
    }

    #[rstest]
    #[case("A = {1, 2, 3}, B = {3, 4}. Que vaut A ∪ B ?", &["{1, 2, 3, 4}", "{3}", "{1, 2}"], 0)]
    #[case("A = {1, 2, 3}, B = {3, 4}. Que vaut A ∩ B ?", &["{1, 2, 3, 4}", "{3}", "{1, 2}"], 1)]
    #[case("A = {1, 2, 3}, B = {3, 4}. Que vaut A \\ B ?", &["{1, 2, 3, 4}", "{3}", "{1, 2}"], 2)]
    #[case("Ensembles A = {a, b}, B = {c}: intersection de A et B ?", &["{a}", "∅"], 1)]
    #[case("A = {1}, B = {1, 2}. A ⊆ B ?", &["Faux", "Vrai"], 1)]
    fn test_set_operations(
        #[case] content: &str,
        #[case] options: &[&str],
        #[case] expected: usize,
    ) {
        let a = SetTheory.analyze(&question(content, options)).unwrap();
        assert_eq!(a.valid_options, vec![expected]);
    }

    #[test]
    fn test_undefined_set() {
        let q = question("A = {1}. Que vaut A ∪ C ?", &["{1}"]);
        assert!(matches!(
            SetTheory.analyze(&q),
            Err(RuleError::Extraction { .. })
        ));
    }

    #[test]
    fn test_show_set_orders_numbers() {
        let set = parse_elements("10, 2, 1");
        assert_eq!(show_set(&set), "{1, 2, 10}");
        assert_eq!(show_set(&Set::new()), "∅");
    }
}
