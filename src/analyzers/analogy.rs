//! `A est à B comme C est à ?` (or `A is to B as C is to ?`)

use super::*;

static NUMERIC_ANALOGY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(-?[0-9]+)\s+(?:est à|is to)\s+(-?[0-9]+)\s*,?\s+(?:comme|as)\s+(-?[0-9]+)\s+(?:est à|is to)\s*\?",
    )
    .expect("numeric analogy pattern")
});

static GENERAL_ANALOGY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\S+)\s+(?:est à|is to)\s+(\S+?)\s*,?\s+(?:comme|as)\s+(\S+)\s+(?:est à|is to)\s*\?",
    )
    .expect("general analogy pattern")
});

/// Relation carried from `A` to `B`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Square,
    Double,
    Add(i64),
    LetterShift(i64),
}

impl Relation {
    fn numeric(a: i64, b: i64) -> Option<Self> {
        if a.checked_mul(a) == Some(b) {
            Some(Relation::Square)
        } else if a.checked_mul(2) == Some(b) {
            Some(Relation::Double)
        } else {
            b.checked_sub(a).map(Relation::Add)
        }
    }

    fn apply(self, c: i64) -> Option<i64> {
        match self {
            Relation::Square => c.checked_mul(c),
            Relation::Double => c.checked_mul(2),
            Relation::Add(k) => c.checked_add(k),
            Relation::LetterShift(_) => None,
        }
    }

    fn describe(self) -> String {
        match self {
            Relation::Square => "square".to_string(),
            Relation::Double => "double".to_string(),
            Relation::Add(k) => format!("add {}", k),
            Relation::LetterShift(k) => format!("shift by {} letters", k),
        }
    }
}

fn single_letter(term: &str) -> Option<u8> {
    let mut chars = term.trim_matches(|c: char| !c.is_alphanumeric()).chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase() as u8),
        _ => None,
    }
}

pub struct Analogy;

impl Analogy {
    fn numeric(
        &self,
        question: &Question,
        terms: [i64; 3],
    ) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let [a, b, c] = terms;
        let relation = Relation::numeric(a, b)
            .ok_or_else(|| RuleError::mismatch(rule, format!("no relation from {} to {}", a, b)))?;
        let expected = relation
            .apply(c)
            .ok_or_else(|| RuleError::mismatch(rule, "answer overflows"))?;

        let valid = options_equal_to(question, expected as f64);
        Ok(RuleAnalysis::new(
            rule,
            "Numeric analogy A:B :: C:?",
            OptionValue::integer(expected),
            valid,
            0.85,
        )
        .with_sequence(integers(&terms))
        .with_detail("relation", relation.describe())
        .with_detail("mapping", format!("{}→{}, {}→{}", a, b, c, expected)))
    }

    fn general(&self, question: &Question, terms: [&str; 3]) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let [a, b, c] = terms;
        let letters = (single_letter(a), single_letter(b), single_letter(c));
        let (la, lb, lc) = match letters {
            (Some(la), Some(lb), Some(lc)) => (la, lb, lc),
            _ => {
                return Err(RuleError::mismatch(
                    rule,
                    format!("no known relation between '{}' and '{}'", a, b),
                ))
            }
        };

        let shift = i64::from(lb) - i64::from(la);
        let target = i64::from(lc) + shift;
        if !(i64::from(b'A')..=i64::from(b'Z')).contains(&target) {
            return Err(RuleError::mismatch(
                rule,
                format!("shifting {} by {} leaves the alphabet", char::from(lc), shift),
            ));
        }
        let expected = char::from(target as u8);
        let relation = Relation::LetterShift(shift);

        let valid = matching_options(question, |o| o.value() == OptionValue::Letter(expected));
        Ok(RuleAnalysis::new(
            rule,
            "Analogy A:B :: C:?",
            OptionValue::Letter(expected),
            valid,
            0.75,
        )
        .with_sequence(
            [la, lb, lc]
                .iter()
                .map(|l| OptionValue::Letter(char::from(*l)))
                .collect(),
        )
        .with_detail("relation", relation.describe())
        .with_detail(
            "mapping",
            format!(
                "{}→{}, {}→{}",
                char::from(la),
                char::from(lb),
                char::from(lc),
                expected
            ),
        ))
    }
}

impl RuleAnalyzer for Analogy {
    fn rule_type(&self) -> RuleType {
        RuleType::AnalogyPattern
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let text = question.full_text();

        if let Some(caps) = NUMERIC_ANALOGY.captures(&text) {
            let terms = [&caps[1], &caps[2], &caps[3]].map(|t| t.parse::<i64>().ok());
            if let [Some(a), Some(b), Some(c)] = terms {
                return self.numeric(question, [a, b, c]);
            }
        }

        let caps = GENERAL_ANALOGY
            .captures(&text)
            .ok_or_else(|| RuleError::extraction(rule, "no 'A is to B as C is to ?' form"))?;
        self.general(question, [&caps[1], &caps[2], &caps[3]])
    }
}
