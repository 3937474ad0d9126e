//! Letter and glyph families
//!
//! Letter progressions, two-symbol alternations, quarter-turn rotations
//! and mirror images. Glyph runs may be separated by spaces or commas.

use super::*;

static LETTER_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z]\b(?:\s*,\s*\b[A-Za-z]\b){2,}").expect("letter run pattern")
});

// Both runs must lead straight into the `?` gap
static ALTERNATION_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([◼◻■□●○★☆](?:\s*,?\s*[◼◻■□●○★☆]){2,})\s*,?\s*\?")
        .expect("alternation run pattern")
});

static ROTATION_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([◐◓◑◒→↓←↑➡⬇⬅⬆](?:\s*,?\s*[◐◓◑◒→↓←↑➡⬇⬅⬆]){2,3})\s*,?\s*\?")
        .expect("rotation run pattern")
});

/// Quarter turns clockwise
pub(super) const ROTATION_CYCLES: [[char; 4]; 2] = [['◐', '◓', '◑', '◒'], ['→', '↓', '←', '↑']];

/// Mirror across a vertical axis
const VERTICAL_MIRROR: &[(char, char)] = &[
    ('◐', '◑'),
    ('←', '→'),
    ('◀', '▶'),
    ('↖', '↗'),
    ('↙', '↘'),
];

/// Mirror across a horizontal axis
const HORIZONTAL_MIRROR: &[(char, char)] = &[
    ('◓', '◒'),
    ('↑', '↓'),
    ('▲', '▼'),
    ('↖', '↙'),
    ('↗', '↘'),
];

/// Heavy arrows are drawn the same as light ones
pub(super) fn normalize_glyph(c: char) -> char {
    match c {
        '➡' => '→',
        '⬇' => '↓',
        '⬅' => '←',
        '⬆' => '↑',
        other => other,
    }
}

fn normalized(text: &str) -> String {
    text.trim().chars().map(normalize_glyph).collect()
}

fn glyphs(run: &str) -> Vec<char> {
    run.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(normalize_glyph)
        .collect()
}

/// Letters advancing by a constant step
pub struct LetterProgression;

impl RuleAnalyzer for LetterProgression {
    fn rule_type(&self) -> RuleType {
        RuleType::LetterProgression
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let text = question.full_text();
        let run = LETTER_RUN
            .find(&text)
            .ok_or_else(|| RuleError::extraction(rule, "no run of three letters"))?;

        let positions: Vec<i64> = run
            .as_str()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .map(|c| i64::from(c.to_ascii_uppercase() as u8 - b'A'))
            .collect();
        let steps = differences(&positions)
            .ok_or_else(|| RuleError::mismatch(rule, "letter offsets overflow"))?;
        let step = steps[0];
        if steps.iter().any(|s| *s != step) {
            return Err(RuleError::mismatch(
                rule,
                format!("uneven letter steps: {}", join(&steps)),
            ));
        }

        let next = positions[positions.len() - 1] + step;
        if !(0..26).contains(&next) {
            return Err(RuleError::mismatch(
                rule,
                format!("next letter falls outside A-Z (offset {})", next),
            ));
        }
        let expected = char::from(b'A' + next as u8);

        let valid = matching_options(question, |o| o.value() == OptionValue::Letter(expected));
        let sequence = positions
            .iter()
            .map(|p| OptionValue::Letter(char::from(b'A' + *p as u8)))
            .collect();
        Ok(RuleAnalysis::new(
            rule,
            "Letters at constant alphabet step",
            OptionValue::Letter(expected),
            valid,
            0.9,
        )
        .with_sequence(sequence)
        .with_detail("step", step))
    }
}

/// Two symbols taking turns
pub struct Alternation;

impl RuleAnalyzer for Alternation {
    fn rule_type(&self) -> RuleType {
        RuleType::SymbolAlternation
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let text = question.full_text();
        let run = ALTERNATION_RUN
            .captures(&text)
            .ok_or_else(|| RuleError::extraction(rule, "no run of three symbols before ?"))?;
        let symbols = glyphs(&run[1]);

        let mut distinct = symbols.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() != 2 {
            return Err(RuleError::mismatch(
                rule,
                format!("{} distinct symbols, alternation needs 2", distinct.len()),
            ));
        }
        if symbols.windows(2).any(|w| w[0] == w[1]) {
            let shown: String = symbols.iter().collect();
            return Err(RuleError::mismatch(
                rule,
                format!("{} repeats a symbol", shown),
            ));
        }

        let expected = if symbols.len() % 2 == 0 {
            symbols[0]
        } else {
            symbols[1]
        };
        let valid = options_with_text(question, &expected.to_string());
        Ok(RuleAnalysis::new(
            rule,
            "Alternation of two symbols",
            OptionValue::Symbol(expected.to_string()),
            valid,
            0.9,
        )
        .with_sequence(
            symbols
                .iter()
                .map(|s| OptionValue::Symbol(s.to_string()))
                .collect(),
        ))
    }
}

/// Glyphs turning 90° clockwise at each step
pub struct Rotation;

impl RuleAnalyzer for Rotation {
    fn rule_type(&self) -> RuleType {
        RuleType::RotationPattern
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let text = question.full_text();
        let run = ROTATION_RUN
            .captures(&text)
            .ok_or_else(|| RuleError::extraction(rule, "no run of three oriented glyphs before ?"))?;
        let symbols = glyphs(&run[1]);

        let cycle = ROTATION_CYCLES
            .iter()
            .find(|cycle| symbols.iter().all(|s| cycle.contains(s)))
            .ok_or_else(|| RuleError::mismatch(rule, "glyphs mix several rotation families"))?;
        let position = |c: &char| cycle.iter().position(|g| g == c).unwrap_or(0);

        if let Some(w) = symbols
            .windows(2)
            .find(|w| (position(&w[0]) + 1) % 4 != position(&w[1]))
        {
            return Err(RuleError::mismatch(
                rule,
                format!("{} → {} is not a clockwise quarter turn", w[0], w[1]),
            ));
        }

        let last = position(&symbols[symbols.len() - 1]);
        let expected = cycle[(last + 1) % 4];
        let target = expected.to_string();
        let valid = matching_options(question, |o| normalized(&o.text) == target);
        Ok(RuleAnalysis::new(
            rule,
            "Clockwise quarter-turn rotation",
            OptionValue::Symbol(target.clone()),
            valid,
            0.9,
        )
        .with_sequence(
            symbols
                .iter()
                .map(|s| OptionValue::Symbol(s.to_string()))
                .collect(),
        )
        .with_detail("degrees", 90))
    }
}

/// Mirror image of the last figure
pub struct Reflection;

impl Reflection {
    fn mirror(map: &[(char, char)], c: char) -> Option<char> {
        map.iter().find_map(|(a, b)| {
            if *a == c {
                Some(*b)
            } else if *b == c {
                Some(*a)
            } else {
                None
            }
        })
    }
}

impl RuleAnalyzer for Reflection {
    fn rule_type(&self) -> RuleType {
        RuleType::ReflectionPattern
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let text = question.full_text();
        let (map, axis) = if text.to_lowercase().contains("horizontal") {
            (HORIZONTAL_MIRROR, "horizontal")
        } else {
            (VERTICAL_MIRROR, "vertical")
        };

        let before_gap = text.split('?').next().unwrap_or_default();
        let (figure, expected) = before_gap
            .chars()
            .map(normalize_glyph)
            .filter_map(|c| Self::mirror(map, c).map(|m| (c, m)))
            .last()
            .ok_or_else(|| {
                RuleError::extraction(rule, format!("no figure with a {} mirror", axis))
            })?;

        let target = expected.to_string();
        let valid = matching_options(question, |o| normalized(&o.text) == target);
        Ok(RuleAnalysis::new(
            rule,
            "Mirror image",
            OptionValue::Symbol(target),
            valid,
            0.8,
        )
        .with_sequence(vec![OptionValue::Symbol(figure.to_string())])
        .with_detail("axis", axis))
    }
}
