//! Numeric sequence families
//!
//! Arithmetic, geometric, Fibonacci, power, prime, polynomial (named
//! tables and finite differences), factorial and scaling sequences.
//! Integer arithmetic is checked; an overflow means the pattern cannot
//! be verified, never a wrapped value.

use super::*;

static SYMBOLIC_POWERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"x\s*,\s*x(?:²|\^2)\s*,\s*x(?:³|\^3)\s*,\s*x(?:⁴|\^4)").expect("symbolic powers")
});

static NUMERIC_POWERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([0-9]+)\^([0-9]+)\s*,\s*([0-9]+)\^([0-9]+)\s*,\s*([0-9]+)\^([0-9]+)\s*,\s*([0-9]+)\^([0-9]+)",
    )
    .expect("numeric powers")
});

static FACTORIAL_LITERALS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[0-9]+!(?:\s*,\s*[0-9]+!)+").expect("factorial literals")
});

static X_FIFTH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"x(?:⁵|\^5)").expect("x fifth"));

const CATALAN: &[i64] = &[
    1, 1, 2, 5, 14, 42, 132, 429, 1430, 4862, 16796, 58786, 208012, 742900,
];
const BELL: &[i64] = &[1, 1, 2, 5, 15, 52, 203, 877, 4140, 21147, 115975, 678570];
const MOTZKIN: &[i64] = &[1, 1, 2, 4, 9, 21, 51, 127, 323, 835, 2188, 5798, 15511];

fn squares() -> Vec<i64> {
    (0..=40).map(|n| n * n).collect()
}

/// `b−a == c−b == ...`, next = last + step
pub struct Arithmetic;

impl RuleAnalyzer for Arithmetic {
    fn rule_type(&self) -> RuleType {
        RuleType::ArithmeticSequence
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let terms = first_integer_run(&question.full_text(), 4)
            .ok_or_else(|| RuleError::extraction(rule, "no run of four integers"))?;
        let diffs =
            differences(&terms).ok_or_else(|| RuleError::mismatch(rule, "difference overflow"))?;

        let step = diffs[0];
        if diffs.iter().any(|d| *d != step) {
            return Err(RuleError::mismatch(
                rule,
                format!("inconsistent differences: {}", join(&diffs)),
            ));
        }

        let last = terms[terms.len() - 1];
        let expected = last
            .checked_add(step)
            .ok_or_else(|| RuleError::mismatch(rule, "next term overflows"))?;

        let valid = options_equal_to(question, expected as f64);
        Ok(RuleAnalysis::new(
            rule,
            "Arithmetic progression",
            OptionValue::integer(expected),
            valid,
            0.95,
        )
        .with_sequence(integers(&terms))
        .with_detail("difference", step))
    }
}

/// Constant ratio within [`NUMERIC_TOLERANCE`], next = round(last × ratio)
pub struct Geometric;

impl RuleAnalyzer for Geometric {
    fn rule_type(&self) -> RuleType {
        RuleType::GeometricSequence
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let terms = first_integer_run(&question.full_text(), 4)
            .ok_or_else(|| RuleError::extraction(rule, "no run of four integers"))?;

        if terms.contains(&0) {
            return Err(RuleError::mismatch(
                rule,
                "division by zero: sequence contains 0",
            ));
        }

        let ratios: Vec<f64> = terms
            .windows(2)
            .map(|w| w[1] as f64 / w[0] as f64)
            .collect();
        let ratio = ratios[0];
        if ratios
            .iter()
            .any(|r| (r - ratio).abs() >= NUMERIC_TOLERANCE)
        {
            let shown: Vec<String> = ratios.iter().map(|r| format!("{:.2}", r)).collect();
            return Err(RuleError::mismatch(
                rule,
                format!("inconsistent ratios: {}", shown.join(", ")),
            ));
        }

        let expected = (terms[terms.len() - 1] as f64 * ratio).round();
        if !expected.is_finite() || expected.abs() > i64::MAX as f64 {
            return Err(RuleError::mismatch(rule, "next term overflows"));
        }

        let valid = options_equal_to(question, expected);
        Ok(RuleAnalysis::new(
            rule,
            "Geometric progression",
            OptionValue::Number(expected),
            valid,
            0.9,
        )
        .with_sequence(integers(&terms))
        .with_detail("ratio", crate::question::format_number(ratio)))
    }
}

/// Each term is the sum of the two before it
pub struct Fibonacci;

impl RuleAnalyzer for Fibonacci {
    fn rule_type(&self) -> RuleType {
        RuleType::FibonacciSequence
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let terms = first_integer_run(&question.full_text(), 5)
            .ok_or_else(|| RuleError::extraction(rule, "no run of five integers"))?;

        for i in 2..terms.len() {
            if terms[i - 1].checked_add(terms[i - 2]) != Some(terms[i]) {
                return Err(RuleError::mismatch(
                    rule,
                    format!(
                        "{} is not {} + {}",
                        terms[i],
                        terms[i - 2],
                        terms[i - 1]
                    ),
                ));
            }
        }

        let n = terms.len();
        let expected = terms[n - 1]
            .checked_add(terms[n - 2])
            .ok_or_else(|| RuleError::mismatch(rule, "next term overflows"))?;

        let valid = options_equal_to(question, expected as f64);
        Ok(RuleAnalysis::new(
            rule,
            "Fibonacci sequence",
            OptionValue::integer(expected),
            valid,
            0.95,
        )
        .with_sequence(integers(&terms)))
    }
}

/// `x, x², x³, x⁴` or `a^1, (a+1)^2, (a+2)^3, (a+3)^4`
pub struct Power;

impl RuleAnalyzer for Power {
    fn rule_type(&self) -> RuleType {
        RuleType::PowerSequence
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let text = question.full_text();

        if SYMBOLIC_POWERS.is_match(&text) {
            let valid = matching_options(question, |o| X_FIFTH.is_match(&o.text));
            return Ok(RuleAnalysis::new(
                rule,
                "Successive powers of x",
                OptionValue::Symbol("x⁵".into()),
                valid,
                0.95,
            )
            .with_detail("pattern", "x^n"));
        }

        let caps = NUMERIC_POWERS
            .captures(&text)
            .ok_or_else(|| RuleError::extraction(rule, "no power sequence found"))?;
        let values: Vec<u32> = (1..=8)
            .map(|i| caps[i].parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|_| RuleError::extraction(rule, "power terms out of range"))?;
        let bases = [values[0], values[2], values[4], values[6]];
        let exponents = [values[1], values[3], values[5], values[7]];

        let consecutive_bases = bases.windows(2).all(|w| w[0].checked_add(1) == Some(w[1]));
        if !consecutive_bases || exponents != [1, 2, 3, 4] {
            return Err(RuleError::mismatch(
                rule,
                format!(
                    "bases {} with exponents {} do not follow n^k",
                    join(&bases),
                    join(&exponents)
                ),
            ));
        }

        let next_base = bases[3]
            .checked_add(1)
            .ok_or_else(|| RuleError::mismatch(rule, "next base overflows"))?;
        let expected = i64::from(next_base)
            .checked_pow(5)
            .ok_or_else(|| RuleError::mismatch(rule, "next term overflows"))?;
        let literal = format!("{}^5", next_base);

        let valid = matching_options(question, |o| {
            option_number(&o.text) == Some(expected as f64) || o.text.contains(&literal)
        });
        Ok(RuleAnalysis::new(
            rule,
            "Consecutive powers n^k",
            OptionValue::integer(expected),
            valid,
            0.9,
        )
        .with_detail("pattern", "(a+k)^(k+1)")
        .with_detail("next", literal))
    }
}

/// Consecutive primes
pub struct Prime;

impl RuleAnalyzer for Prime {
    fn rule_type(&self) -> RuleType {
        RuleType::PrimeSequence
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let terms = first_integer_run(&question.full_text(), 4)
            .ok_or_else(|| RuleError::extraction(rule, "no run of four integers"))?;

        if let Some(t) = terms.iter().find(|t| !is_prime(**t)) {
            return Err(RuleError::mismatch(rule, format!("{} is not prime", t)));
        }
        for w in terms.windows(2) {
            if next_prime(w[0]) != Some(w[1]) {
                return Err(RuleError::mismatch(
                    rule,
                    format!("{} does not follow {} among primes", w[1], w[0]),
                ));
            }
        }

        let expected = next_prime(terms[terms.len() - 1])
            .ok_or_else(|| RuleError::mismatch(rule, "next prime overflows"))?;
        let valid = options_equal_to(question, expected as f64);
        Ok(RuleAnalysis::new(
            rule,
            "Consecutive prime numbers",
            OptionValue::integer(expected),
            valid,
            0.9,
        )
        .with_sequence(integers(&terms)))
    }
}

fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3i64;
    while d.checked_mul(d).is_some_and(|sq| sq <= n) {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

fn next_prime(n: i64) -> Option<i64> {
    let mut candidate = n.max(1).checked_add(1)?;
    while !is_prime(candidate) {
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}

/// Named integer sequences, then finite differences
pub struct Polynomial;

impl Polynomial {
    fn named_tables(text: &str) -> Vec<(&'static str, Vec<i64>)> {
        let lower = text.to_lowercase();
        let all = vec![
            ("Catalan numbers", CATALAN.to_vec()),
            ("Bell numbers", BELL.to_vec()),
            ("Motzkin numbers", MOTZKIN.to_vec()),
            ("Perfect squares", squares()),
        ];
        let keywords = ["catalan", "bell", "motzkin", "carr"];
        let named: Vec<_> = all
            .iter()
            .zip(keywords)
            .filter(|(_, kw)| lower.contains(kw) || (*kw == "carr" && lower.contains("square")))
            .map(|(table, _)| table.clone())
            .collect();
        if named.is_empty() {
            all
        } else {
            named
        }
    }

    fn from_table(
        rule: RuleType,
        terms: &[i64],
        text: &str,
    ) -> Option<Result<(String, i64), RuleError>> {
        for (name, table) in Self::named_tables(text) {
            let position = table
                .windows(terms.len())
                .position(|window| window == terms);
            if let Some(start) = position {
                return Some(match table.get(start + terms.len()) {
                    Some(next) => Ok((name.to_string(), *next)),
                    None => Err(RuleError::mismatch(
                        rule,
                        format!("{} beyond the known table", name),
                    )),
                });
            }
        }
        None
    }

    /// Extrapolate when the difference table is constant at order ≤ 3
    fn from_differences(terms: &[i64]) -> Option<(usize, i64)> {
        let mut rows = vec![terms.to_vec()];
        for order in 1..=3 {
            let next = differences(rows.last()?)?;
            if next.len() < 2 {
                return None;
            }
            let constant = next.iter().all(|d| *d == next[0]);
            rows.push(next);
            if constant {
                let expected = rows
                    .iter()
                    .try_fold(0i64, |acc, row| acc.checked_add(*row.last()?))?;
                return Some((order, expected));
            }
        }
        None
    }
}

impl RuleAnalyzer for Polynomial {
    fn rule_type(&self) -> RuleType {
        RuleType::PolynomialSequence
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let text = question.full_text();
        let terms = first_integer_run(&text, 4)
            .ok_or_else(|| RuleError::extraction(rule, "no run of four integers"))?;

        if let Some(found) = Self::from_table(rule, &terms, &text) {
            let (name, expected) = found?;
            let valid = options_equal_to(question, expected as f64);
            return Ok(RuleAnalysis::new(
                rule,
                name,
                OptionValue::integer(expected),
                valid,
                0.9,
            )
            .with_sequence(integers(&terms)));
        }

        if terms.len() < 5 {
            return Err(RuleError::mismatch(
                rule,
                "not a known sequence and too short for finite differences",
            ));
        }
        let (order, expected) = Self::from_differences(&terms).ok_or_else(|| {
            RuleError::mismatch(rule, "difference table never becomes constant")
        })?;

        let valid = options_equal_to(question, expected as f64);
        Ok(RuleAnalysis::new(
            rule,
            "Polynomial sequence (finite differences)",
            OptionValue::integer(expected),
            valid,
            0.85,
        )
        .with_sequence(integers(&terms))
        .with_detail("degree", order))
    }
}

/// `1!, 2!, 3!`, runs of consecutive factorials, or `n!` over consecutive n
pub struct Factorial;

impl Factorial {
    fn factorial(n: i64) -> Option<i64> {
        (1..=n.max(0)).try_fold(1i64, |acc, k| acc.checked_mul(k))
    }

    /// Smallest k with terms == [k!, (k+1)!, ...]
    fn first_index(terms: &[i64]) -> Option<i64> {
        (0..=20).find(|k| {
            terms
                .iter()
                .enumerate()
                .all(|(i, t)| Self::factorial(k + i as i64) == Some(*t))
        })
    }
}

impl RuleAnalyzer for Factorial {
    fn rule_type(&self) -> RuleType {
        RuleType::FactorialSequence
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let text = question.full_text();
        let overflow = || RuleError::mismatch(rule, "next factorial overflows");

        if let Some(m) = FACTORIAL_LITERALS.find(&text) {
            let ns: Vec<i64> = m
                .as_str()
                .split(',')
                .filter_map(|t| t.trim().trim_end_matches('!').parse().ok())
                .collect();
            if ns.windows(2).any(|w| w[0].checked_add(1) != Some(w[1])) {
                return Err(RuleError::mismatch(
                    rule,
                    format!("factorial arguments {} are not consecutive", join(&ns)),
                ));
            }
            let next = ns
                .last()
                .and_then(|n| n.checked_add(1))
                .ok_or_else(overflow)?;
            let expected = Self::factorial(next).ok_or_else(overflow)?;
            let literal = format!("{}!", next);
            let valid = matching_options(question, |o| {
                (option_number(&o.text) == Some(expected as f64) && !o.text.contains('!'))
                    || o.text.trim() == literal
            });
            return Ok(RuleAnalysis::new(
                rule,
                "Factorials n!",
                OptionValue::integer(expected),
                valid,
                0.9,
            )
            .with_sequence(integers(&ns))
            .with_detail("next", literal));
        }

        let terms = first_integer_run(&text, 4)
            .ok_or_else(|| RuleError::extraction(rule, "no factorial terms found"))?;

        if let Some(k) = Self::first_index(&terms) {
            let expected = Self::factorial(k + terms.len() as i64).ok_or_else(overflow)?;
            let valid = options_equal_to(question, expected as f64);
            return Ok(RuleAnalysis::new(
                rule,
                "Consecutive factorials",
                OptionValue::integer(expected),
                valid,
                0.9,
            )
            .with_sequence(integers(&terms))
            .with_detail("start", format!("{}!", k)));
        }

        // "n! for n = 1, 2, 3, 4, 5"
        let consecutive = terms.windows(2).all(|w| w[0].checked_add(1) == Some(w[1]));
        if text.contains("n!") && consecutive {
            let next = terms[terms.len() - 1]
                .checked_add(1)
                .ok_or_else(overflow)?;
            let expected = Self::factorial(next).ok_or_else(overflow)?;
            let valid = options_equal_to(question, expected as f64);
            return Ok(RuleAnalysis::new(
                rule,
                "Factorials n!",
                OptionValue::integer(expected),
                valid,
                0.9,
            )
            .with_sequence(integers(&terms))
            .with_detail("next", format!("{}!", next)));
        }

        Err(RuleError::mismatch(
            rule,
            format!("{} are not consecutive factorials", join(&terms)),
        ))
    }
}

/// Sizes growing or shrinking by a constant factor, decimals allowed
pub struct Scaling;

impl RuleAnalyzer for Scaling {
    fn rule_type(&self) -> RuleType {
        RuleType::ScalingPattern
    }

    fn analyze(&self, question: &Question) -> Result<RuleAnalysis, RuleError> {
        let rule = self.rule_type();
        let terms = first_decimal_run(&question.full_text(), 3)
            .ok_or_else(|| RuleError::extraction(rule, "no run of three sizes"))?;

        if terms.iter().any(|t| *t == 0.0) {
            return Err(RuleError::mismatch(rule, "size sequence contains 0"));
        }
        if terms.iter().any(|t| !t.is_finite()) {
            return Err(RuleError::mismatch(rule, "size out of range"));
        }
        let ratios: Vec<f64> = terms.windows(2).map(|w| w[1] / w[0]).collect();
        if ratios.iter().any(|r| !r.is_finite()) {
            return Err(RuleError::mismatch(rule, "scale factor out of range"));
        }
        let factor = ratios[0];
        if ratios
            .iter()
            .any(|r| (r - factor).abs() >= NUMERIC_TOLERANCE)
        {
            let shown: Vec<String> = ratios.iter().map(|r| format!("{:.2}", r)).collect();
            return Err(RuleError::mismatch(
                rule,
                format!("inconsistent scale factors: {}", shown.join(", ")),
            ));
        }

        let expected = (terms[terms.len() - 1] * factor * 1000.0).round() / 1000.0;
        let valid = matching_options(question, |o| {
            crate::question::option_decimal(&o.text)
                .is_some_and(|v| (v - expected).abs() < NUMERIC_TOLERANCE)
        });
        Ok(RuleAnalysis::new(
            rule,
            "Constant scale factor",
            OptionValue::Number(expected),
            valid,
            0.8,
        )
        .with_sequence(terms.iter().map(|t| OptionValue::Number(*t)).collect())
        .with_detail("factor", crate::question::format_number(factor)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn question(content: &str, options: &[&str]) -> Question {
        Question::new(content).with_options(options.iter().copied())
    }

    #[test]
    fn test_arithmetic() {
        let q = question("Suite: 2, 4, 6, 8, ?", &["9", "10", "12", "14"]);
        let a = Arithmetic.analyze(&q).unwrap();
        assert_eq!(a.expected_next, OptionValue::Number(10.0));
        assert_eq!(a.valid_options, vec![1]);
        assert_eq!(a.expected_answer, Some(1));
        assert_eq!(a.details["difference"], "2");
        assert_eq!(a.confidence, 0.95);
    }

    #[test]
    fn test_arithmetic_uses_whole_run() {
        let q = question("2, 4, 6, 8, 10, ?", &["10", "12"]);
        let a = Arithmetic.analyze(&q).unwrap();
        assert_eq!(a.expected_next, OptionValue::Number(12.0));
        assert_eq!(a.valid_options, vec![1]);
    }

    #[test]
    fn test_arithmetic_descending_into_negatives() {
        let q = question("10, 7, 4, 1, ?", &["-2", "0", "2"]);
        let a = Arithmetic.analyze(&q).unwrap();
        assert_eq!(a.valid_options, vec![0]);
    }

    #[test]
    fn test_arithmetic_mismatch() {
        let q = question("1, 2, 4, 8, ?", &["16"]);
        let err = Arithmetic.analyze(&q).unwrap_err();
        assert_eq!(
            err,
            RuleError::mismatch(
                RuleType::ArithmeticSequence,
                "inconsistent differences: 1, 2, 4"
            )
        );
    }

    #[test]
    fn test_geometric() {
        let q = question("2, 6, 18, 54, ?", &["108", "162", "216", "324"]);
        let a = Geometric.analyze(&q).unwrap();
        assert_eq!(a.expected_next, OptionValue::Number(162.0));
        assert_eq!(a.valid_options, vec![1]);
        assert_eq!(a.details["ratio"], "3");
    }

    #[test]
    fn test_geometric_zero_guard() {
        let q = question("0, 2, 4, 8, ?", &["16"]);
        let err = Geometric.analyze(&q).unwrap_err();
        assert!(matches!(err, RuleError::PatternMismatch { .. }));
        assert!(err.to_string().contains("division by zero"));
    }

    #[test]
    fn test_geometric_halving() {
        let q = question("64, 32, 16, 8, ?", &["2", "4", "6"]);
        let a = Geometric.analyze(&q).unwrap();
        assert_eq!(a.valid_options, vec![1]);
    }

    #[test]
    fn test_fibonacci() {
        let q = question("Fibonacci: 1, 1, 2, 3, 5, ?", &["7", "8", "9", "10"]);
        let a = Fibonacci.analyze(&q).unwrap();
        assert_eq!(a.expected_next, OptionValue::Number(8.0));
        assert_eq!(a.valid_options, vec![1]);
    }

    #[test]
    fn test_fibonacci_needs_five_terms() {
        let q = question("1, 1, 2, 3, ?", &["5"]);
        assert!(matches!(
            Fibonacci.analyze(&q),
            Err(RuleError::Extraction { .. })
        ));
    }

    #[test]
    fn test_power_symbolic() {
        let q = question("Progression: x, x², x³, x⁴, ?", &["x⁵", "x⁴", "5x", "x+5"]);
        let a = Power.analyze(&q).unwrap();
        assert_eq!(a.valid_options, vec![0]);
        assert_eq!(a.expected_next, OptionValue::Symbol("x⁵".into()));
    }

    #[test]
    fn test_power_numeric() {
        let q = question("2^1, 3^2, 4^3, 5^4, ?", &["6^5", "7776", "625", "1296"]);
        let a = Power.analyze(&q).unwrap();
        assert_eq!(a.expected_next, OptionValue::Number(7776.0));
        // both spellings of the same value match
        assert_eq!(a.valid_options, vec![0, 1]);
    }

    #[test]
    fn test_power_bad_exponents() {
        let q = question("2^1, 3^3, 4^3, 5^4, ?", &["6^5"]);
        assert!(matches!(
            Power.analyze(&q),
            Err(RuleError::PatternMismatch { .. })
        ));
    }

    #[test]
    fn test_power_last_base_at_limit() {
        let q = question(
            "4294967292^1, 4294967293^2, 4294967294^3, 4294967295^4, ?",
            &["0", "1"],
        );
        assert!(matches!(
            Power.analyze(&q),
            Err(RuleError::PatternMismatch { .. })
        ));
    }

    #[test]
    fn test_prime() {
        let q = question("Nombres premiers: 7, 11, 13, 17, ?", &["18", "19", "21", "23"]);
        let a = Prime.analyze(&q).unwrap();
        assert_eq!(a.valid_options, vec![1]);
    }

    #[test]
    fn test_prime_gap_rejected() {
        let q = question("prime: 2, 3, 7, 11, ?", &["13"]);
        assert!(Prime.analyze(&q).is_err());
    }

    #[test]
    fn test_polynomial_named_tables() {
        let catalan = question("Catalan: 1, 1, 2, 5, 14, ?", &["28", "42", "44"]);
        assert_eq!(Polynomial.analyze(&catalan).unwrap().valid_options, vec![1]);

        let bell = question("Bell: 1, 1, 2, 5, 15, ?", &["52", "42"]);
        let a = Polynomial.analyze(&bell).unwrap();
        assert_eq!(a.rule, "Bell numbers");
        assert_eq!(a.valid_options, vec![0]);

        let squares = question("1, 4, 9, 16, 25, ?", &["30", "36"]);
        assert_eq!(Polynomial.analyze(&squares).unwrap().valid_options, vec![1]);
    }

    #[test]
    fn test_polynomial_finite_differences() {
        // n² + n: 2, 6, 12, 20, 30 -> 42
        let q = question("2, 6, 12, 20, 30, ?", &["40", "42", "44"]);
        let a = Polynomial.analyze(&q).unwrap();
        assert_eq!(a.valid_options, vec![1]);
        assert_eq!(a.details["degree"], "2");
        assert_eq!(a.confidence, 0.85);
    }

    #[test]
    fn test_factorial_forms() {
        let literals = question("1!, 2!, 3!, 4!, ?", &["5!", "120", "24"]);
        assert_eq!(Factorial.analyze(&literals).unwrap().valid_options, vec![0, 1]);

        let values = question("1, 2, 6, 24, ?", &["48", "120"]);
        assert_eq!(Factorial.analyze(&values).unwrap().valid_options, vec![1]);

        let indexed = question("n! pour n = 1, 2, 3, 4, 5 puis ?", &["720", "600"]);
        assert_eq!(Factorial.analyze(&indexed).unwrap().valid_options, vec![0]);
    }

    #[test]
    fn test_scaling() {
        let q = question("Taille: 0.5, 1, 2, 4, ?", &["6", "8", "16"]);
        let a = Scaling.analyze(&q).unwrap();
        assert_eq!(a.expected_next, OptionValue::Number(8.0));
        assert_eq!(a.valid_options, vec![1]);
    }

    #[test]
    fn test_scaling_rejects_unbounded_sizes() {
        let huge = "9".repeat(400);
        let q = question(&format!("Taille: {0}, {0}, {0}, ?", huge), &["1", "inf", "NaN"]);
        assert!(matches!(
            Scaling.analyze(&q),
            Err(RuleError::PatternMismatch { .. })
        ));
    }
}
