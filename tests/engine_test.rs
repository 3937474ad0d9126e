//! End-to-end tests: detection, analysis and validation of full questions

use pretty_assertions::assert_eq;
use ravencheck::*;
use rstest::rstest;

fn question(content: &str, options: &[&str], correct: usize) -> Question {
    Question::new(content)
        .with_options(options.iter().copied())
        .with_correct_answer(correct)
}

#[rstest]
#[case::arithmetic("Suite: 1, 4, 7, 10, ?", &["11", "12", "13", "14"], 2, RuleType::ArithmeticSequence)]
#[case::geometric("Suite: 2, 6, 18, 54, ?", &["108", "162", "216", "324"], 1, RuleType::GeometricSequence)]
#[case::fibonacci("Fibonacci: 1, 1, 2, 3, 5, ?", &["7", "8", "9", "10"], 1, RuleType::FibonacciSequence)]
#[case::prime("Nombres premiers: 7, 11, 13, 17, ?", &["18", "19", "21", "23"], 1, RuleType::PrimeSequence)]
#[case::catalan("Catalan: 1, 1, 2, 5, 14, ?", &["28", "42", "44", "56"], 1, RuleType::PolynomialSequence)]
#[case::factorial("1!, 2!, 3!, 4!, ?", &["5!", "100", "24", "60"], 0, RuleType::FactorialSequence)]
#[case::power("Progression: x, x², x³, x⁴, ?", &["x⁵", "x⁴", "5x", "x+5"], 0, RuleType::PowerSequence)]
#[case::letters("Lettres: A, C, E, G, ?", &["H", "I", "J", "K"], 1, RuleType::LetterProgression)]
#[case::alternation("★ ☆ ★ ☆ ?", &["★", "☆", "●", "○"], 0, RuleType::SymbolAlternation)]
#[case::rotation("Rotation: ◐ ◓ ◑ ?", &["◐", "◒", "◓", "◑"], 1, RuleType::RotationPattern)]
#[case::analogy("Analogie: 2 est à 4 comme 3 est à ?", &["5", "6", "9", "12"], 2, RuleType::AnalogyPattern)]
#[case::implication("Si p = vrai et q = faux, que vaut p → q ?", &["Vrai", "Faux", "Indéterminé", "Aucune"], 1, RuleType::LogicalImplication)]
#[case::sets("A = {1, 2, 3}, B = {3, 4}. Que vaut A ∪ B ?", &["{1, 2, 3, 4}", "{3}", "{1, 2}", "∅"], 0, RuleType::SetTheory)]
#[case::matrix("Matrice 2x2: [→][↓] / [↑][?]", &["←", "→", "↓", "↑"], 1, RuleType::MatrixPattern)]
#[case::grid("Complétez la grille: [●][■][▲] [■][▲][●] [▲][●][?]", &["●", "■", "▲", "◆"], 1, RuleType::GridCompletion)]
fn test_family_end_to_end(
    #[case] content: &str,
    #[case] options: &[&str],
    #[case] correct: usize,
    #[case] rule_type: RuleType,
) {
    let result = analyze(&question(content, options, correct));
    assert_eq!(result.rule_type, rule_type);
    assert_eq!(result.verdict, Verdict::Valid, "{}", result.to_report());
    assert!(result.valid);
    assert_eq!(result.expected_answer, Some(correct));
    assert!(result.errors.is_empty());
    assert!(result.analysis.is_some());
    assert!(result.structure.is_none());
}

#[test]
fn test_arithmetic_scenario() {
    let q = Question::new("Suite: 1, 4, 7, 10, ?")
        .with_options(["11", "12", "13", "14"])
        .with_correct_answer(2);
    let result = analyze(&q);
    assert_eq!(result.rule_type, RuleType::ArithmeticSequence);
    assert_eq!(result.expected_answer, Some(2));
    assert!(result.valid);
}

#[test]
fn test_arithmetic_correctness() {
    let q = question("Suite: 2, 4, 6, 8, ?", &["9", "10", "11", "12"], 1);
    let result = analyze(&q);
    assert_eq!(result.expected_next, Some(OptionValue::Number(10.0)));
    assert_eq!(result.valid_options, vec![1]);
    assert!(result.valid);
}

#[test]
fn test_geometric_correctness() {
    let q = question("2, 6, 18, 54, ?", &["108", "162", "216", "324"], 1);
    let result = analyze(&q);
    assert_eq!(result.expected_next, Some(OptionValue::Number(162.0)));
    assert_eq!(result.valid_options, vec![1]);
}

#[test]
fn test_fibonacci_correctness() {
    let q = question("1, 1, 2, 3, 5, ?", &["6", "7", "8", "9"], 2);
    let result = analyze(&q);
    assert_eq!(result.rule_type, RuleType::FibonacciSequence);
    assert_eq!(result.expected_next, Some(OptionValue::Number(8.0)));
}

#[test]
fn test_two_matching_options_are_ambiguous() {
    let q = question("Suite: 2, 4, 6, 8, ?", &["10", "12", "10", "14"], 0);
    let result = analyze(&q);
    assert_eq!(result.valid_options, vec![0, 2]);
    assert!(result.confidence > 0.8);
    assert_eq!(result.verdict, Verdict::Invalid);
    assert!(!result.valid);
    assert_eq!(result.expected_answer, None);
    assert!(result.errors[0].starts_with("2 options satisfy the rule"));
}

#[test]
fn test_no_matching_option() {
    let q = question("Suite: 2, 4, 6, 8, ?", &["9", "11", "13", "15"], 0);
    let result = analyze(&q);
    assert_eq!(result.verdict, Verdict::Invalid);
    assert_eq!(result.errors, vec!["No option satisfies the detected rule"]);
}

#[test]
fn test_geometric_zero_is_not_a_crash() {
    let q = question("Suite géométrique: 0, 3, 9, 27, ?", &["81", "54", "36", "0"], 0);
    let result = analyze(&q);
    assert_eq!(result.rule_type, RuleType::GeometricSequence);
    assert_eq!(result.verdict, Verdict::Unverifiable);
    assert!(!result.valid);
    assert!(result.errors[0].contains("division by zero"));
    assert_eq!(result.errors[1], MANUAL_REVIEW);
}

#[test]
fn test_named_sequence_beats_generic_run() {
    let q = question("Fibonacci: 2, 4, 6, 8, ?", &["10", "12", "14", "16"], 0);
    let result = analyze(&q);
    assert_eq!(result.rule_type, RuleType::FibonacciSequence);
    // 2, 4, 6, 8 is no Fibonacci run, so the claim cannot be verified
    assert_eq!(result.verdict, Verdict::Unverifiable);
}

#[test]
fn test_unrecognized_question_is_never_valid() {
    let q = question(
        "Quelle figure complète la série ?",
        &["A", "B", "C", "D"],
        3,
    );
    let result = analyze(&q);
    assert_eq!(result.rule_type, RuleType::Unknown);
    assert!(!result.valid);
    assert_eq!(
        result.errors,
        vec![
            "Pattern not recognized (options: 4, correct flag: yes, content: yes)".to_string(),
            MANUAL_REVIEW.to_string(),
        ]
    );
    assert_eq!(result.warnings, vec!["Pattern not recognized automatically"]);
}

#[test]
fn test_empty_options_fall_back() {
    let q = Question::new("Suite: 1, 4, 7, 10, ?");
    let result = analyze(&q);
    assert_eq!(result.verdict, Verdict::Unverifiable);
    assert!(result
        .warnings
        .iter()
        .any(|w| w.starts_with("Unusual option count: 0")));
}

#[test]
fn test_stimulus_is_searched() {
    let q = Question::new("Quelle est la suite ?")
        .with_stimulus("3, 6, 9, 12, ?")
        .with_options(["13", "14", "15", "16"])
        .with_correct_answer(2);
    let result = analyze(&q);
    assert_eq!(result.rule_type, RuleType::ArithmeticSequence);
    assert!(result.valid);
}

#[test]
fn test_soft_disagreement_is_provisional() {
    // letter shift analogies carry a confidence under the hard threshold
    let q = question("A est à C comme M est à ?", &["N", "O", "P", "Q"], 0);
    let result = analyze(&q);
    assert_eq!(result.verdict, Verdict::Provisional);
    assert!(result.valid);
    assert!(result.errors.is_empty());
    assert!(result.warnings[0].starts_with("Possible inconsistency"));
}

#[test]
fn test_disabled_family_is_skipped() {
    let config = EngineConfig::from_yaml("detector:\n  disabled: [fibonacci_sequence]\n").unwrap();
    let engine = Engine::new(config);
    let q = question("Fibonacci: 1, 1, 2, 3, 5, ?", &["7", "8", "9", "10"], 1);
    assert_ne!(engine.analyze(&q).rule_type, RuleType::FibonacciSequence);
}

#[test]
fn test_json_shape() {
    let q = question("Suite: 1, 4, 7, 10, ?", &["11", "12", "13", "14"], 2).with_qid("Q42");
    let value = serde_json::to_value(analyze(&q)).unwrap();
    assert_eq!(value["questionId"], "Q42");
    assert_eq!(value["ruleType"], "arithmetic_sequence");
    assert_eq!(value["verdict"], "valid");
    assert_eq!(value["validOptions"], serde_json::json!([2]));
    assert_eq!(value["expectedAnswer"], 2);
    assert!(value.get("structure").is_none());
}

#[test]
fn test_collection_report() {
    let questions = vec![
        question("Suite: 1, 4, 7, 10, ?", &["11", "12", "13", "14"], 2).with_qid("ok"),
        question("Suite: 2, 4, 6, 8, ?", &["10", "12", "10", "14"], 0).with_qid("ambiguous"),
        question("Quelle figure ?", &["A", "B", "C", "D"], 0).with_qid("unknown"),
    ];
    let report = analyze_collection(&Engine::default(), &questions);
    assert_eq!(report.total, 3);
    assert_eq!(report.valid_count, 1);
    assert_eq!(report.invalid_count, 2);
    assert_eq!(report.issues.len(), 2);
    assert_eq!(
        report.rule_type_distribution[&RuleType::ArithmeticSequence],
        2
    );
    assert!(!report.meets_threshold(95.0));
    assert!(report.to_report().contains("COLLECTION REPORT"));
}
