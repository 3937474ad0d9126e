//! Property-based tests for the analysis pipeline
//!
//! Uses proptest to generate random questions and verify invariants

use proptest::prelude::*;
use ravencheck::*;

proptest! {
    #[test]
    fn test_analysis_is_deterministic(q in any_question()) {
        let engine = Engine::default();
        let first = serde_json::to_string(&engine.analyze(&q)).unwrap();
        let second = serde_json::to_string(&engine.analyze(&q)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_unverifiable_is_never_valid(q in any_question()) {
        let result = analyze(&q);
        if result.verdict == Verdict::Unverifiable || result.rule_type == RuleType::Unknown {
            prop_assert!(!result.valid);
            prop_assert!(!result.errors.is_empty());
        }
    }

    #[test]
    fn test_unknown_rule_is_never_valid(q in any_question()) {
        let result = Engine::default().analyze_rule(&q, RuleType::Unknown);
        prop_assert!(!result.valid);
        prop_assert_eq!(result.errors.len(), 2);
        prop_assert_eq!(result.errors[1].as_str(), MANUAL_REVIEW);
    }

    #[test]
    fn test_valid_implies_single_expected_answer(q in any_question()) {
        let result = analyze(&q);
        if result.verdict == Verdict::Valid {
            prop_assert_eq!(result.valid_options.len(), 1);
            prop_assert_eq!(result.expected_answer, q.correct_answer);
        }
    }

    #[test]
    fn test_confidence_bounds(q in any_question()) {
        let result = analyze(&q);
        prop_assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn test_generated_arithmetic_questions(
        start in 1i64..100,
        step in 1i64..20,
        slot in 0usize..4,
    ) {
        let terms: Vec<String> = (0..4).map(|i| (start + i * step).to_string()).collect();
        let next = start + 4 * step;
        let mut options: Vec<String> = (1..=3).map(|k| (next + k).to_string()).collect();
        options.insert(slot, next.to_string());

        let q = Question::new(format!("Suite: {}, ?", terms.join(", ")))
            .with_options(options)
            .with_correct_answer(slot);
        let result = analyze(&q);

        prop_assert_eq!(result.rule_type, RuleType::ArithmeticSequence);
        prop_assert!(result.valid);
        prop_assert_eq!(result.expected_answer, Some(slot));
    }
}

fn any_question() -> impl Strategy<Value = Question> {
    let content = prop_oneof![
        "[A-Za-z ,?]{0,40}",
        "[0-9, ?]{0,30}",
        Just("Suite: 1, 4, 7, 10, ?".to_string()),
        Just("Fibonacci: 2, 4, 6, 8, ?".to_string()),
        Just("Rotation: ◐ ◑ ?".to_string()),
        Just("A = {1}. A ∪ C ?".to_string()),
        Just("Matrice 3x3".to_string()),
    ];
    let options = prop::collection::vec("[A-Za-z0-9!{}, ]{0,8}", 0..7);
    (content, options, prop::option::of(0usize..7)).prop_map(|(content, options, correct)| {
        let mut q = Question::new(content).with_options(options);
        q.correct_answer = correct;
        q
    })
}
