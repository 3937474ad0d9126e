// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # ravencheck: solution uniqueness for Raven-style quiz items
//!
//! Given a question (prompt text, optional stimulus, answer options and
//! the declared correct answer), ravencheck infers the generative rule
//! behind it, computes the answer that rule implies and checks that
//! exactly one option matches, and that it is the declared one.
//!
//! ## Core Concept
//!
//! A question is only **valid** when a recognized rule singles out one
//! option. Anything the engine cannot verify is reported, never guessed:
//!
//! - **Detect** the rule family from an ordered table of text predicates
//! - **Analyze** the question with that family's analyzer
//! - **Validate** uniqueness and agreement with the declared answer
//! - **Fall back** to an unverifiable result when no analyzer applies
//! - **Report** counts and issues over whole collections
//!
//! ## Quick Start
//!
//! ```rust
//! use ravencheck::{analyze, Question, RuleType, Verdict};
//!
//! let question = Question::new("Suite: 1, 4, 7, 10, ?")
//!     .with_options(["11", "12", "13", "14"])
//!     .with_correct_answer(2);
//!
//! let result = analyze(&question);
//! assert_eq!(result.rule_type, RuleType::ArithmeticSequence);
//! assert_eq!(result.verdict, Verdict::Valid);
//! assert_eq!(result.expected_answer, Some(2));
//! ```
//!
//! ## Rule Families
//!
//! | Family | Example | Confidence |
//! |--------|---------|------------|
//! | Arithmetic | `1, 4, 7, 10, ?` | 0.95 |
//! | Geometric | `2, 6, 18, 54, ?` | 0.9 |
//! | Fibonacci | `1, 1, 2, 3, 5, ?` | 0.95 |
//! | Power | `x, x², x³, x⁴, ?` | 0.95 / 0.9 |
//! | Prime | `7, 11, 13, 17, ?` | 0.9 |
//! | Polynomial | `1, 1, 2, 5, 14, ?` (Catalan) | 0.9 / 0.85 |
//! | Factorial | `1!, 2!, 3!, ?` | 0.9 |
//! | Letters | `A, C, E, G, ?` | 0.9 |
//! | Alternation | `★ ☆ ★ ☆ ?` | 0.9 |
//! | Rotation | `◐ ◓ ◑ ?` | 0.9 |
//! | Reflection | `miroir de ◐` | 0.8 |
//! | Scaling | `0.5, 1, 2, ?` | 0.8 |
//! | Matrix / grid | `[2][5] / [4][?]` | 0.9 / 0.85 |
//! | Analogy | `2 est à 4 comme 3 est à ?` | 0.85 / 0.75 |
//! | Logic | `p = vrai, q = faux: p → q` | 0.85 / 0.75 |
//! | Sets | `A = {1, 2}, B = {2, 3}: A ∩ B` | 0.9 |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                             │
//! │  QUESTION (content, stimulus, options, correctAnswer)       │
//! │       │                                                     │
//! │       ├──► Detector::detect() ──► RuleType                  │
//! │       │                                                     │
//! │       ├──► analyzers::run() ──► RuleAnalysis                │
//! │       │          │                                          │
//! │       │          └── RuleError ──► FallbackAnalyzer         │
//! │       │                                (Unverifiable)       │
//! │       │                                                     │
//! │       └──► Validator::validate() ──► Verdict                │
//! │                                                             │
//! │  COLLECTION                                                 │
//! │       │                                                     │
//! │       └──► analyze_collection() ──► CollectionReport        │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Verdicts
//!
//! | Verdict | `valid` | Meaning |
//! |---------|---------|---------|
//! | `valid` | ✓ | One option matches and it is the declared answer |
//! | `provisional` | ✓ | Accepted with a warning |
//! | `inconclusive` | ✗ | Low confidence, no single match |
//! | `invalid` | ✗ | Ambiguous or contradicted at high confidence |
//! | `unverifiable` | ✗ | No analyzer could verify the question |

// Core model
pub mod config;
pub mod error;
pub mod question;
pub mod rule;

// Pipeline
pub mod analyzers;
pub mod detect;
pub mod engine;
pub mod input;
pub mod report;
pub mod validate;

// Re-exports
pub use analyzers::{
    analyzer_for, FallbackAnalyzer, RuleAnalysis, RuleAnalyzer, StructureReport, Unverifiable,
};
pub use config::{DetectorConfig, EngineConfig, ReportConfig, StructureConfig};
pub use detect::{DetectionRule, Detector, Predicate};
pub use engine::{analyze, Engine, QuestionAnalysis, MANUAL_REVIEW};
pub use error::{Error, Result, RuleError};
pub use input::load_questions;
pub use question::{option_decimal, option_number, OptionValue, Question, QuestionOption};
pub use report::{analyze_collection, CollectionReport, ReportIssue};
pub use rule::RuleType;
pub use validate::{Thresholds, Validation, Validator, Verdict};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
