//! Question records and normalized option values
//!
//! A [`Question`] is the read-only input of the engine. Option texts are
//! duck-typed in the content store (numbers, letters, glyphs, small
//! expressions), so every analyzer goes through [`OptionValue::parse`] or
//! [`option_number`] instead of re-parsing text on its own.

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::LazyLock;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\b[0-9]+\b").expect("integer pattern"));

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\b[0-9]+(?:[.,][0-9]+)?\b").expect("decimal pattern"));

/// A quiz item as exported by the content store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// External identifier, used in reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qid: Option<String>,

    /// Prompt text, may embed a sequence ending with `?`
    #[serde(default)]
    pub content: String,

    /// Supplementary symbols or text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stimulus: Option<String>,

    /// Answer options, in display order
    #[serde(default)]
    pub options: Vec<QuestionOption>,

    /// Index of the option the author declares correct
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<usize>,
}

/// One answer option
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub text: String,
    pub is_correct: bool,
}

impl QuestionOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_correct: false,
        }
    }

    pub fn correct(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_correct: true,
        }
    }

    /// Normalized value of this option
    pub fn value(&self) -> OptionValue {
        OptionValue::parse(&self.text)
    }
}

// Older exports store options as bare strings or numbers.
impl<'de> Deserialize<'de> for QuestionOption {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawOption {
            Text(String),
            Number(f64),
            Full {
                text: String,
                #[serde(default, rename = "isCorrect")]
                is_correct: bool,
            },
        }

        Ok(match RawOption::deserialize(deserializer)? {
            RawOption::Text(text) => QuestionOption::new(text),
            RawOption::Number(n) => QuestionOption::new(format_number(n)),
            RawOption::Full { text, is_correct } => QuestionOption { text, is_correct },
        })
    }
}

impl Question {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_qid(mut self, qid: impl Into<String>) -> Self {
        self.qid = Some(qid.into());
        self
    }

    pub fn with_stimulus(mut self, stimulus: impl Into<String>) -> Self {
        self.stimulus = Some(stimulus.into());
        self
    }

    /// Set options from plain texts; the declared answer (if any) gets `is_correct`
    pub fn with_options<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = texts.into_iter().map(QuestionOption::new).collect();
        self.sync_correct_flags();
        self
    }

    pub fn with_correct_answer(mut self, index: usize) -> Self {
        self.correct_answer = Some(index);
        self.sync_correct_flags();
        self
    }

    fn sync_correct_flags(&mut self) {
        for (i, option) in self.options.iter_mut().enumerate() {
            option.is_correct = self.correct_answer == Some(i);
        }
    }

    /// Content and stimulus joined by a space, as searched by detector and analyzers
    pub fn full_text(&self) -> String {
        format!("{} {}", self.content, self.stimulus.as_deref().unwrap_or(""))
    }

    /// Indices of options flagged `isCorrect`
    pub fn flagged_correct(&self) -> Vec<usize> {
        self.options
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_correct)
            .map(|(i, _)| i)
            .collect()
    }

    /// Stable hash of everything the engine reads
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.content.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.stimulus.as_deref().unwrap_or("").as_bytes());
        hasher.update([0u8]);
        for option in &self.options {
            hasher.update(option.text.as_bytes());
            hasher.update([u8::from(option.is_correct)]);
        }
        hasher.update([0u8]);
        if let Some(answer) = self.correct_answer {
            hasher.update((answer as u64).to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Normalized value of an option or of an expected answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OptionValue {
    Number(f64),
    Letter(char),
    Symbol(String),
}

impl OptionValue {
    /// Normalize option text: embedded integer, else single letter, else symbol
    pub fn parse(text: &str) -> Self {
        if let Some(n) = option_number(text) {
            return OptionValue::Number(n);
        }
        let trimmed = text.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {
                OptionValue::Letter(c.to_ascii_uppercase())
            }
            _ => OptionValue::Symbol(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            OptionValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn integer(n: i64) -> Self {
        OptionValue::Number(n as f64)
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Number(n) => f.write_str(&format_number(*n)),
            OptionValue::Letter(c) => write!(f, "{}", c),
            OptionValue::Symbol(s) => f.write_str(s),
        }
    }
}

/// First integer literal embedded in `text`
pub fn option_number(text: &str) -> Option<f64> {
    INTEGER
        .find(text)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .map(|n| n as f64)
}

/// First decimal literal embedded in `text` (`.` or `,` as separator)
pub fn option_decimal(text: &str) -> Option<f64> {
    DECIMAL
        .find(text)
        .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
}

pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
