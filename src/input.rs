//! Loading question exports
//!
//! Exports are JSON (a single question or an array) or YAML, chosen by
//! file extension. Unknown extensions are tried as JSON, then YAML.

use crate::error::{Error, Result};
use crate::question::Question;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum Export {
    Many(Vec<Question>),
    One(Box<Question>),
}

impl From<Export> for Vec<Question> {
    fn from(export: Export) -> Self {
        match export {
            Export::Many(questions) => questions,
            Export::One(question) => vec![*question],
        }
    }
}

/// Read every question stored in `path`
pub fn load_questions(path: &Path) -> Result<Vec<Question>> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    let parsed = match extension.as_deref() {
        Some("json") => parse_json(&content),
        Some("yaml") | Some("yml") => parse_yaml(&content),
        _ => parse_json(&content).or_else(|_| parse_yaml(&content)),
    };
    parsed.map_err(|e| Error::Input(format!("{}: {}", path.display(), e)))
}

/// Parse a JSON export
pub fn parse_json(content: &str) -> Result<Vec<Question>> {
    let export: Export = serde_json::from_str(content)?;
    Ok(export.into())
}

/// Parse a YAML export
pub fn parse_yaml(content: &str) -> Result<Vec<Question>> {
    let export: Export = serde_norway::from_str(content)?;
    Ok(export.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_object() {
        let questions = parse_json(r#"{"content": "1, 2, 3, 4, ?", "options": ["5"]}"#).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options[0].text, "5");
    }

    #[test]
    fn test_yaml_array() {
        let yaml = r#"
- qid: Q1
  content: "Suite: 2, 4, 6, 8, ?"
  options: ["9", "10", "12", "14"]
  correctAnswer: 1
- qid: Q2
  content: "A, C, E, G, ?"
  options:
    - text: H
      isCorrect: false
    - text: I
      isCorrect: true
"#;
        let questions = parse_yaml(yaml).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct_answer, Some(1));
        assert_eq!(questions[1].flagged_correct(), vec![1]);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_json("[1, 2").is_err());
    }
}
