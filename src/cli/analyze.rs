//! Per-question analysis command

use super::util::{has_flag, load_engine, parse_output_arg, positional, write_output};
use ravencheck::*;
use std::path::Path;

pub fn cmd_analyze(args: &[String]) -> Result<()> {
    let Some(path) = positional(args) else {
        return Err("Usage: ravencheck analyze <questions.json|yaml> [--json] [--config <file>]".into());
    };
    let json_output = has_flag(args, "--json");
    let output = parse_output_arg(args);

    let engine = load_engine(args)?;
    let questions = load_questions(Path::new(path))?;
    let results: Vec<QuestionAnalysis> = questions.iter().map(|q| engine.analyze(q)).collect();

    let rendered = if json_output {
        serde_json::to_string_pretty(&results)?
    } else {
        let mut out = String::new();
        for result in &results {
            out.push_str(&result.to_report());
            out.push('\n');
        }
        let valid = results.iter().filter(|r| r.valid).count();
        out.push_str(&format!("{}/{} questions valid", valid, results.len()));
        out
    };
    write_output(&output, &rendered)?;

    let invalid = results.iter().filter(|r| !r.valid).count();
    if invalid == 0 {
        Ok(())
    } else {
        Err(format!("{} question(s) failed validation", invalid).into())
    }
}
