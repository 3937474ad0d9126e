//! Collection report command

use super::util::{has_flag, load_engine, parse_output_arg, positional, write_output};
use ravencheck::*;
use std::path::Path;

pub fn cmd_report(args: &[String]) -> Result<()> {
    let Some(path) = positional(args) else {
        return Err("Usage: ravencheck report <questions.json|yaml> [--json] [--config <file>]".into());
    };
    let json_output = has_flag(args, "--json");
    let output = parse_output_arg(args);

    let engine = load_engine(args)?;
    let questions = load_questions(Path::new(path))?;
    let report = analyze_collection(&engine, &questions);

    let rendered = if json_output {
        serde_json::to_string_pretty(&report)?
    } else {
        report.to_report()
    };
    write_output(&output, &rendered)?;

    let min = engine.config().report.min_success_rate;
    if report.meets_threshold(min) {
        Ok(())
    } else {
        Err(format!(
            "Success rate {:.1}% is below the required {:.1}%",
            report.success_rate, min
        )
        .into())
    }
}
