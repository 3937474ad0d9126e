//! Rule detection command

use super::util::{has_flag, load_engine, positionals};
use ravencheck::*;

pub fn cmd_detect(args: &[String]) -> Result<()> {
    let text = positionals(args);
    if text.is_empty() {
        return Err("Usage: ravencheck detect <text> [--explain]".into());
    }
    let text = text.join(" ");

    let engine = load_engine(args)?;
    let detector = engine.detector();
    println!("{}", detector.detect_text(&text));

    if has_flag(args, "--explain") {
        let matches = detector.explain(&text);
        if matches.is_empty() {
            println!("  no detection rule matches");
        }
        for (i, rule) in matches.iter().enumerate() {
            let marker = if i == 0 { "→" } else { " " };
            println!("  {} {:<16} {}", marker, rule.name, rule.rule_type);
        }
    }
    Ok(())
}
