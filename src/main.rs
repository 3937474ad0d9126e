//! ravencheck CLI
//!
//! Commands:
//!   analyze  - Analyze every question of an export
//!   report   - Summarize a collection, fail below the success rate
//!   detect   - Show which rule family a text is detected as
//!   schema   - Print JSON schemas

mod cli;

use cli::*;
use ravencheck::VERSION;
use std::process::ExitCode;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    init_logging(args.iter().any(|a| a == "--verbose"));

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let rest: Vec<String> = args[2..]
        .iter()
        .filter(|a| a.as_str() != "--verbose")
        .cloned()
        .collect();

    let result = match args[1].as_str() {
        "analyze" => cmd_analyze(&rest),
        "report" => cmd_report(&rest),
        "detect" => cmd_detect(&rest),
        "schema" => cmd_schema(&rest),
        "version" | "--version" | "-v" => {
            println!("ravencheck {}", VERSION);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Err("Unknown command".into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let level = if verbose { "ravencheck=debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn print_usage() {
    println!(
        r#"
ravencheck - Solution uniqueness checks for Raven-style quiz items

USAGE:
    ravencheck <COMMAND> [OPTIONS]

COMMANDS:
    analyze <questions.json|yaml>    Analyze each question, fail if any is invalid
    report <questions.json|yaml>     Collection report, fail below min_success_rate
    detect <text> [--explain]        Print the detected rule family
    schema [name]                    Print JSON schema (question, analysis, report, config)
    version                          Print version
    help                             Show this message

OPTIONS:
    --json                           JSON output (analyze, report)
    --config <file>                  Engine config (default: ./ravencheck.yaml if present)
    --output <file>                  Output file (default: stdout)
    --verbose                        Debug logging (RUST_LOG also honoured)

EXAMPLES:
    ravencheck analyze questions.json
    ravencheck report export.yaml --config strict.yaml
    ravencheck detect "Suite: 2, 6, 18, 54, ?" --explain
    ravencheck schema analysis > analysis.schema.json
"#
    );
}
