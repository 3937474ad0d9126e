//! CLI utility helpers

use ravencheck::{Engine, EngineConfig, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG: &str = "ravencheck.yaml";

pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Value following `--name` or its short form
pub fn flag_value<'a>(args: &'a [String], long: &str, short: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == long || a == short)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Arguments that are neither flags nor flag values, in order
pub fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        match arg.as_str() {
            "--config" | "-c" | "--output" | "-o" => skip_next = true,
            a if a.starts_with("--") => {}
            a => out.push(a),
        }
    }
    out
}

pub fn positional(args: &[String]) -> Option<&str> {
    positionals(args).first().copied()
}

/// Parse --output argument to determine output file path
pub fn parse_output_arg(args: &[String]) -> Option<PathBuf> {
    flag_value(args, "--output", "-o").map(PathBuf::from)
}

/// `--config <file>`, else `ravencheck.yaml` when present, else defaults
pub fn load_config(args: &[String]) -> Result<EngineConfig> {
    if let Some(path) = flag_value(args, "--config", "-c") {
        return EngineConfig::load(Path::new(path));
    }
    let default = Path::new(DEFAULT_CONFIG);
    if default.exists() {
        return EngineConfig::load(default);
    }
    Ok(EngineConfig::default())
}

pub fn load_engine(args: &[String]) -> Result<Engine> {
    Ok(Engine::new(load_config(args)?))
}

/// Write content to file or stdout
pub fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(p) => {
            fs::write(p, content).map_err(Error::Io)?;
            eprintln!("Written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
