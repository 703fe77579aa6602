//! clausal CLI: driving adapter for the clausal pattern matcher.
//!
//! Subcommands:
//! - `match <pattern> --value <json>`: match a JSON value against a pattern config
//! - `check <pattern>`: validate a pattern config compiles
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (off by default).

use std::path::Path;
use std::process;

use clausal::config::PatternConfig;
use clausal::{build_match, CompiledPattern, Value};
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "match" => cmd_match(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_match(args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        return Err("match requires a pattern file path".into());
    }

    let compiled = load_pattern(&args[0])?;
    let value = parse_value(&args[1..])?;

    tracing::debug!(value = %value, "matching");
    println!("{}", render_match(&compiled, &value));
    Ok(())
}

fn cmd_check(args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        return Err("check requires a pattern file path".into());
    }

    let compiled = load_pattern(&args[0])?;
    println!(
        "Pattern valid ({} binding{})",
        compiled.binding_count(),
        if compiled.binding_count() == 1 { "" } else { "s" }
    );
    Ok(())
}

/// Bindings as a JSON array, or `(no match)`.
fn render_match(compiled: &CompiledPattern, value: &Value) -> String {
    match compiled.bind(value) {
        Some(bindings) => {
            let json: Vec<serde_json::Value> = bindings.iter().map(Value::to_json).collect();
            serde_json::Value::Array(json).to_string()
        }
        None => "(no match)".to_owned(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Pattern loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_pattern(path: &str) -> Result<CompiledPattern, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read \"{path}\": {e}"))?;

    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config = parse_config(&content, is_json)?;
    build_match(&config.into_pattern()).map_err(|e| format!("pattern invalid: {e}"))
}

fn parse_config(content: &str, is_json: bool) -> Result<PatternConfig, String> {
    if is_json {
        serde_json::from_str(content).map_err(|e| format!("JSON parse error: {e}"))
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(content).map_err(|e| format!("YAML parse error: {e}"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_value(args: &[String]) -> Result<Value, String> {
    match args {
        [flag, json] if flag == "--value" => serde_json::from_str::<serde_json::Value>(json)
            .map(Value::from)
            .map_err(|e| format!("invalid --value JSON: {e}")),
        [flag] if flag == "--value" => Err("--value requires a JSON argument".into()),
        [] => Err("match requires --value <json>".into()),
        [other, ..] => Err(format!("unexpected argument \"{other}\"")),
    }
}

const USAGE: &str = "Usage: clausal <command> [options]

Commands:
  match <pattern> --value <json>   Match a JSON value against a pattern config
  check <pattern>                  Validate a pattern config
  help                             Show this help

Pattern configs are YAML, or JSON when the file ends in .json.
Set RUST_LOG=debug to log each value as it is matched (stderr).";

fn print_usage() {
    eprintln!("{USAGE}");
}
