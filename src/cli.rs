//! The strsum Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::{fs, path::Path, process};

use clap::Parser;
use miette::{miette, IntoDiagnostic, WrapErr};
use termcolor::Color;
use tracing::{debug, info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    add_string,
    diagnostics::print_report,
    harness::{self, TestConfig},
    repl,
};

pub mod args;
pub mod output;

use args::{Command, OutputFormat, StrsumArgs};
use output::{emit_outcome, print_status};

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = StrsumArgs::parse();
    init_tracing(args.verbose);

    let ok = match args.command {
        Command::Add {
            input,
            escapes,
            format,
        } => handle_add(&input, escapes, format),
        Command::File { file, format } => handle_file(&file, format),
        Command::Test { path, filter } => handle_test(&path, filter.as_deref()),
        Command::Repl => handle_repl(),
    };

    if !ok {
        process::exit(1);
    }
}

/// Installs a stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

// ============================================================================
// SUBCOMMAND HANDLERS
// ============================================================================

fn handle_add(input: &str, escapes: bool, format: OutputFormat) -> bool {
    let input = if escapes {
        decode_escapes(input)
    } else {
        input.to_string()
    };
    debug!(input = %input.escape_debug(), "summing argument");
    emit_outcome(add_string(&input), "<argument>", format)
}

fn handle_file(path: &Path, format: OutputFormat) -> bool {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(report) => {
            print_report(report);
            return false;
        }
    };
    info!(path = %path.display(), bytes = source.len(), "summing file");
    emit_outcome(add_string(&source), &path.display().to_string(), format)
}

fn handle_test(path: &Path, filter: Option<&str>) -> bool {
    if !path.is_dir() {
        print_report(miette!("test suite directory '{}' does not exist", path.display()));
        return false;
    }

    let config = TestConfig {
        test_root: path.to_path_buf(),
        ..TestConfig::default()
    };
    let filter = filter.map(str::to_lowercase);
    let summary = harness::run_all_tests(filter.as_deref(), &config);

    if summary.total() == 0 {
        warn!(root = %path.display(), "no test cases found");
        print_status(
            "warning:",
            &format!("no test cases found under {}", path.display()),
            Color::Yellow,
        );
    }
    summary.failed == 0
}

fn handle_repl() -> bool {
    match repl::run_repl() {
        Ok(()) => true,
        Err(e) => {
            print_report(miette!("REPL terminated: {}", e));
            false
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn read_source(path: &Path) -> miette::Result<String> {
    fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read '{}'", path.display()))
}

/// Decodes `\n`, `\t`, `\r` and `\\`. Any other backslash is kept as typed.
pub fn decode_escapes(raw: &str) -> String {
    let mut decoded = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            decoded.push(ch);
            continue;
        }
        let replacement = match chars.peek() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('\\') => '\\',
            _ => {
                decoded.push('\\');
                continue;
            }
        };
        chars.next();
        decoded.push(replacement);
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_escapes() {
        assert_eq!(decode_escapes(r"//;\n1;2"), "//;\n1;2");
        assert_eq!(decode_escapes(r"\t1,\r2"), "\t1,\r2");
        assert_eq!(decode_escapes(r"a\\nb"), r"a\nb");
    }

    #[test]
    fn keeps_unknown_and_trailing_backslashes() {
        assert_eq!(decode_escapes(r"1\q2"), r"1\q2");
        assert_eq!(decode_escapes("1,2\\"), "1,2\\");
    }
}
