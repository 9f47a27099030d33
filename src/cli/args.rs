//! Defines the command-line arguments and subcommands for the strsum CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "strsum",
    version,
    about = "Sum delimited integer strings, rejecting malformed and negative values."
)]
pub struct StrsumArgs {
    /// Log pipeline activity to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sum the numbers in a literal argument.
    Add {
        /// The numbers, e.g. "1,2,3" or "//;\n1;2".
        #[arg(required = true, allow_hyphen_values = true)]
        input: String,
        /// Decode \n, \t, \r and \\ in the argument before summing.
        #[arg(short, long)]
        escapes: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Sum the numbers in a file.
    File {
        /// The path to the file to sum.
        #[arg(required = true)]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Discover and run all YAML regression suites in a directory.
    Test {
        /// The directory containing `.yaml` suites.
        #[arg(default_value = "tests/suites")]
        path: PathBuf,
        /// Only run cases whose name contains this substring.
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Start an interactive session.
    Repl,
}

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The sum on stdout, diagnostics on stderr
    Text,
    /// A single JSON object on stdout
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_accepts_leading_hyphen() {
        let args = StrsumArgs::try_parse_from(["strsum", "add", "-5"]).unwrap();
        match args.command {
            Command::Add { input, .. } => assert_eq!(input, "-5"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_defaults_to_suites_directory() {
        let args = StrsumArgs::try_parse_from(["strsum", "test"]).unwrap();
        match args.command {
            Command::Test { path, filter } => {
                assert_eq!(path, PathBuf::from("tests/suites"));
                assert!(filter.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn format_flag_parses_json() {
        let args =
            StrsumArgs::try_parse_from(["strsum", "-v", "file", "nums.txt", "--format", "json"])
                .unwrap();
        assert!(args.verbose);
        assert!(matches!(
            args.command,
            Command::File {
                format: OutputFormat::Json,
                ..
            }
        ));
    }
}
