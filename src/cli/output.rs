//! Handles all user-facing output for the CLI.
//!
//! Sums go to stdout, diagnostics to stderr. In JSON mode both outcomes are a
//! single object on stdout so scripts only have one stream to read.

use std::io;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::warn;

use crate::cli::args::OutputFormat;
use crate::diagnostics::{print_error, SumError};

/// Machine-readable outcome of one summation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonOutcome<'a> {
    Sum(i64),
    Error {
        kind: &'static str,
        code: &'static str,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        negatives: Option<&'a [String]>,
    },
}

impl<'a> JsonOutcome<'a> {
    pub fn new(result: &'a Result<i64, SumError>) -> Self {
        match result {
            Ok(sum) => JsonOutcome::Sum(*sum),
            Err(e) => JsonOutcome::Error {
                kind: e.error_type().as_str(),
                code: e.error_code(),
                message: e.to_string(),
                negatives: e.negatives(),
            },
        }
    }
}

/// Serializes an outcome as one line of JSON.
pub fn to_json(result: &Result<i64, SumError>) -> String {
    // Serializing plain integers and strings cannot fail.
    serde_json::to_string(&JsonOutcome::new(result)).unwrap_or_default()
}

/// Writes the outcome of summing `source_name` and reports whether it succeeded.
pub fn emit_outcome(result: Result<i64, SumError>, source_name: &str, format: OutputFormat) -> bool {
    let ok = result.is_ok();
    match format {
        OutputFormat::Json => println!("{}", to_json(&result)),
        OutputFormat::Text => match result {
            Ok(sum) => println!("{}", sum),
            Err(e) => print_error(e.with_source_name(source_name)),
        },
    }
    ok
}

/// Prints a short status line on stderr, e.g. a suite summary headline.
pub fn print_status(label: &str, message: &str, color: Color) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    if let Err(e) = write_status(&mut stderr, label, message, color) {
        warn!(error = %e, "failed to write status line");
    }
}

fn write_status<W: WriteColor>(out: &mut W, label: &str, message: &str, color: Color) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{}", label)?;
    out.reset()?;
    writeln!(out, " {}", message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::add_string;

    #[test]
    fn json_for_sum() {
        assert_eq!(to_json(&add_string("1,2,3")), r#"{"sum":6}"#);
    }

    #[test]
    fn json_for_negative_values() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&add_string("1,-1,-3"))).unwrap();
        assert_eq!(json["error"]["kind"], "negative_value");
        assert_eq!(json["error"]["code"], "strsum::negative_value");
        assert_eq!(
            json["error"]["message"],
            "Negative numbers not allowed: -1, -3"
        );
        assert_eq!(json["error"]["negatives"], serde_json::json!(["-1", "-3"]));
    }

    #[test]
    fn json_keeps_negatives_beyond_integer_range() {
        let json: serde_json::Value =
            serde_json::from_str(&to_json(&add_string("1,-99999999999999999999"))).unwrap();
        assert_eq!(json["error"]["kind"], "negative_value");
        assert_eq!(
            json["error"]["negatives"],
            serde_json::json!(["-99999999999999999999"])
        );
    }

    #[test]
    fn status_line_goes_through_one_stream() {
        let mut buffer = termcolor::Buffer::no_color();
        write_status(&mut buffer, "warning", "no test cases found", Color::Yellow).unwrap();
        assert_eq!(
            String::from_utf8(buffer.into_inner()).unwrap(),
            "warning no test cases found\n"
        );
    }

    #[test]
    fn json_for_invalid_input_omits_negatives() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&add_string("1,a"))).unwrap();
        assert_eq!(json["error"]["kind"], "invalid_input");
        assert!(json["error"].get("negatives").is_none());
    }
}
