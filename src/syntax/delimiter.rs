//! Delimiter resolution.
//!
//! Input may open with a declaration of the form `//<delimiter>\n`, which
//! replaces the comma as the separator for the rest of the input. Newline is a
//! separator in every case.

use crate::diagnostics::SumError;
use crate::err_ctx;
use crate::syntax::Span;

/// Marker that opens a custom delimiter declaration.
pub const DECLARATION_MARKER: &str = "//";

/// Separator used when no declaration is present.
pub const DEFAULT_DELIMITER: &str = ",";

/// Line separator, applied before the resolved delimiter.
pub const LINE_SEPARATOR: char = '\n';

const DECLARATION_HELP: &str =
    "declare a custom delimiter as `//<delimiter>` followed by a newline, e.g. \"//;\\n1;2;3\"";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delimiter {
    /// Comma
    Default,
    /// Literal, non-empty, whitespace-free separator from a declaration
    Custom(String),
}

impl Delimiter {
    pub fn as_str(&self) -> &str {
        match self {
            Delimiter::Default => DEFAULT_DELIMITER,
            Delimiter::Custom(delimiter) => delimiter,
        }
    }
}

/// The delimiter to split on and the text left to tokenize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub delimiter: Delimiter,
    pub body: &'a str,
    /// Byte offset of `body` within the original input.
    pub offset: usize,
}

/// Resolves the delimiter for `input`.
///
/// Returns `Ok(None)` when there is nothing to sum: the input is empty or
/// blank, or a valid declaration is followed by nothing.
pub fn resolve(input: &str) -> Result<Option<Resolved<'_>>, SumError> {
    if input.trim().is_empty() {
        return Ok(None);
    }

    let Some(rest) = input.strip_prefix(DECLARATION_MARKER) else {
        return Ok(Some(Resolved {
            delimiter: Delimiter::Default,
            body: input,
            offset: 0,
        }));
    };

    let marker_len = DECLARATION_MARKER.len();
    let Some(terminator) = rest.find(LINE_SEPARATOR) else {
        return Err(err_ctx!(
            InvalidInput,
            format!(
                "Invalid input: custom delimiter declaration has no terminating newline: {}",
                input
            ),
            input,
            Span::new(0, input.len()),
            DECLARATION_HELP
        ));
    };

    let declared = &rest[..terminator];
    if declared.is_empty() {
        return Err(err_ctx!(
            InvalidInput,
            format!("Invalid input: custom delimiter is empty: {}", input),
            input,
            Span::new(0, marker_len + 1),
            DECLARATION_HELP
        ));
    }

    if declared.chars().any(char::is_whitespace) {
        return Err(err_ctx!(
            InvalidInput,
            format!(
                "Invalid input: custom delimiter {:?} contains whitespace: {}",
                declared, input
            ),
            input,
            Span::new(marker_len, marker_len + terminator),
            "a custom delimiter must not contain spaces, tabs or other blank characters"
        ));
    }

    let offset = marker_len + terminator + LINE_SEPARATOR.len_utf8();
    let body = &input[offset..];
    if body.is_empty() {
        return Ok(None);
    }

    Ok(Some(Resolved {
        delimiter: Delimiter::Custom(declared.to_string()),
        body,
        offset,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorType;

    fn resolved(input: &str) -> Resolved<'_> {
        resolve(input).unwrap().expect("expected something to sum")
    }

    #[test]
    fn blank_input_has_nothing_to_sum() {
        assert_eq!(resolve("").unwrap(), None);
        assert_eq!(resolve("   ").unwrap(), None);
        assert_eq!(resolve("\n\t\r\n").unwrap(), None);
    }

    #[test]
    fn default_delimiter_keeps_whole_input() {
        let r = resolved("1,2\n3");
        assert_eq!(r.delimiter, Delimiter::Default);
        assert_eq!(r.body, "1,2\n3");
        assert_eq!(r.offset, 0);
    }

    #[test]
    fn custom_declaration_is_stripped() {
        let r = resolved("//;\n1;2");
        assert_eq!(r.delimiter, Delimiter::Custom(";".into()));
        assert_eq!(r.body, "1;2");
        assert_eq!(r.offset, 4);

        let r = resolved("//**\n1**2");
        assert_eq!(r.delimiter.as_str(), "**");
        assert_eq!(r.body, "1**2");
    }

    #[test]
    fn declaration_without_numbers_sums_nothing() {
        assert_eq!(resolve("//;\n").unwrap(), None);
    }

    #[test]
    fn missing_terminator_is_invalid() {
        let err = resolve("//;1;2").unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InvalidInput);
        assert!(err.to_string().contains("no terminating newline"));
    }

    #[test]
    fn empty_delimiter_is_invalid() {
        let err = resolve("//\n1,2").unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InvalidInput);
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn whitespace_in_delimiter_is_invalid() {
        for input in ["// ;\n1;2", "//; \n1;2", "//a b\n1a b2", "//;\r\n1;2", "//\t\n1"] {
            let err = resolve(input).unwrap_err();
            assert_eq!(err.error_type(), ErrorType::InvalidInput, "input {:?}", input);
        }
    }

    #[test]
    fn leading_whitespace_disables_declaration() {
        let r = resolved(" //;\n1");
        assert_eq!(r.delimiter, Delimiter::Default);
    }
}
