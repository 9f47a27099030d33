//! Unified, `miette`-based diagnostics for the summation parser.
//!
//! Every failure the parser can produce is a [`SumError`]. There are exactly two
//! kinds, and callers are expected to tell them apart by matching on the variant
//! (or on [`SumError::error_type`]), never by inspecting message text:
//!
//! - [`SumError::InvalidInput`]: a malformed token, a malformed custom delimiter
//!   declaration, or a sum that does not fit the integer range.
//! - [`SumError::NegativeValue`]: one or more negative values, all of them listed.
//!
//! # Error Construction
//!
//! - Use `err_ctx!(InvalidInput, msg, input, span)` (optionally with a trailing
//!   help message) for invalid input tied to a span of the original input.
//! - Use [`negative_values`] for the negative-value failure; it labels every
//!   offending token.
//!
//! Do not build `ErrorContext` by hand outside this module.

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use crate::syntax::Span;

pub type SourceArc = Arc<NamedSource<String>>;

/// Name given to the input source when the caller does not provide one.
pub const DEFAULT_SOURCE_NAME: &str = "input";

/// Type-safe classification of a [`SumError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Malformed tokens, malformed delimiter declarations, out-of-range sums
    InvalidInput,
    /// Negative values present in otherwise well-formed input
    NegativeValue,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::InvalidInput => "invalid_input",
            ErrorType::NegativeValue => "negative_value",
        }
    }

    /// Stable diagnostic code, also used by the YAML harness.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorType::InvalidInput => "strsum::invalid_input",
            ErrorType::NegativeValue => "strsum::negative_value",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An additional labeled span, rendered alongside the primary one.
#[derive(Debug, Clone)]
pub struct RelatedLabel {
    pub span: Span,
    pub label: String,
}

/// Source, span and help attached to an error for rendering.
#[derive(Debug, Default, Clone)]
pub struct ErrorContext {
    pub source: Option<SourceArc>,
    pub span: Option<Span>,
    pub help: Option<String>,
    pub related: Vec<RelatedLabel>,
}

/// The two ways summation can fail.
#[derive(Debug, Error)]
pub enum SumError {
    #[error("{message}")]
    InvalidInput {
        message: String,
        /// The original, untrimmed input.
        input: String,
        ctx: ErrorContext,
    },
    #[error("Negative numbers not allowed: {}", format_values(.values))]
    NegativeValue {
        /// Every negative value in input order, as canonical decimal text.
        values: Vec<String>,
        ctx: ErrorContext,
    },
}

impl SumError {
    fn get_ctx(&self) -> &ErrorContext {
        match self {
            SumError::InvalidInput { ctx, .. } => ctx,
            SumError::NegativeValue { ctx, .. } => ctx,
        }
    }

    fn get_ctx_mut(&mut self) -> &mut ErrorContext {
        match self {
            SumError::InvalidInput { ctx, .. } => ctx,
            SumError::NegativeValue { ctx, .. } => ctx,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            SumError::InvalidInput { .. } => ErrorType::InvalidInput,
            SumError::NegativeValue { .. } => ErrorType::NegativeValue,
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.error_type().code()
    }

    /// The negative values that caused the failure, if that is what failed.
    pub fn negatives(&self) -> Option<&[String]> {
        match self {
            SumError::NegativeValue { values, .. } => Some(values.as_slice()),
            SumError::InvalidInput { .. } => None,
        }
    }

    /// The original input, when the error carries one.
    pub fn input(&self) -> Option<&str> {
        match self {
            SumError::InvalidInput { input, .. } => Some(input.as_str()),
            SumError::NegativeValue { ctx, .. } => {
                ctx.source.as_ref().map(|source| source.inner().as_str())
            }
        }
    }

    /// Renames the attached source, e.g. to a file path or `<repl:3>`.
    pub fn with_source_name(mut self, name: impl AsRef<str>) -> Self {
        let ctx = self.get_ctx_mut();
        if let Some(source) = ctx.source.take() {
            ctx.source = Some(Arc::new(NamedSource::new(
                name.as_ref(),
                source.inner().clone(),
            )));
        }
        self
    }

    fn primary_label(&self) -> String {
        match self {
            SumError::InvalidInput { .. } => "invalid here".into(),
            SumError::NegativeValue { .. } => "negative value".into(),
        }
    }
}

impl Diagnostic for SumError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(self.error_code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ctx = self.get_ctx();
        let mut labels = Vec::new();
        if let Some(span) = ctx.span {
            labels.push(LabeledSpan::new(
                Some(self.primary_label()),
                span.start,
                span.len().max(1),
            ));
        }
        for rel in &ctx.related {
            labels.push(LabeledSpan::new(
                Some(rel.label.clone()),
                rel.span.start,
                rel.span.len().max(1),
            ));
        }
        if labels.is_empty() {
            None
        } else {
            Some(Box::new(labels.into_iter()))
        }
    }
}

/// Renders values as a comma-and-space separated list, e.g. `-1, -3`.
pub fn format_values(values: &[String]) -> String {
    values.join(", ")
}

/// Wraps raw input as a named source for diagnostics.
pub fn to_error_source<S: AsRef<str>>(source: S) -> SourceArc {
    Arc::new(NamedSource::new(
        DEFAULT_SOURCE_NAME,
        source.as_ref().to_string(),
    ))
}

/// Builds the negative-value failure, labeling every offending token.
///
/// Offenders are rendered values, so literals beyond the `i64` range are kept
/// exactly.
pub fn negative_values(input: &str, offenders: &[(String, Span)]) -> SumError {
    let related = offenders
        .iter()
        .map(|(value, span)| RelatedLabel {
            span: *span,
            label: format!("{} is negative", value),
        })
        .collect();

    SumError::NegativeValue {
        values: offenders.iter().map(|(value, _)| value.clone()).collect(),
        ctx: ErrorContext {
            source: Some(to_error_source(input)),
            span: None,
            help: Some("only zero and positive integers can be summed".into()),
            related,
        },
    }
}

/// Constructs a `SumError::InvalidInput` tied to a span of the original input.
///
/// `err_ctx!(InvalidInput, message, input, span)` or, with a help line,
/// `err_ctx!(InvalidInput, message, input, span, help)`.
#[macro_export]
macro_rules! err_ctx {
    (InvalidInput, $msg:expr, $input:expr, $span:expr, $help:expr) => {
        $crate::SumError::InvalidInput {
            message: format!("{}", $msg),
            input: $input.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::diagnostics::to_error_source($input)),
                span: Some($span),
                help: Some(format!("{}", $help)),
                related: vec![],
            },
        }
    };
    (InvalidInput, $msg:expr, $input:expr, $span:expr) => {
        $crate::SumError::InvalidInput {
            message: format!("{}", $msg),
            input: $input.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::diagnostics::to_error_source($input)),
                span: Some($span),
                help: None,
                related: vec![],
            },
        }
    };
}

/// Prints a `SumError` with full miette diagnostics on stderr.
pub fn print_error(error: SumError) {
    print_report(miette::Report::new(error));
}

/// Prints any report on stderr; used for application-level failures.
pub fn print_report(report: miette::Report) {
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_values_in_order() {
        assert_eq!(format_values(&["-1".into(), "-3".into()]), "-1, -3");
        assert_eq!(format_values(&["-5".into()]), "-5");
        assert_eq!(format_values(&[]), "");
    }

    #[test]
    fn renaming_keeps_source_content() {
        let err = negative_values("1,-2", &[("-2".into(), Span::new(2, 4))]).with_source_name("<repl:1>");
        let source = err.get_ctx().source.as_ref().unwrap();
        assert_eq!(source.name(), "<repl:1>");
        assert_eq!(source.inner(), "1,-2");
        assert_eq!(err.input(), Some("1,-2"));
    }
}
