//! Tokenization and integer coercion.

use std::fmt;
use std::num::IntErrorKind;

use crate::diagnostics::SumError;
use crate::err_ctx;
use crate::syntax::delimiter::{Delimiter, LINE_SEPARATOR};
use crate::syntax::{Span, Spanned};

/// A trimmed, non-empty piece of input between separators.
pub type Token<'a> = Spanned<&'a str>;

/// Integer value of a coerced token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Integer {
    Fixed(i64),
    /// A negative literal below `i64::MIN`, kept as canonical decimal text.
    BelowRange(String),
}

impl Integer {
    pub fn is_negative(&self) -> bool {
        match self {
            Integer::Fixed(value) => *value < 0,
            Integer::BelowRange(_) => true,
        }
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integer::Fixed(value) => write!(f, "{}", value),
            Integer::BelowRange(text) => f.write_str(text),
        }
    }
}

/// A coerced token.
pub type Number = Spanned<Integer>;

/// Splits `body` into tokens: by line first, then by `delimiter` within each
/// line. Surrounding whitespace is trimmed and blank tokens are dropped.
///
/// Spans are shifted by `offset` so they index the original input.
pub fn tokenize<'a>(body: &'a str, delimiter: &Delimiter, offset: usize) -> Vec<Token<'a>> {
    let separator = delimiter.as_str();
    let mut tokens = Vec::new();
    let mut line_start = 0;

    for line in body.split(LINE_SEPARATOR) {
        let mut piece_start = line_start;
        for piece in line.split(separator) {
            let text = piece.trim();
            if !text.is_empty() {
                let leading = piece.len() - piece.trim_start().len();
                let start = piece_start + leading;
                tokens.push(Token {
                    value: text,
                    span: Span::new(start, start + text.len()).offset(offset),
                });
            }
            piece_start += piece.len() + separator.len();
        }
        line_start += line.len() + LINE_SEPARATOR.len_utf8();
    }

    tokens
}

/// Coerces every token to an integer, failing on the first one that is not a
/// decimal integer with at most one leading sign.
///
/// Negative literals too large for `i64` still coerce, as [`Integer::BelowRange`],
/// so they are rejected as negatives rather than as malformed input.
pub fn coerce(tokens: &[Token<'_>], input: &str) -> Result<Vec<Number>, SumError> {
    tokens
        .iter()
        .map(|token| {
            let value = match token.value.parse::<i64>() {
                Ok(value) => Integer::Fixed(value),
                Err(e) if *e.kind() == IntErrorKind::NegOverflow => {
                    Integer::BelowRange(canonical_negative(token.value))
                }
                Err(e) => {
                    let help = match e.kind() {
                        IntErrorKind::PosOverflow => format!(
                            "`{}` does not fit in a 64-bit signed integer",
                            token.value
                        ),
                        _ => format!(
                            "`{}` is not an integer; tokens are digits with an optional leading sign",
                            token.value
                        ),
                    };
                    return Err(err_ctx!(
                        InvalidInput,
                        format!("Invalid input: {}", input),
                        input,
                        token.span,
                        help
                    ));
                }
            };
            Ok(Number {
                value,
                span: token.span,
            })
        })
        .collect()
}

/// `-000123` becomes `-123`. Only called on literals that overflowed `i64`,
/// so at least one significant digit remains.
fn canonical_negative(literal: &str) -> String {
    let digits = literal.trim_start_matches('-').trim_start_matches('0');
    format!("-{}", digits)
}
