//! Summation pipeline: delimiter resolution, tokenization and coercion, then
//! validation and reduction.
//!
//! Parsing is total before validation: a malformed token is reported even when
//! negative values are also present.

use crate::diagnostics::{negative_values, SumError};
use crate::err_ctx;
use crate::syntax::{delimiter, tokenizer, Integer, Number, Span};

/// Sums the integers in `input`.
///
/// Numbers are separated by commas and newlines, or by a custom delimiter
/// declared up front as `//<delimiter>\n`. Blank input sums to `0`, blank
/// tokens are ignored, and negative values are rejected all at once.
///
/// # Example
/// ```rust
/// use strsum::{add_string, ErrorType};
///
/// assert_eq!(add_string("1\n2,3").unwrap(), 6);
/// assert_eq!(add_string("//;\n1;2;3").unwrap(), 6);
///
/// let err = add_string("1,-1,2,-3").unwrap_err();
/// assert_eq!(err.error_type(), ErrorType::NegativeValue);
/// assert_eq!(err.to_string(), "Negative numbers not allowed: -1, -3");
/// ```
pub fn add_string(input: &str) -> Result<i64, SumError> {
    let Some(resolved) = delimiter::resolve(input)? else {
        return Ok(0);
    };
    let tokens = tokenizer::tokenize(resolved.body, &resolved.delimiter, resolved.offset);
    let numbers = tokenizer::coerce(&tokens, input)?;
    reduce(&numbers, input)
}

/// Rejects negative values, then sums what is left.
pub fn reduce(numbers: &[Number], input: &str) -> Result<i64, SumError> {
    let mut negatives: Vec<(String, Span)> = Vec::new();
    let mut accepted: Vec<(i64, Span)> = Vec::new();
    for n in numbers {
        match &n.value {
            Integer::Fixed(value) if *value >= 0 => accepted.push((*value, n.span)),
            other => negatives.push((other.to_string(), n.span)),
        }
    }

    if !negatives.is_empty() {
        return Err(negative_values(input, &negatives));
    }

    accepted.iter().try_fold(0i64, |sum, (value, span)| {
        sum.checked_add(*value).ok_or_else(|| {
            err_ctx!(
                InvalidInput,
                format!(
                    "Invalid input: sum exceeds the supported integer range: {}",
                    input
                ),
                input,
                *span,
                format!("the running total overflows {} here", i64::MAX)
            )
        })
    })
}
