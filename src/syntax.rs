//! Syntax layer of the summation parser.
//!
//! Splits raw input into spanned integer literals: [`delimiter`] resolves which
//! separator applies and where the numbers begin, [`tokenizer`] cuts the body
//! into tokens and coerces them.

use serde::{Deserialize, Serialize};

pub mod delimiter;
pub mod tokenizer;

pub use delimiter::{Delimiter, Resolved};
pub use tokenizer::{Integer, Number, Token};

/// Byte range in the original input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shifts the span right by `offset` bytes.
    pub fn offset(self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

/// Wrapper for carrying source span information with any value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}
