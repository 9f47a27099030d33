pub use crate::diagnostics::{ErrorContext, ErrorType, SumError};
pub use crate::engine::add_string;

pub mod cli;
pub mod diagnostics;
pub mod engine;
pub mod harness;
pub mod repl;
pub mod syntax;
