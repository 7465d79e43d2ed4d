//! Expression error types
//!
//! Covers failures while parsing a target string and while reading typed
//! positional arguments out of a parsed call.

use thiserror::Error;

/// Errors that can occur while parsing or inspecting expressions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// Target string is not a valid expression
    #[error("Parse error: {0}")]
    Parse(String),

    /// A positional argument is absent
    #[error("{function}: missing argument at position {position}")]
    MissingArgument { function: String, position: usize },

    /// A positional argument has the wrong type
    #[error("{function}: argument {position} must be {expected}, found {found}")]
    WrongArgumentType {
        function: String,
        position: usize,
        expected: &'static str,
        found: &'static str,
    },
}

/// Result type for expression operations
pub type ExprResult<T> = Result<T, ExprError>;
