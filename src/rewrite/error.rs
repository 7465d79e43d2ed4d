//! Rewrite error types
//!
//! Build-time errors (`TemplateError`, `AliasBuildError`) never abort
//! startup: the offending alias is skipped and the error is reported as a
//! warning. `RewriteError` is returned per invocation.

use thiserror::Error;

use crate::expr::ExprError;
use crate::series::FetchError;

/// Errors compiling a rewrite template
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    /// Template is empty or whitespace
    #[error("template is empty")]
    Empty,

    /// Template does not expand into a valid expression
    #[error("template does not expand to a valid expression: {0}")]
    Syntax(String),
}

/// Reasons a configured alias is left out of the catalog
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AliasBuildError {
    /// The alias' rewrite template failed to compile
    #[error("alias '{alias}': invalid template: {source}")]
    TemplateInvalid {
        alias: String,
        #[source]
        source: TemplateError,
    },

    /// The alias declares no formal arguments
    #[error("alias '{alias}': at least one argument must be declared")]
    MissingArgument { alias: String },
}

impl AliasBuildError {
    /// Name of the alias that was skipped
    pub fn alias(&self) -> &str {
        match self {
            Self::TemplateInvalid { alias, .. } | Self::MissingArgument { alias } => alias,
        }
    }
}

/// Errors returned from a single rewrite invocation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RewriteError {
    /// A required positional argument is absent
    #[error("{function}: missing required argument at position {position}")]
    MissingArgument { function: String, position: usize },

    /// A positional argument is present but has the wrong type
    #[error("{function}: invalid argument at position {position}: expected {expected}")]
    InvalidArgument {
        function: String,
        position: usize,
        expected: &'static str,
    },

    /// The invocation text is not a valid expression
    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    /// The series argument could not be resolved
    #[error(transparent)]
    SeriesResolution(#[from] FetchError),
}

impl From<ExprError> for RewriteError {
    fn from(err: ExprError) -> Self {
        match err {
            ExprError::MissingArgument { function, position } => {
                RewriteError::MissingArgument { function, position }
            }
            ExprError::WrongArgumentType {
                function,
                position,
                expected,
                ..
            } => RewriteError::InvalidArgument {
                function,
                position,
                expected,
            },
            ExprError::Parse(msg) => RewriteError::InvalidExpression(msg),
        }
    }
}

/// Result type for template compilation
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Result type for rewrite invocations
pub type RewriteResult<T> = Result<T, RewriteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AliasBuildError::TemplateInvalid {
            alias: "broken".to_string(),
            source: TemplateError::Empty,
        };
        assert_eq!(err.to_string(), "alias 'broken': invalid template: template is empty");
        assert_eq!(err.alias(), "broken");

        let err = RewriteError::MissingArgument {
            function: "myAlias".to_string(),
            position: 2,
        };
        assert_eq!(
            err.to_string(),
            "myAlias: missing required argument at position 2"
        );
    }

    #[test]
    fn test_fetch_error_is_transparent() {
        let err: RewriteError = FetchError::NoSeries("a.*".to_string()).into();
        assert_eq!(err.to_string(), "No series matched: a.*");
    }

    #[test]
    fn test_expr_error_conversion() {
        let err: RewriteError = ExprError::WrongArgumentType {
            function: "f".to_string(),
            position: 1,
            expected: "integer",
            found: "string",
        }
        .into();
        assert!(matches!(
            err,
            RewriteError::InvalidArgument {
                position: 1,
                expected: "integer",
                ..
            }
        ));
    }
}
