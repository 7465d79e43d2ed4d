//! Series resolution error types

use thiserror::Error;

/// Errors raised by a series-fetch collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// No stored series matched the requested path
    #[error("No series matched: {0}")]
    NoSeries(String),

    /// The expression cannot be resolved to series
    #[error("Unsupported series expression: {0}")]
    Unsupported(String),

    /// The path pattern is not a valid glob
    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The requested time range is empty or inverted
    #[error("Invalid time range: from must be less than until")]
    InvalidTimeRange,

    /// Backend failure reported by the collaborator
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type alias for series resolution
pub type FetchResult<T> = Result<T, FetchError>;
