//! Series Resolution
//!
//! The rewrite engine never reads samples itself; it asks a
//! [`SeriesFetcher`] to resolve the first argument of an invocation into
//! concrete series and only looks at their names.
//!
//! - **types**: `TimeRange`, `MetricData`, metric-name extraction
//! - **fetch**: the collaborator trait and an in-memory implementation
//! - **error**: Error types

pub mod error;
pub mod fetch;
pub mod types;

pub use error::{FetchError, FetchResult};
pub use fetch::{glob_to_regex, InMemoryFetcher, SeriesFetcher};
pub use types::{extract_metric, MetricData, TimeRange};
