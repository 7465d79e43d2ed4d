//! Core series types shared by the rewrite engine and its collaborators
//!
//! - `TimeRange`: the `[from, until)` window an invocation is evaluated over
//! - `MetricData`: one resolved series (name plus samples)
//! - `extract_metric`: pulls the bare metric path out of a series name

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A time interval for series resolution
///
/// Bounds are Unix timestamps in seconds, the resolution Graphite targets
/// are evaluated at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeRange {
    /// Start timestamp (inclusive), in seconds
    pub from: i64,
    /// End timestamp (exclusive), in seconds
    pub until: i64,
}

impl TimeRange {
    /// Create a range, returning None unless `from < until`
    pub fn try_new(from: i64, until: i64) -> Option<Self> {
        if from < until {
            Some(Self { from, until })
        } else {
            None
        }
    }

    /// Create a range for the last N hours from now
    pub fn last_hours(hours: i64) -> Self {
        let until = Utc::now().timestamp();
        let from = until - hours * 3600;
        Self { from, until }
    }

    /// Create a range for the last N days from now
    pub fn last_days(days: i64) -> Self {
        Self::last_hours(days * 24)
    }

    /// Check if a timestamp falls within this range
    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.from && timestamp < self.until
    }

    /// Get the duration in seconds
    pub fn duration_secs(&self) -> i64 {
        self.until - self.from
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.from, self.until)
    }
}

/// A resolved time series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricData {
    /// Series name; a metric path, possibly wrapped by earlier functions
    pub name: String,
    /// First timestamp covered, in seconds
    pub start: i64,
    /// Seconds between consecutive samples
    pub step: i64,
    /// Samples; `None` marks a gap
    #[serde(default)]
    pub values: Vec<Option<f64>>,
}

impl MetricData {
    /// Create a series with no samples
    pub fn new(name: impl Into<String>, start: i64, step: i64) -> Self {
        Self {
            name: name.into(),
            start,
            step,
            values: Vec::new(),
        }
    }

    /// Builder method: set the samples
    pub fn values(mut self, values: Vec<Option<f64>>) -> Self {
        self.values = values;
        self
    }

    /// Timestamp just past the last sample
    pub fn stop(&self) -> i64 {
        self.start + self.step * self.values.len() as i64
    }

    /// The bare metric path behind this series' name
    pub fn metric(&self) -> &str {
        extract_metric(&self.name)
    }
}

/// Extract the metric path from a series name
///
/// Names produced by earlier functions look like `scale(a.b.c,2)`; the
/// metric is the run of name characters following the last `(` that is
/// terminated by a `,` outside braces or by `)`. Quoted arguments are
/// skipped. A plain path is returned unchanged.
pub fn extract_metric(name: &str) -> &str {
    let bytes = name.as_bytes();
    let mut start = 0;
    let mut braces = 0i32;
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if let Some(q) = quote {
            if c == q {
                quote = None;
                start = i + 1;
            }
            i += 1;
            continue;
        }
        match c {
            b'\'' | b'"' => quote = Some(c),
            b'{' => braces += 1,
            b'}' => braces -= 1,
            b'(' => start = i + 1,
            b',' if braces == 0 => {
                if i > start {
                    return name[start..i].trim();
                }
                start = i + 1;
            }
            b')' => {
                if i > start {
                    return name[start..i].trim();
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    name[start.min(name.len())..].trim()
}
