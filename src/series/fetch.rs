//! Series-fetch collaborator
//!
//! The rewrite engine resolves the first argument of an invocation through
//! a [`SeriesFetcher`]. Production callers plug in their storage-backed
//! resolver; [`InMemoryFetcher`] serves the CLI, tests, and benchmarks.

use async_trait::async_trait;
use regex::Regex;

use crate::expr::Expr;
use crate::series::error::{FetchError, FetchResult};
use crate::series::types::{MetricData, TimeRange};

/// Resolves a series sub-expression into concrete series
#[async_trait]
pub trait SeriesFetcher: Send + Sync {
    /// Resolve `expr` over `range`
    ///
    /// Series are returned in a stable order; callers rely on it to keep
    /// their own output aligned with the input.
    async fn fetch(&self, expr: &Expr, range: TimeRange) -> FetchResult<Vec<MetricData>>;
}

/// Fetcher over a fixed set of series held in memory
///
/// Paths are matched node by node with Graphite globs. A call expression
/// is resolved through its first series argument, and each result is
/// renamed to the call text the way render functions name their output.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFetcher {
    series: Vec<MetricData>,
}

impl InMemoryFetcher {
    /// Create an empty fetcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: add a series
    pub fn with_series(mut self, series: MetricData) -> Self {
        self.series.push(series);
        self
    }

    /// Add a series
    pub fn insert(&mut self, series: MetricData) {
        self.series.push(series);
    }

    /// Number of stored series
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    fn resolve(&self, expr: &Expr, range: TimeRange) -> FetchResult<Vec<MetricData>> {
        match expr {
            Expr::Name(pattern) => {
                let matcher = glob_to_regex(pattern)?;
                let matched: Vec<MetricData> = self
                    .series
                    .iter()
                    .filter(|s| matcher.is_match(&s.name))
                    .filter(|s| s.start < range.until && s.stop() > range.from)
                    .cloned()
                    .collect();

                if matched.is_empty() {
                    return Err(FetchError::NoSeries(pattern.clone()));
                }
                Ok(matched)
            }
            Expr::Call { target, args, named } => {
                let position = args
                    .iter()
                    .position(Expr::is_series)
                    .ok_or_else(|| FetchError::Unsupported(expr.to_string()))?;
                let inner = self.resolve(&args[position], range)?;

                Ok(inner
                    .into_iter()
                    .map(|mut series| {
                        let mut rendered = args.clone();
                        rendered[position] = Expr::Name(series.name.clone());
                        series.name = Expr::Call {
                            target: target.clone(),
                            args: rendered,
                            named: named.clone(),
                        }
                        .to_string();
                        series
                    })
                    .collect())
            }
            other => Err(FetchError::Unsupported(other.to_string())),
        }
    }
}

#[async_trait]
impl SeriesFetcher for InMemoryFetcher {
    async fn fetch(&self, expr: &Expr, range: TimeRange) -> FetchResult<Vec<MetricData>> {
        if range.from >= range.until {
            return Err(FetchError::InvalidTimeRange);
        }
        let series = self.resolve(expr, range)?;
        tracing::debug!(expr = %expr, count = series.len(), "resolved series");
        Ok(series)
    }
}

/// Compile a Graphite path glob into an anchored regex
///
/// `*` and `?` never cross a `.`; `[...]` is a character class and
/// `{a,b}` an alternation.
pub fn glob_to_regex(pattern: &str) -> FetchResult<Regex> {
    let invalid = |reason: &str| FetchError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    out.push('^');
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str("[^.]*"),
            '?' => out.push_str("[^.]"),
            '[' => {
                let mut class = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    class.push(c);
                }
                if !closed {
                    return Err(invalid("unclosed '['"));
                }
                out.push('[');
                out.push_str(&class.replace('\\', "\\\\"));
                out.push(']');
            }
            '{' => {
                let mut group = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    group.push(c);
                }
                if !closed {
                    return Err(invalid("unclosed '{'"));
                }
                let alternatives: Vec<String> = group
                    .split(',')
                    .map(|alt| {
                        alt.split('*')
                            .map(regex::escape)
                            .collect::<Vec<_>>()
                            .join("[^.]*")
                    })
                    .collect();
                out.push_str("(?:");
                out.push_str(&alternatives.join("|"));
                out.push(')');
            }
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0u8; 4]))),
        }
    }
    out.push('$');

    Regex::new(&out).map_err(|e| invalid(&e.to_string()))
}
