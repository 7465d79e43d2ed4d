//! Rewrite engine
//!
//! Expands an alias invocation
//!
//! ```text
//! name(seriesList, nodes, "callback-with-%" [, "rename-with-%"])
//! ```
//!
//! into one expression per resolved series. For each series the first
//! `nodes` segments of its metric path form the node that replaces `%`.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::AliasConfig;
use crate::expr::Expr;
use crate::rewrite::catalog::{AliasCatalog, AliasCatalogBuilder};
use crate::rewrite::error::{AliasBuildError, RewriteResult};
use crate::rewrite::template::substitute;
use crate::rewrite::types::FunctionDescription;
use crate::rewrite::{Rewrite, RewriteFunction, RewriteRegistration};
use crate::series::{extract_metric, SeriesFetcher, TimeRange};

const SERIES_ARG: usize = 0;
const NODES_ARG: usize = 1;
const CALLBACK_ARG: usize = 2;
const RENAME_ARG: usize = 3;

/// Stateless engine serving every alias in one catalog
#[derive(Debug, Clone)]
pub struct RewriteEngine {
    catalog: Arc<AliasCatalog>,
}

impl RewriteEngine {
    pub fn new(catalog: AliasCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Build the catalog from an alias document and wrap it in an engine
    ///
    /// The catalog moves into the engine; the skipped aliases are returned
    /// alongside so the caller can surface them.
    pub fn from_config(config: AliasConfig) -> (Arc<Self>, Vec<AliasBuildError>) {
        let report = AliasCatalogBuilder::new(config).build();
        let engine = Arc::new(Self::new(report.catalog));
        (engine, report.warnings)
    }

    pub fn catalog(&self) -> &AliasCatalog {
        &self.catalog
    }

    /// One registration per alias, all routed to this engine
    pub fn registrations(self: &Arc<Self>) -> Vec<RewriteRegistration> {
        self.catalog
            .names()
            .map(|name| RewriteRegistration {
                name: name.to_string(),
                function: Arc::clone(self) as Arc<dyn RewriteFunction>,
            })
            .collect()
    }
}

#[async_trait]
impl RewriteFunction for RewriteEngine {
    async fn rewrite(
        &self,
        expr: &Expr,
        range: TimeRange,
        fetcher: &dyn SeriesFetcher,
    ) -> RewriteResult<Rewrite> {
        if !self.catalog.contains(expr.target()) {
            return Ok(Rewrite::unhandled());
        }

        let series = fetcher.fetch(expr.arg(SERIES_ARG)?, range).await?;

        let nodes = expr.get_int_arg(NODES_ARG)?;
        let callback = expr.get_string_arg(CALLBACK_ARG)?;
        let rename = if expr.args().len() > RENAME_ARG {
            Some(expr.get_string_arg(RENAME_ARG)?)
        } else {
            None
        };

        let targets: Vec<String> = series
            .iter()
            .map(|s| rewrite_series(extract_metric(&s.name), nodes, callback, rename))
            .collect();

        tracing::debug!(
            alias = expr.target(),
            series = series.len(),
            "expanded alias invocation"
        );
        Ok(Rewrite::handled(targets))
    }

    fn descriptions(&self) -> &BTreeMap<String, FunctionDescription> {
        self.catalog.descriptions()
    }
}

/// Build the expression for one metric
///
/// An empty rename is treated as absent.
pub fn rewrite_series(metric: &str, nodes: i64, callback: &str, rename: Option<&str>) -> String {
    let node = node_prefix(metric, nodes);
    let target = substitute(callback, &node);
    match rename {
        Some(rename) if !rename.is_empty() => {
            format!("alias({},\"{}\")", target, substitute(rename, &node))
        }
        _ => target,
    }
}

/// First `count` dot-separated segments of `metric`
///
/// `count` is clamped to `[0, segments]`.
pub fn node_prefix(metric: &str, count: i64) -> String {
    let segments: Vec<&str> = metric.split('.').collect();
    let take = count.clamp(0, segments.len() as i64) as usize;
    segments[..take].join(".")
}
