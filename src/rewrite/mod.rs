//! Alias Rewrite Functions
//!
//! Operators declare alias functions in configuration; an invocation of an
//! alias expands into new target expressions that the surrounding query
//! engine parses and evaluates in its place.
//!
//! - **types**: argument specs and documentation entries
//! - **template**: `%` placeholder templates
//! - **catalog**: alias definitions and the catalog builder
//! - **engine**: the rewrite algorithm
//! - **error**: Error types
//!
//! # Wiring
//!
//! ```text
//! AliasConfig → RewriteEngine::from_config → registrations() → RewriteRegistry
//! query time:   RewriteRegistry::rewrite(expr) → RewriteEngine → Vec<String>
//! ```
//!
//! ```rust
//! use graphite_alias::config::{AliasConfig, ConfigFormat};
//! use graphite_alias::rewrite::{RewriteEngine, RewriteRegistry};
//!
//! let doc = r#"
//! enabled = true
//! [aliases.byNode]
//! template = "seriesAbove(%,0)"
//! args = [{ name = "seriesList", required = true, type = "seriesList" }]
//! "#;
//! let config = AliasConfig::parse(doc, ConfigFormat::Toml).unwrap();
//! let (engine, warnings) = RewriteEngine::from_config(config);
//! assert!(warnings.is_empty());
//!
//! let mut registry = RewriteRegistry::new();
//! registry.register_all(engine.registrations());
//! assert!(registry.is_registered("byNode"));
//! ```

mod catalog;
mod engine;
mod error;
mod template;
mod types;

pub use catalog::{
    AliasCatalog, AliasCatalogBuilder, AliasDefinition, BuildReport, DEFAULT_GROUP,
    DEFAULT_MODULE,
};
pub use engine::{node_prefix, rewrite_series, RewriteEngine};
pub use error::{AliasBuildError, RewriteError, RewriteResult, TemplateError, TemplateResult};
pub use template::{substitute, CompiledTemplate, PLACEHOLDER};
pub use types::{ArgType, ArgumentSpec, FunctionDescription, FunctionParam};

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::expr::Expr;
use crate::series::{SeriesFetcher, TimeRange};

/// Result of a rewrite invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewrite {
    /// Whether the function recognised the invocation
    pub handled: bool,
    /// Replacement expressions, in input series order
    pub targets: Vec<String>,
}

impl Rewrite {
    pub fn handled(targets: Vec<String>) -> Self {
        Self {
            handled: true,
            targets,
        }
    }

    pub fn unhandled() -> Self {
        Self::default()
    }
}

/// A function that rewrites invocations into new expressions
#[async_trait]
pub trait RewriteFunction: Send + Sync {
    /// Rewrite one invocation evaluated over `range`
    async fn rewrite(
        &self,
        expr: &Expr,
        range: TimeRange,
        fetcher: &dyn SeriesFetcher,
    ) -> RewriteResult<Rewrite>;

    /// Documentation for every name this function serves
    fn descriptions(&self) -> &BTreeMap<String, FunctionDescription>;
}

/// Routes one function name to the instance serving it
#[derive(Clone)]
pub struct RewriteRegistration {
    pub name: String,
    pub function: Arc<dyn RewriteFunction>,
}

impl std::fmt::Debug for RewriteRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewriteRegistration")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Name-routing table owned by the query engine
#[derive(Default, Clone)]
pub struct RewriteRegistry {
    functions: BTreeMap<String, Arc<dyn RewriteFunction>>,
}

impl RewriteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function name; a later registration replaces an earlier one
    pub fn register(&mut self, registration: RewriteRegistration) {
        if self
            .functions
            .insert(registration.name.clone(), registration.function)
            .is_some()
        {
            tracing::warn!(function = %registration.name, "rewrite function registered twice, replacing");
        }
    }

    pub fn register_all(&mut self, registrations: impl IntoIterator<Item = RewriteRegistration>) {
        for registration in registrations {
            self.register(registration);
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Dispatch an invocation by its function name
    pub async fn rewrite(
        &self,
        expr: &Expr,
        range: TimeRange,
        fetcher: &dyn SeriesFetcher,
    ) -> RewriteResult<Rewrite> {
        match self.functions.get(expr.target()) {
            Some(function) => function.rewrite(expr, range, fetcher).await,
            None => Ok(Rewrite::unhandled()),
        }
    }

    /// Documentation for every registered name
    pub fn descriptions(&self) -> BTreeMap<String, FunctionDescription> {
        self.functions
            .iter()
            .filter_map(|(name, function)| {
                function
                    .descriptions()
                    .get(name)
                    .map(|d| (name.clone(), d.clone()))
            })
            .collect()
    }
}
