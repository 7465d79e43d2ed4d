//! # graphite-alias
//!
//! Configuration-driven alias functions for Graphite-style target
//! expressions. Operators declare aliases in a config document; at query
//! time an alias invocation expands into one new expression per resolved
//! series, which the caller parses and evaluates in its place.
//!
//! ## Modules
//!
//! - [`config`]: Application config and the alias document
//! - [`expr`]: Target expression AST and parser
//! - [`series`]: Time ranges, series, and the series-fetch collaborator
//! - [`rewrite`]: Alias catalog, rewrite engine, and name registry
//!
//! ## Quick Start
//!
//! ```rust
//! use graphite_alias::config::{AliasConfig, ConfigFormat};
//! use graphite_alias::expr::parse_expr;
//! use graphite_alias::rewrite::{RewriteEngine, RewriteRegistry};
//! use graphite_alias::series::{InMemoryFetcher, MetricData, TimeRange};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AliasConfig::parse(
//!         &graphite_alias::config::generate_default_alias_config(),
//!         ConfigFormat::Toml,
//!     )?;
//!     let (engine, _warnings) = RewriteEngine::from_config(config);
//!
//!     let mut registry = RewriteRegistry::new();
//!     registry.register_all(engine.registrations());
//!
//!     let fetcher = InMemoryFetcher::new()
//!         .with_series(MetricData::new("a.b.c.d", 0, 60).values(vec![Some(1.0)]));
//!     let expr = parse_expr("aboveZeroByPrefix(a.b.c.d, 2, \"seriesAbove(%,0)\")")?;
//!     let range = TimeRange::try_new(0, 60).ok_or("empty range")?;
//!
//!     let result = registry.rewrite(&expr, range, &fetcher).await?;
//!     assert_eq!(result.targets, vec!["seriesAbove(a.b,0)"]);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod expr;
pub mod logging;
pub mod rewrite;
pub mod series;

pub use config::{AliasConfig, Config, ConfigError, ConfigFormat, LoggingConfig, RawAlias};

pub use expr::{parse_expr, Expr, ExprError, ExprResult};

pub use rewrite::{
    AliasBuildError, AliasCatalog, AliasCatalogBuilder, AliasDefinition, ArgType, ArgumentSpec,
    BuildReport, FunctionDescription, FunctionParam, Rewrite, RewriteEngine, RewriteError,
    RewriteFunction, RewriteRegistration, RewriteRegistry, RewriteResult,
};

pub use series::{
    FetchError, FetchResult, InMemoryFetcher, MetricData, SeriesFetcher, TimeRange,
};
