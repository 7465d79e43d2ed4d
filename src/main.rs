//! graphite-alias CLI
//!
//! Inspect and exercise configured alias functions:
//! - List the documentation of every alias
//! - Expand an alias invocation against given series names
//! - Print sample configuration documents

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use graphite_alias::config::{generate_default_alias_config, generate_default_config};
use graphite_alias::logging::init_logging;
use graphite_alias::{
    parse_expr, AliasConfig, Config, InMemoryFetcher, MetricData, RewriteEngine, RewriteRegistry,
    TimeRange,
};

#[derive(Parser)]
#[command(name = "graphite-alias")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Configuration-driven alias functions for Graphite targets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Application config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Alias document, overrides `functions.custom_alias`
    #[arg(short, long, global = true)]
    pub aliases: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the documentation of every configured alias as JSON
    Functions,

    /// Expand an alias invocation
    Expand {
        /// Target expression, e.g. 'myAlias(a.b.*, 2, "seriesAbove(%,0)")'
        target: String,
        /// Series names available to the invocation
        #[arg(short, long = "series", required = true)]
        series: Vec<String>,
        /// Range start, Unix seconds (default: 24h ago)
        #[arg(long)]
        from: Option<i64>,
        /// Range end, Unix seconds (default: now)
        #[arg(long)]
        until: Option<i64>,
    },

    /// Print a sample configuration document
    InitConfig {
        /// Print the alias document instead of the application config
        #[arg(long)]
        alias_doc: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::InitConfig { alias_doc } = cli.command {
        if alias_doc {
            print!("{}", generate_default_alias_config());
        } else {
            print!("{}", generate_default_config());
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config.logging).context("failed to initialise logging")?;

    let alias_path = cli.aliases.or(config.functions.custom_alias);
    let alias_config = AliasConfig::load(alias_path.as_deref()).map_err(|e| {
        tracing::error!(error = %e, "failed to load alias config");
        e
    })?;

    let (engine, warnings) = RewriteEngine::from_config(alias_config);
    let mut registry = RewriteRegistry::new();
    registry.register_all(engine.registrations());
    tracing::info!(
        functions = registry.len(),
        skipped = warnings.len(),
        "custom alias functions registered"
    );

    match cli.command {
        Commands::Functions => {
            println!("{}", serde_json::to_string_pretty(&registry.descriptions())?);
        }
        Commands::Expand {
            target,
            series,
            from,
            until,
        } => {
            let default = TimeRange::last_hours(24);
            let range = TimeRange::try_new(
                from.unwrap_or(default.from),
                until.unwrap_or(default.until),
            )
            .context("--from must be before --until")?;

            let fetcher = series.into_iter().fold(InMemoryFetcher::new(), |f, name| {
                f.with_series(
                    MetricData::new(name, range.from, range.duration_secs()).values(vec![None]),
                )
            });

            let expr = parse_expr(&target)?;
            let result = registry.rewrite(&expr, range, &fetcher).await?;
            if !result.handled {
                anyhow::bail!("'{}' is not a configured alias", expr.target());
            }
            for target in result.targets {
                println!("{}", target);
            }
        }
        Commands::InitConfig { .. } => {}
    }

    Ok(())
}
