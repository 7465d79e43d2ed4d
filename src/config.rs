//! Configuration System
//!
//! Two documents are involved:
//!
//! - The application config (`Config`): logging and the location of the
//!   alias document. TOML file plus environment variable overrides.
//! - The alias document (`AliasConfig`): `enabled` plus the map of
//!   configured aliases. TOML, JSON or YAML, chosen by file extension.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::rewrite::ArgumentSpec;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub functions: FunctionsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Rewrite function configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FunctionsConfig {
    /// Path to the alias document; unset leaves the feature inert
    #[serde(default)]
    pub custom_alias: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("graphite-alias").join("config.toml")),
            Some(PathBuf::from("/etc/graphite-alias/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("GRAPHITE_ALIAS_CONFIG") {
            self.functions.custom_alias = Some(PathBuf::from(path));
        }

        if let Ok(level) = std::env::var("GRAPHITE_ALIAS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("GRAPHITE_ALIAS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// The alias document
///
/// Keys are accepted in camelCase, capitalised (`Enabled`, `PreserveName`)
/// or all lowercase (`preservename`).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AliasConfig {
    #[serde(default, alias = "Enabled")]
    pub enabled: bool,

    #[serde(default, alias = "Aliases")]
    pub aliases: BTreeMap<String, RawAlias>,
}

/// One alias as written in the document, before defaults are applied
///
/// A missing template decodes as empty and is rejected per alias when the
/// catalog is built.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawAlias {
    #[serde(default, alias = "Template")]
    pub template: String,

    #[serde(default, alias = "Args")]
    pub args: Vec<ArgumentSpec>,

    #[serde(default, alias = "Module")]
    pub module: Option<String>,

    #[serde(default, alias = "Group")]
    pub group: Option<String>,

    #[serde(default, alias = "Description")]
    pub description: Option<String>,

    #[serde(
        default,
        alias = "preserve_name",
        alias = "PreserveName",
        alias = "preservename"
    )]
    pub preserve_name: bool,
}

/// Encoding of an alias document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension; no extension means TOML
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            None => Some(Self::Toml),
            Some(ext) => match ext.to_ascii_lowercase().as_str() {
                "toml" => Some(Self::Toml),
                "json" => Some(Self::Json),
                "yaml" | "yml" => Some(Self::Yaml),
                _ => None,
            },
        }
    }
}

impl AliasConfig {
    /// Load the alias document
    ///
    /// No path, or a path that does not exist, yields the inert default.
    /// A file that exists but cannot be read or decoded is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            tracing::info!("no alias config specified, custom aliases are disabled");
            return Ok(Self::default());
        };

        if !path.exists() {
            tracing::info!(path = ?path, "alias config not found, custom aliases are disabled");
            return Ok(Self::default());
        }

        let format =
            ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            })?;

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content, format).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Decode an alias document from a string
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, String> {
        match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            // An empty YAML file decodes to unit, not a map
            ConfigFormat::Yaml if content.trim().is_empty() => Ok(Self::default()),
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Unsupported config format for {path:?}, expected .toml, .json, .yaml or .yml")]
    UnsupportedFormat { path: PathBuf },
}

/// Generate a default application config file content
pub fn generate_default_config() -> String {
    r#"# graphite-alias configuration
#
# Environment variables override these settings:
# - GRAPHITE_ALIAS_CONFIG
# - GRAPHITE_ALIAS_LOG_LEVEL
# - GRAPHITE_ALIAS_LOG_FORMAT

[functions]
# Alias document (.toml, .json, .yaml); leave unset to disable custom aliases
# custom_alias = "/etc/graphite-alias/aliases.toml"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

/// Generate a sample alias document
pub fn generate_default_alias_config() -> String {
    r#"# Custom alias functions
#
# Each alias is invoked as
#   name(seriesList, nodes, "callback(%)", ["rename-%"])
# and rewritten once per resolved series, with % replaced by the first
# `nodes` segments of the series' metric path.
#
# Keys may also be written capitalised (Template, PreserveName) or all
# lowercase (preservename). An alias without a template, or without args,
# is skipped with a warning.

enabled = true

[aliases.aboveZeroByPrefix]
template = "seriesAbove(%,0)"
description = "Keeps series whose prefix has values above zero"
args = [
    { name = "seriesList", required = true, type = "seriesList" },
    { name = "nodes", required = true, type = "integer" },
    { name = "callback", required = true, type = "string" },
    { name = "rename", required = false, type = "string" },
]
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::ArgType;
    use std::io::Write;
    use tempfile::tempdir;

    const TOML_DOC: &str = r#"
enabled = true

[aliases.byPrefix]
template = "sumSeries(%.*)"
group = "Combine"
preserveName = true
args = [
    { name = "seriesList", required = true, type = "seriesList" },
    { name = "nodes", required = true, type = "integer" },
]
"#;

    #[test]
    fn test_parse_toml_document() {
        let cfg = AliasConfig::parse(TOML_DOC, ConfigFormat::Toml).unwrap();
        assert!(cfg.enabled);
        let alias = &cfg.aliases["byPrefix"];
        assert_eq!(alias.template, "sumSeries(%.*)");
        assert_eq!(alias.group.as_deref(), Some("Combine"));
        assert!(alias.module.is_none());
        assert!(alias.preserve_name);
        assert_eq!(alias.args.len(), 2);
        assert_eq!(alias.args[1].arg_type, ArgType::Integer);
    }

    #[test]
    fn test_parse_json_and_yaml_agree() {
        let json = r#"{"enabled": true, "aliases": {"byPrefix": {"template": "sumSeries(%.*)",
            "group": "Combine", "preserveName": true,
            "args": [{"name": "seriesList", "required": true, "type": "seriesList"},
                     {"name": "nodes", "required": true, "type": "integer"}]}}}"#;
        let yaml = r#"
enabled: true
aliases:
  byPrefix:
    template: "sumSeries(%.*)"
    group: Combine
    preserveName: true
    args:
      - { name: seriesList, required: true, type: seriesList }
      - { name: nodes, required: true, type: integer }
"#;
        let toml_cfg = AliasConfig::parse(TOML_DOC, ConfigFormat::Toml).unwrap();
        assert_eq!(AliasConfig::parse(json, ConfigFormat::Json).unwrap(), toml_cfg);
        assert_eq!(AliasConfig::parse(yaml, ConfigFormat::Yaml).unwrap(), toml_cfg);
    }

    #[test]
    fn test_parse_rejects_unknown_arg_type() {
        let doc = r#"
enabled = true
[aliases.bad]
template = "f(%)"
args = [{ name = "x", type = "matrix" }]
"#;
        assert!(AliasConfig::parse(doc, ConfigFormat::Toml).is_err());
    }

    #[test]
    fn test_parse_missing_template_decodes_empty() {
        let doc = r#"
enabled: true
aliases:
  good:
    template: "seriesAbove(%,0)"
    args: [{ name: seriesList, type: seriesList }]
  noTemplate:
    args: [{ name: seriesList, type: seriesList }]
"#;
        let cfg = AliasConfig::parse(doc, ConfigFormat::Yaml).unwrap();
        assert_eq!(cfg.aliases.len(), 2);
        assert_eq!(cfg.aliases["noTemplate"].template, "");
        assert_eq!(cfg.aliases["good"].template, "seriesAbove(%,0)");
    }

    #[test]
    fn test_parse_accepts_key_spellings() {
        let doc = r#"
Enabled: true
Aliases:
  upper:
    Template: "f(%)"
    Group: Combine
    PreserveName: true
    Args: [{ name: x }]
  lower:
    template: "f(%)"
    preservename: true
    args: [{ name: x }]
  snake:
    template: "f(%)"
    preserve_name: true
    args: [{ name: x }]
"#;
        let cfg = AliasConfig::parse(doc, ConfigFormat::Yaml).unwrap();
        assert!(cfg.enabled);
        assert_eq!(cfg.aliases["upper"].template, "f(%)");
        assert_eq!(cfg.aliases["upper"].group.as_deref(), Some("Combine"));
        assert_eq!(cfg.aliases["upper"].args.len(), 1);
        assert!(cfg.aliases.values().all(|a| a.preserve_name));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path(Path::new("a.JSON")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("aliases")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path(Path::new("a.ini")), None);
    }

    #[test]
    fn test_load_without_path_is_inert() {
        let cfg = AliasConfig::load(None).unwrap();
        assert!(!cfg.enabled);
        assert!(cfg.aliases.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_inert() {
        let dir = tempdir().unwrap();
        let cfg = AliasConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(cfg, AliasConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aliases.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(TOML_DOC.as_bytes()).unwrap();

        let cfg = AliasConfig::load(Some(&path)).unwrap();
        assert!(cfg.aliases.contains_key("byPrefix"));
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aliases.toml");
        std::fs::write(&path, "enabled = [not toml").unwrap();

        let err = AliasConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_directory_is_unreadable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aliases.toml");
        std::fs::create_dir(&path).unwrap();

        let err = AliasConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aliases.ini");
        std::fs::write(&path, "enabled = true").unwrap();

        let err = AliasConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_generated_documents_parse() {
        let app: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(app.logging.level, "info");
        assert!(app.functions.custom_alias.is_none());

        let aliases =
            AliasConfig::parse(&generate_default_alias_config(), ConfigFormat::Toml).unwrap();
        assert!(aliases.enabled);
        assert_eq!(aliases.aliases["aboveZeroByPrefix"].args.len(), 4);
    }

    #[test]
    fn test_app_config_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[functions]\ncustom_alias = \"/tmp/aliases.yaml\"\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(
            cfg.functions.custom_alias,
            Some(PathBuf::from("/tmp/aliases.yaml"))
        );
        assert_eq!(cfg.logging.format, "json");
        assert_eq!(cfg.logging.level, "info");
    }
}
