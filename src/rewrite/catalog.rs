//! Alias catalog
//!
//! Built once from the alias document and never mutated afterwards.
//!
//! ```text
//! AliasConfig ──► AliasCatalogBuilder ──► BuildReport { catalog, warnings }
//!                   per alias: defaults → compile template → check args
//! ```

use std::collections::BTreeMap;

use crate::config::{AliasConfig, RawAlias};
use crate::rewrite::error::AliasBuildError;
use crate::rewrite::template::CompiledTemplate;
use crate::rewrite::types::{ArgumentSpec, FunctionDescription, FunctionParam};

/// Group used when an alias does not set one
pub const DEFAULT_GROUP: &str = "CustomAlias";

/// Module used when an alias does not set one
pub const DEFAULT_MODULE: &str = "graphite.render.functions";

/// One configured alias that survived validation
#[derive(Debug, Clone, PartialEq)]
pub struct AliasDefinition {
    name: String,
    template: CompiledTemplate,
    args: Vec<ArgumentSpec>,
    module: String,
    group: String,
    description: String,
    preserve_name: bool,
}

impl AliasDefinition {
    /// Validate a raw alias and apply defaults
    pub fn from_raw(name: &str, raw: &RawAlias) -> Result<Self, AliasBuildError> {
        let template = CompiledTemplate::compile(&raw.template).map_err(|source| {
            AliasBuildError::TemplateInvalid {
                alias: name.to_string(),
                source,
            }
        })?;

        if raw.args.is_empty() {
            return Err(AliasBuildError::MissingArgument {
                alias: name.to_string(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            template,
            args: raw.args.clone(),
            module: non_empty_or(&raw.module, DEFAULT_MODULE),
            group: non_empty_or(&raw.group, DEFAULT_GROUP),
            description: non_empty_or(&raw.description, &raw.template),
            preserve_name: raw.preserve_name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rewrite template text as configured
    pub fn rewrite_template(&self) -> &str {
        self.template.source()
    }

    pub fn compiled_template(&self) -> &CompiledTemplate {
        &self.template
    }

    pub fn args(&self) -> &[ArgumentSpec] {
        &self.args
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn preserve_name(&self) -> bool {
        self.preserve_name
    }

    /// Expand this alias' own template for `node`
    pub fn expand(&self, node: &str) -> String {
        self.template.render(node)
    }

    /// Positional signature, `name(arg0, arg1, ...)`
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.args.iter().map(|a| a.name.as_str()).collect();
        format!("{}({})", self.name, params.join(", "))
    }

    /// Documentation entry for this alias
    pub fn to_description(&self) -> FunctionDescription {
        FunctionDescription {
            name: self.name.clone(),
            function: self.signature(),
            description: self.description.clone(),
            module: self.module.clone(),
            group: self.group.clone(),
            params: self.args.iter().map(FunctionParam::from).collect(),
        }
    }
}

fn non_empty_or(value: &Option<String>, default: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Immutable table of alias definitions and their documentation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasCatalog {
    aliases: BTreeMap<String, AliasDefinition>,
    descriptions: BTreeMap<String, FunctionDescription>,
}

impl AliasCatalog {
    /// Catalog with no aliases
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up an alias by name
    pub fn get(&self, name: &str) -> Option<&AliasDefinition> {
        self.aliases.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Alias names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Documentation for every alias in the catalog
    pub fn descriptions(&self) -> &BTreeMap<String, FunctionDescription> {
        &self.descriptions
    }

    fn insert(&mut self, definition: AliasDefinition) {
        self.descriptions
            .insert(definition.name.clone(), definition.to_description());
        self.aliases.insert(definition.name.clone(), definition);
    }
}

/// Outcome of building a catalog
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub catalog: AliasCatalog,
    /// One entry per alias that was skipped
    pub warnings: Vec<AliasBuildError>,
}

/// Builds an [`AliasCatalog`] from the alias document
#[derive(Debug, Clone)]
pub struct AliasCatalogBuilder {
    config: AliasConfig,
}

impl AliasCatalogBuilder {
    pub fn new(config: AliasConfig) -> Self {
        Self { config }
    }

    /// Build the catalog
    ///
    /// A disabled or empty document gives an empty catalog. An alias that
    /// fails validation is skipped with a warning; the rest still build.
    pub fn build(self) -> BuildReport {
        if !self.config.enabled {
            tracing::info!("custom aliases are disabled");
            return BuildReport::default();
        }

        if self.config.aliases.is_empty() {
            tracing::info!("custom aliases enabled, but none are configured");
            return BuildReport::default();
        }

        let mut report = BuildReport::default();
        for (name, raw) in &self.config.aliases {
            match AliasDefinition::from_raw(name, raw) {
                Ok(definition) => {
                    tracing::debug!(alias = %name, signature = %definition.signature(), "alias registered");
                    report.catalog.insert(definition);
                }
                Err(error) => {
                    tracing::warn!(alias = %name, error = %error, "skipping alias");
                    report.warnings.push(error);
                }
            }
        }

        tracing::info!(
            aliases = report.catalog.len(),
            skipped = report.warnings.len(),
            "alias catalog built"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;
    use crate::rewrite::error::TemplateError;
    use crate::rewrite::types::ArgType;

    fn raw(template: &str, args: &[&str]) -> RawAlias {
        RawAlias {
            template: template.to_string(),
            args: args
                .iter()
                .map(|n| ArgumentSpec::new(*n, true, ArgType::Any))
                .collect(),
            ..Default::default()
        }
    }

    fn config(entries: Vec<(&str, RawAlias)>) -> AliasConfig {
        AliasConfig {
            enabled: true,
            aliases: entries
                .into_iter()
                .map(|(n, r)| (n.to_string(), r))
                .collect(),
        }
    }

    #[test]
    fn test_disabled_config_builds_empty() {
        let mut cfg = config(vec![("a", raw("f(%)", &["x"]))]);
        cfg.enabled = false;

        let report = AliasCatalogBuilder::new(cfg).build();
        assert!(report.catalog.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_no_aliases_builds_empty() {
        let report = AliasCatalogBuilder::new(config(vec![])).build();
        assert!(report.catalog.is_empty());
        assert!(report.catalog.descriptions().is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_defaults_applied() {
        let report = AliasCatalogBuilder::new(config(vec![(
            "aboveZero",
            raw("seriesAbove(%,0)", &["seriesList", "nodes", "callback"]),
        )]))
        .build();

        let def = report.catalog.get("aboveZero").unwrap();
        assert_eq!(def.group(), DEFAULT_GROUP);
        assert_eq!(def.module(), DEFAULT_MODULE);
        assert_eq!(def.description(), "seriesAbove(%,0)");
        assert_eq!(def.rewrite_template(), "seriesAbove(%,0)");
        assert!(!def.preserve_name());
    }

    #[test]
    fn test_empty_strings_fall_back_to_defaults() {
        let mut alias = raw("f(%)", &["x"]);
        alias.group = Some(String::new());
        alias.description = Some(String::new());
        alias.module = Some("custom.module".to_string());

        let def = AliasDefinition::from_raw("f", &alias).unwrap();
        assert_eq!(def.group(), DEFAULT_GROUP);
        assert_eq!(def.description(), "f(%)");
        assert_eq!(def.module(), "custom.module");
    }

    #[test]
    fn test_signature_and_description() {
        let mut alias = raw("f(%)", &["seriesList", "nodes", "callback"]);
        alias.args[2].arg_type = ArgType::String;
        let def = AliasDefinition::from_raw("myAlias", &alias).unwrap();

        assert_eq!(def.signature(), "myAlias(seriesList, nodes, callback)");
        let doc = def.to_description();
        assert_eq!(doc.name, "myAlias");
        assert_eq!(doc.function, "myAlias(seriesList, nodes, callback)");
        assert_eq!(doc.params.len(), 3);
        assert_eq!(doc.params[2].arg_type, ArgType::String);
    }

    #[test]
    fn test_expand_own_template() {
        let mut alias = raw("alias(sumSeries(%.*),\"total-%\")", &["seriesList"]);
        alias.preserve_name = true;
        let def = AliasDefinition::from_raw("total", &alias).unwrap();

        assert_eq!(def.expand("a.b"), "alias(sumSeries(a.b.*),\"total-a.b\")");
        assert_eq!(def.compiled_template().placeholders(), 2);
        assert!(def.preserve_name());
    }

    #[test]
    fn test_single_argument_signature() {
        let def = AliasDefinition::from_raw("one", &raw("f(%)", &["seriesList"])).unwrap();
        assert_eq!(def.signature(), "one(seriesList)");
    }

    #[test]
    fn test_invalid_template_skipped_others_kept() {
        let report = AliasCatalogBuilder::new(config(vec![
            ("good", raw("seriesAbove(%,0)", &["x"])),
            ("broken", raw("seriesAbove(%,0", &["x"])),
            ("alsoGood", raw("sumSeries(%.*)", &["x"])),
        ]))
        .build();

        assert_eq!(report.catalog.len(), 2);
        assert!(report.catalog.contains("good"));
        assert!(report.catalog.contains("alsoGood"));
        assert!(!report.catalog.contains("broken"));
        assert!(!report.catalog.descriptions().contains_key("broken"));

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].alias(), "broken");
        assert!(matches!(
            report.warnings[0],
            AliasBuildError::TemplateInvalid {
                source: TemplateError::Syntax(_),
                ..
            }
        ));
    }

    #[test]
    fn test_missing_template_skipped_others_kept() {
        let doc = r#"
enabled: true
aliases:
  good:
    template: "seriesAbove(%,0)"
    args: [{ name: seriesList, required: true, type: seriesList }]
  noTemplate:
    args: [{ name: seriesList, required: true, type: seriesList }]
"#;
        let report =
            AliasCatalogBuilder::new(AliasConfig::parse(doc, ConfigFormat::Yaml).unwrap()).build();

        assert_eq!(report.catalog.names().collect::<Vec<_>>(), vec!["good"]);
        assert_eq!(
            report.warnings,
            vec![AliasBuildError::TemplateInvalid {
                alias: "noTemplate".to_string(),
                source: TemplateError::Empty,
            }]
        );
    }

    #[test]
    fn test_zero_arguments_rejected() {
        let report = AliasCatalogBuilder::new(config(vec![
            ("noArgs", raw("f(%)", &[])),
            ("ok", raw("f(%)", &["x"])),
        ]))
        .build();

        assert_eq!(report.catalog.names().collect::<Vec<_>>(), vec!["ok"]);
        assert_eq!(
            report.warnings,
            vec![AliasBuildError::MissingArgument {
                alias: "noArgs".to_string()
            }]
        );
    }

    #[test]
    fn test_one_warning_per_invalid_alias() {
        let report = AliasCatalogBuilder::new(config(vec![
            ("blank", raw("", &["x"])),
            ("blankNoArgs", raw(" ", &[])),
            ("unbalanced", raw("f((%)", &["x"])),
        ]))
        .build();

        assert!(report.catalog.is_empty());
        let mut skipped: Vec<&str> = report.warnings.iter().map(|w| w.alias()).collect();
        skipped.sort();
        assert_eq!(skipped, vec!["blank", "blankNoArgs", "unbalanced"]);
    }

    #[test]
    fn test_independent_builds_match() {
        let doc = crate::config::generate_default_alias_config();
        let first = AliasCatalogBuilder::new(AliasConfig::parse(&doc, ConfigFormat::Toml).unwrap())
            .build();
        let second =
            AliasCatalogBuilder::new(AliasConfig::parse(&doc, ConfigFormat::Toml).unwrap())
                .build();

        assert_eq!(first.catalog.descriptions(), second.catalog.descriptions());
        assert_eq!(
            serde_json::to_string(first.catalog.descriptions()).unwrap(),
            serde_json::to_string(second.catalog.descriptions()).unwrap()
        );
    }
}
