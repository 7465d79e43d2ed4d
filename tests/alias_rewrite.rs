//! End-to-end alias expansion: document on disk → catalog → registry → rewrite

use graphite_alias::config::AliasConfig;
use graphite_alias::rewrite::{AliasBuildError, RewriteEngine, RewriteError, RewriteRegistry};
use graphite_alias::{parse_expr, InMemoryFetcher, MetricData, TimeRange};
use tempfile::tempdir;

const YAML_DOC: &str = r#"
enabled: true
aliases:
  perPrefix:
    template: "seriesAbove(%,0)"
    description: "Series above zero, per prefix"
    args:
      - { name: seriesList, required: true, type: seriesList }
      - { name: nodes, required: true, type: integer }
      - { name: callback, required: true, type: string }
      - { name: rename, required: false, type: string }
  broken:
    template: "seriesAbove(%,0"
    args:
      - { name: seriesList, required: true, type: seriesList }
  noArgs:
    template: "sumSeries(%)"
"#;

fn setup() -> (RewriteRegistry, Vec<AliasBuildError>) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("aliases.yaml");
    std::fs::write(&path, YAML_DOC).unwrap();

    let config = AliasConfig::load(Some(&path)).unwrap();
    let (engine, warnings) = RewriteEngine::from_config(config);
    let mut registry = RewriteRegistry::new();
    registry.register_all(engine.registrations());
    (registry, warnings)
}

fn fetcher() -> InMemoryFetcher {
    ["dc1.web.cpu.user", "dc1.db.cpu.user", "dc2.web.cpu.user"]
        .iter()
        .fold(InMemoryFetcher::new(), |f, name| {
            f.with_series(MetricData::new(*name, 0, 60).values(vec![Some(1.0); 10]))
        })
}

fn range() -> TimeRange {
    TimeRange::try_new(0, 600).unwrap()
}

#[test]
fn test_invalid_aliases_are_skipped() {
    let (registry, warnings) = setup();

    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["perPrefix"]);
    let mut skipped: Vec<&str> = warnings.iter().map(|w| w.alias()).collect();
    skipped.sort();
    assert_eq!(skipped, vec!["broken", "noArgs"]);
}

#[test]
fn test_documentation_mapping() {
    let (registry, _) = setup();
    let docs = registry.descriptions();

    let doc = &docs["perPrefix"];
    assert_eq!(doc.function, "perPrefix(seriesList, nodes, callback, rename)");
    assert_eq!(doc.description, "Series above zero, per prefix");
    assert_eq!(doc.group, "CustomAlias");
    assert_eq!(doc.module, "graphite.render.functions");
    assert!(!doc.params[3].required);
}

#[tokio::test]
async fn test_expand_one_target_per_series() {
    let (registry, _) = setup();
    let expr = parse_expr("perPrefix(*.*.cpu.user, 2, \"seriesAbove(%,0)\", \"above-%\")").unwrap();

    let result = registry.rewrite(&expr, range(), &fetcher()).await.unwrap();
    assert!(result.handled);
    assert_eq!(
        result.targets,
        vec![
            "alias(seriesAbove(dc1.web,0),\"above-dc1.web\")",
            "alias(seriesAbove(dc1.db,0),\"above-dc1.db\")",
            "alias(seriesAbove(dc2.web,0),\"above-dc2.web\")",
        ]
    );

    for target in &result.targets {
        assert!(parse_expr(target).is_ok());
    }
}

#[tokio::test]
async fn test_missing_callback_yields_no_output() {
    let (registry, _) = setup();
    let expr = parse_expr("perPrefix(*.*.cpu.user, 2)").unwrap();

    let err = registry.rewrite(&expr, range(), &fetcher()).await.unwrap_err();
    assert!(matches!(err, RewriteError::MissingArgument { position: 2, .. }));
}

#[tokio::test]
async fn test_skipped_alias_is_not_routed() {
    let (registry, _) = setup();
    let expr = parse_expr("broken(*.*.cpu.user, 2, \"f(%)\")").unwrap();

    let result = registry.rewrite(&expr, range(), &fetcher()).await.unwrap();
    assert!(!result.handled);
    assert!(result.targets.is_empty());
}

#[test]
fn test_disabled_document_registers_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("aliases.toml");
    std::fs::write(&path, "enabled = false\n[aliases.x]\ntemplate = \"f(%)\"\n").unwrap();

    let (engine, warnings) = RewriteEngine::from_config(AliasConfig::load(Some(&path)).unwrap());
    assert!(engine.registrations().is_empty());
    assert!(warnings.is_empty());
}
