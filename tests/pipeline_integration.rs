// End-to-end pipeline tests: walking, parsing, extraction, resolution
// and export over real directory trees.

use javamap::{build_export, EdgeKind, Engine, ExportedModel, JavamapConfig, WarningCategory};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_source(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Two-package project exercising hierarchy, field, signature and call
/// edges, with one reference crossing the package boundary.
fn shop_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_source(
        dir.path(),
        "src/main/java/shop/catalog/Product.java",
        r#"package shop.catalog;

public class Product {
    private String sku;
}
"#,
    );
    write_source(
        dir.path(),
        "src/main/java/shop/catalog/Catalog.java",
        r#"package shop.catalog;

public class Catalog {
    private Product flagship;

    public Product find(String sku) {
        return flagship;
    }
}
"#,
    );
    write_source(
        dir.path(),
        "src/main/java/shop/order/Pricing.java",
        r#"package shop.order;

public interface Pricing {
    void reprice();
}
"#,
    );
    write_source(
        dir.path(),
        "src/main/java/shop/order/LineItem.java",
        r#"package shop.order;

import shop.catalog.Product;

public class LineItem {
    private Product product;

    public int quantity() {
        return 1;
    }
}
"#,
    );
    write_source(
        dir.path(),
        "src/main/java/shop/order/OrderService.java",
        r#"package shop.order;

import shop.catalog.Catalog;

public class OrderService implements Pricing {
    private Catalog catalog;
    private LineItem sample;

    public void reprice() {
        catalog.find("sku-1");
        sample.quantity();
    }
}
"#,
    );
    dir
}

fn has_edge(export: &ExportedModel, source: &str, target: &str, kind: EdgeKind) -> bool {
    export
        .edges
        .iter()
        .any(|e| e.source == source && e.target == target && e.kind == kind)
}

#[test]
fn test_full_pipeline_builds_model_and_graph() {
    let dir = shop_project();
    let outcome = Engine::new(JavamapConfig::default())
        .analyze(dir.path())
        .unwrap();
    assert!(!outcome.partial);

    let export = build_export(&outcome);
    assert_eq!(export.schema_version, 1);
    assert_eq!(export.summary.files, 5);
    assert_eq!(export.summary.parsed_files, 5);
    assert_eq!(export.summary.failed_files, 0);
    assert_eq!(export.summary.packages, 2);
    assert_eq!(export.summary.types, 5);
    assert_eq!(export.summary.unresolved_edges, 0);
    assert_eq!(
        export.summary.resolved_edges + export.summary.external_edges,
        export.summary.edges
    );

    // Entities come back sorted by qualified name
    let names: Vec<&str> = export
        .entities
        .iter()
        .map(|e| e.qualified_name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "shop.catalog.Catalog",
            "shop.catalog.Product",
            "shop.order.LineItem",
            "shop.order.OrderService",
            "shop.order.Pricing",
        ]
    );

    let packages: Vec<(&str, usize)> = export
        .packages
        .iter()
        .map(|p| (p.name.as_str(), p.types))
        .collect();
    assert_eq!(packages, [("shop.catalog", 2), ("shop.order", 3)]);

    assert!(has_edge(
        &export,
        "shop.order.OrderService",
        "shop.order.Pricing",
        EdgeKind::Implements
    ));
    assert!(has_edge(
        &export,
        "shop.order.OrderService",
        "shop.catalog.Catalog",
        EdgeKind::FieldOf
    ));
    assert!(has_edge(
        &export,
        "shop.order.LineItem",
        "shop.catalog.Product",
        EdgeKind::FieldOf
    ));
    assert!(has_edge(
        &export,
        "shop.order.OrderService",
        "shop.order.LineItem",
        EdgeKind::Calls
    ));

    // Calls carry the invoked method, resolved through the receiver field
    let find_call = export
        .edges
        .iter()
        .find(|e| e.kind == EdgeKind::Calls && e.member.as_deref() == Some("find"))
        .unwrap();
    assert_eq!(find_call.source, "shop.order.OrderService");
    assert_eq!(find_call.target, "shop.catalog.Catalog");
    assert!(find_call.resolved);

    // String lands in java.lang and is marked external, not unresolved
    let string_edge = export
        .edges
        .iter()
        .find(|e| e.target == "java.lang.String")
        .unwrap();
    assert!(string_edge.external);
    assert!(string_edge.resolved);
}

#[test]
fn test_one_broken_file_does_not_abort_the_run() {
    let dir = shop_project();
    write_source(
        dir.path(),
        "src/main/java/shop/order/Broken.java",
        "this is not java at all ;;;\n",
    );

    let outcome = Engine::new(JavamapConfig::default())
        .analyze(dir.path())
        .unwrap();
    let export = build_export(&outcome);

    assert_eq!(export.summary.files, 6);
    assert_eq!(export.summary.parsed_files, 5);
    assert_eq!(export.summary.failed_files, 1);
    // Every declaration from the healthy files survives
    assert_eq!(export.summary.types, 5);

    let parse_warnings: Vec<_> = export
        .warnings
        .iter()
        .filter(|w| w.category == WarningCategory::Parse)
        .collect();
    assert_eq!(parse_warnings.len(), 1);
    assert!(parse_warnings[0]
        .file
        .as_deref()
        .is_some_and(|f| f.ends_with("Broken.java")));
}

#[test]
fn test_reruns_produce_byte_identical_exports() {
    let dir = shop_project();
    let config = JavamapConfig::default();

    let first = Engine::new(config.clone()).analyze(dir.path()).unwrap();
    let second = Engine::new(config).analyze(dir.path()).unwrap();

    assert_eq!(
        serde_json::to_string_pretty(&build_export(&first)).unwrap(),
        serde_json::to_string_pretty(&build_export(&second)).unwrap()
    );
}

#[test]
fn test_sequential_and_parallel_runs_agree() {
    let dir = shop_project();

    let parallel = Engine::new(JavamapConfig::default())
        .analyze(dir.path())
        .unwrap();
    let sequential = Engine::new(JavamapConfig::default())
        .sequential()
        .analyze(dir.path())
        .unwrap();

    assert_eq!(
        serde_json::to_string_pretty(&build_export(&parallel)).unwrap(),
        serde_json::to_string_pretty(&build_export(&sequential)).unwrap()
    );
}

#[test]
fn test_default_excludes_skip_build_and_test_trees() {
    let dir = TempDir::new().unwrap();
    write_source(
        dir.path(),
        "src/main/java/app/Keep.java",
        "package app;\n\npublic class Keep {}\n",
    );
    write_source(
        dir.path(),
        "src/test/java/app/KeepTest.java",
        "package app;\n\npublic class KeepTest {}\n",
    );
    write_source(
        dir.path(),
        "src/main/java/app/SmokeTests.java",
        "package app;\n\npublic class SmokeTests {}\n",
    );
    write_source(
        dir.path(),
        "target/generated-sources/app/Machine.java",
        "package app;\n\npublic class Machine {}\n",
    );

    let outcome = Engine::new(JavamapConfig::default())
        .analyze(dir.path())
        .unwrap();

    assert_eq!(outcome.model.type_count(), 1);
    assert!(outcome.model.get_type("app.Keep").is_some());
}

#[test]
fn test_empty_project_is_a_valid_run() {
    let dir = TempDir::new().unwrap();
    let outcome = Engine::new(JavamapConfig::default())
        .analyze(dir.path())
        .unwrap();
    let export = build_export(&outcome);

    assert!(!export.partial);
    assert_eq!(export.summary.files, 0);
    assert_eq!(export.summary.types, 0);
    assert_eq!(export.summary.edges, 0);
    assert!(export.entities.is_empty());
    assert!(export.edges.is_empty());
    assert!(export.matches.is_empty());

    // Detectors report the unmet preconditions instead of guessing
    assert!(!export.warnings.is_empty());
    assert!(export
        .warnings
        .iter()
        .all(|w| w.category == WarningCategory::Detector));
}

#[test]
fn test_cancelled_run_is_partial() {
    let dir = shop_project();
    let engine = Engine::new(JavamapConfig::default());
    engine.cancel_flag().cancel();

    let outcome = engine.analyze(dir.path()).unwrap();
    assert!(outcome.partial);
    assert!(outcome.matches.is_empty());

    let export = build_export(&outcome);
    assert!(export.partial);
    assert!(export.edges.is_empty());
}

#[test]
fn test_analysis_root_must_be_a_directory() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("Single.java");
    fs::write(&file, "package p;\n\npublic class Single {}\n").unwrap();

    let err = Engine::new(JavamapConfig::default())
        .analyze(&file)
        .unwrap_err();
    assert!(err.to_string().contains("not a directory"));
}
