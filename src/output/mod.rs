//! Exported model: the stable, ordered structure handed to rendering
//!
//! Everything downstream (JSON, terminal, diffing two runs) consumes
//! this one shape. Ordering is fixed: entities by qualified name, edges
//! by (source, target, kind, line, member), matches and warnings
//! pre-sorted by the pipeline. Two runs over byte-identical input
//! serialize byte-identically.

pub mod json;
pub mod terminal;

pub use json::output_json;
pub use terminal::output_terminal;

use crate::core::{
    AnalysisOutcome, DetectorKind, EdgeKind, Method, PatternMatch, TypeEntity, TypeKind, Warning,
};
use crate::io::to_slash_string;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedModel {
    pub schema_version: u32,
    pub root: String,
    /// True when the run was cancelled and the model is incomplete
    pub partial: bool,
    pub summary: Summary,
    pub packages: Vec<PackageSummary>,
    pub entities: Vec<EntityRow>,
    pub edges: Vec<EdgeRow>,
    pub matches: Vec<PatternMatch>,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub files: usize,
    pub parsed_files: usize,
    pub failed_files: usize,
    pub packages: usize,
    pub types: usize,
    /// Fields plus methods over all entities
    pub members: usize,
    pub edges: usize,
    pub resolved_edges: usize,
    pub external_edges: usize,
    pub unresolved_edges: usize,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub edges_by_kind: BTreeMap<EdgeKind, usize>,
    pub matches: usize,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub matches_by_detector: BTreeMap<DetectorKind, usize>,
    pub warnings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub name: String,
    pub types: usize,
    /// Distinct source files contributing types to the package
    pub files: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRow {
    pub qualified_name: String,
    pub package: String,
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    /// Field summaries, `name: Type`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    /// Method summaries, `name(ParamType, ...): ReturnType`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
    pub file: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    /// True when the target is a model entity or a known external type
    pub resolved: bool,
    /// True when the target lives outside the analyzed sources
    pub external: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    pub file: String,
    pub line: usize,
}

/// Assemble the exported structure from a finished run
pub fn build_export(outcome: &AnalysisOutcome) -> ExportedModel {
    let model = &outcome.model;

    let mut package_types: BTreeMap<&str, (usize, std::collections::BTreeSet<&std::path::Path>)> =
        BTreeMap::new();
    for entity in model.types.values() {
        let entry = package_types.entry(entity.package.as_str()).or_default();
        entry.0 += 1;
        entry.1.insert(entity.file.as_path());
    }
    let packages: Vec<PackageSummary> = package_types
        .iter()
        .map(|(name, (types, files))| PackageSummary {
            name: name.to_string(),
            types: *types,
            files: files.len(),
        })
        .collect();

    let entities: Vec<EntityRow> = model.types.values().map(entity_row).collect();

    let edges: Vec<EdgeRow> = outcome
        .graph
        .sorted_edges()
        .into_iter()
        .map(|edge| {
            let resolution = edge.resolution;
            EdgeRow {
                source: edge.source,
                target: edge.target,
                kind: edge.kind,
                resolved: resolution.is_resolved() || resolution.is_external(),
                external: resolution.is_external(),
                reason: match resolution {
                    crate::core::Resolution::Unresolved(reason) => Some(reason),
                    _ => None,
                },
                member: edge.member,
                file: to_slash_string(&edge.file),
                line: edge.line,
            }
        })
        .collect();

    let mut edges_by_kind: BTreeMap<EdgeKind, usize> = BTreeMap::new();
    for edge in &edges {
        *edges_by_kind.entry(edge.kind).or_default() += 1;
    }
    let mut matches_by_detector: BTreeMap<DetectorKind, usize> = BTreeMap::new();
    for m in &outcome.matches {
        *matches_by_detector.entry(m.detector).or_default() += 1;
    }

    let summary = Summary {
        files: model.file_count(),
        parsed_files: model.parsed_file_count(),
        failed_files: model.file_count() - model.parsed_file_count(),
        packages: packages.len(),
        types: model.type_count(),
        members: model
            .types
            .values()
            .map(|t| t.fields.len() + t.methods.len())
            .sum(),
        edges: edges.len(),
        resolved_edges: edges.iter().filter(|e| e.resolved && !e.external).count(),
        external_edges: edges.iter().filter(|e| e.external).count(),
        unresolved_edges: edges.iter().filter(|e| !e.resolved).count(),
        edges_by_kind,
        matches: outcome.matches.len(),
        matches_by_detector,
        warnings: outcome.warnings.len(),
    };

    ExportedModel {
        schema_version: SCHEMA_VERSION,
        root: model.root.display().to_string(),
        partial: outcome.partial,
        summary,
        packages,
        entities,
        edges,
        matches: outcome.matches.clone(),
        warnings: outcome.warnings.clone(),
    }
}

fn entity_row(entity: &TypeEntity) -> EntityRow {
    EntityRow {
        qualified_name: entity.qualified_name.clone(),
        package: entity.package.clone(),
        kind: entity.kind,
        modifiers: entity.modifiers.iter().cloned().collect(),
        annotations: entity
            .annotations
            .iter()
            .map(|a| format!("@{}", a.name))
            .collect(),
        superclass: entity.superclass.as_ref().map(|s| s.name.clone()),
        interfaces: entity.interfaces.iter().map(|i| i.name.clone()).collect(),
        fields: entity
            .fields
            .iter()
            .map(|f| format!("{}: {}", f.name, f.type_ref.name))
            .collect(),
        methods: entity.methods.iter().map(method_summary).collect(),
        synthetic: entity.synthetic,
        file: to_slash_string(&entity.file),
        line: entity.line,
    }
}

fn method_summary(method: &Method) -> String {
    let params = method
        .parameters
        .iter()
        .map(|p| p.type_ref.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    match &method.return_type {
        Some(ret) => format!("{}({params}): {}", method.name, ret.name),
        None if method.is_constructor => format!("{}({params})", method.name),
        None => format!("{}({params}): void", method.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JavamapConfig;
    use crate::engine::Engine;
    use std::fs;
    use tempfile::TempDir;

    fn exported(files: &[(&str, &str)]) -> ExportedModel {
        let dir = TempDir::new().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
        let outcome = Engine::new(JavamapConfig::default())
            .sequential()
            .analyze(dir.path())
            .unwrap();
        build_export(&outcome)
    }

    #[test]
    fn test_entities_sorted_and_summarized() {
        let export = exported(&[
            (
                "src/b/Z.java",
                "package b;\npublic class Z { int count; String name(String s) { return s; } }\n",
            ),
            ("src/a/A.java", "package a;\npublic class A {}\n"),
        ]);

        let names: Vec<&str> = export
            .entities
            .iter()
            .map(|e| e.qualified_name.as_str())
            .collect();
        assert_eq!(names, ["a.A", "b.Z"]);

        let z = &export.entities[1];
        assert_eq!(z.fields, ["count: int"]);
        assert_eq!(z.methods, ["name(String): String"]);
        assert_eq!(z.file, "src/b/Z.java");
    }

    #[test]
    fn test_external_edge_row_flags() {
        let export = exported(&[(
            "src/p/Names.java",
            "package p;\nimport java.util.ArrayList;\npublic class Names extends ArrayList {}\n",
        )]);

        let edge = export
            .edges
            .iter()
            .find(|e| e.kind == EdgeKind::Extends)
            .unwrap();
        assert_eq!(edge.target, "java.util.ArrayList");
        assert!(edge.resolved);
        assert!(edge.external);
        assert!(edge.reason.is_none());
    }

    #[test]
    fn test_unresolved_edge_carries_reason() {
        let export = exported(&[(
            "src/p/User.java",
            "package p;\npublic class User { private Mystery m; }\n",
        )]);

        let edge = export
            .edges
            .iter()
            .find(|e| e.kind == EdgeKind::FieldOf)
            .unwrap();
        assert!(!edge.resolved);
        assert!(!edge.external);
        assert!(edge.reason.as_deref().is_some_and(|r| !r.is_empty()));
    }

    #[test]
    fn test_referential_integrity() {
        let export = exported(&[
            (
                "src/p/A.java",
                "package p;\nimport java.util.List;\npublic class A implements B { List items; }\n",
            ),
            ("src/p/B.java", "package p;\npublic interface B {}\n"),
        ]);

        let known: Vec<&str> = export
            .entities
            .iter()
            .map(|e| e.qualified_name.as_str())
            .collect();
        for edge in export.edges.iter().filter(|e| e.resolved) {
            assert!(
                edge.external || known.contains(&edge.target.as_str()),
                "resolved edge to unknown target {}",
                edge.target
            );
        }
    }

    #[test]
    fn test_summary_counts_line_up() {
        let export = exported(&[
            ("src/p/A.java", "package p;\npublic class A { B b; }\n"),
            ("src/p/B.java", "package p;\npublic class B {}\n"),
        ]);

        assert_eq!(export.summary.files, 2);
        assert_eq!(export.summary.parsed_files, 2);
        assert_eq!(export.summary.types, 2);
        assert_eq!(export.summary.packages, 1);
        // The one member is A's field b
        assert_eq!(export.summary.members, 1);
        assert_eq!(
            export.summary.edges,
            export.summary.resolved_edges
                + export.summary.external_edges
                + export.summary.unresolved_edges
        );
        assert_eq!(
            export.summary.edges_by_kind.get(&EdgeKind::FieldOf),
            Some(&1)
        );
        assert_eq!(export.packages[0].files, 2);
    }

    #[test]
    fn test_export_serializes_deterministically() {
        let sources = [
            ("src/p/A.java", "package p;\npublic class A { B b; }\n"),
            ("src/p/B.java", "package p;\npublic class B { A a; }\n"),
        ];
        let dir = TempDir::new().unwrap();
        for (path, content) in &sources {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }

        let run = || {
            let outcome = Engine::new(JavamapConfig::default())
                .analyze(dir.path())
                .unwrap();
            serde_json::to_string_pretty(&build_export(&outcome)).unwrap()
        };
        assert_eq!(run(), run());
    }
}
