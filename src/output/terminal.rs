//! Plain-text summary for interactive runs
//!
//! The JSON export is the full contract; this renders the parts a
//! person scans first: counts, package layout, matches and warnings.

use super::ExportedModel;
use crate::core::{PatternMatch, Result, Warning};
use crate::io;
use std::fmt::Write as _;
use std::path::Path;

const MAX_EVIDENCE_LINES: usize = 4;

pub fn output_terminal(export: &ExportedModel, output_file: Option<&Path>) -> Result<()> {
    let text = render(export);
    match output_file {
        Some(path) => io::write_file(path, &text),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

pub fn render(export: &ExportedModel) -> String {
    let mut out = String::new();
    let s = &export.summary;

    let _ = writeln!(out, "Java source model: {}", export.root);
    if export.partial {
        let _ = writeln!(out, "PARTIAL RESULT: the run was cancelled before completion");
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  Files     {} ({} parsed, {} failed)",
        s.files, s.parsed_files, s.failed_files
    );
    let _ = writeln!(out, "  Packages  {}", s.packages);
    let _ = writeln!(out, "  Types     {}", s.types);
    let _ = writeln!(
        out,
        "  Edges     {} ({} resolved, {} external, {} unresolved)",
        s.edges, s.resolved_edges, s.external_edges, s.unresolved_edges
    );
    let _ = writeln!(out, "  Matches   {}", s.matches);
    let _ = writeln!(out, "  Warnings  {}", s.warnings);

    if !export.packages.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Packages");
        let width = export
            .packages
            .iter()
            .map(|p| p.name.len())
            .max()
            .unwrap_or(0);
        for package in &export.packages {
            let name = if package.name.is_empty() {
                "(default)"
            } else {
                &package.name
            };
            let _ = writeln!(
                out,
                "  {name:<width$}  {} type(s)",
                package.types,
                width = width.max("(default)".len())
            );
        }
    }

    if !export.matches.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Pattern matches");
        for m in &export.matches {
            render_match(&mut out, m);
        }
    }

    if !export.warnings.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Warnings");
        for warning in &export.warnings {
            render_warning(&mut out, warning);
        }
    }

    out
}

fn render_match(out: &mut String, m: &PatternMatch) {
    let _ = writeln!(
        out,
        "  [{}] {} ({})",
        m.detector.display_name(),
        m.rule,
        m.confidence.display_name()
    );
    let _ = writeln!(out, "      {}", m.message);
    for evidence in m.evidence.iter().take(MAX_EVIDENCE_LINES) {
        match (&evidence.file, evidence.line) {
            (Some(file), Some(line)) => {
                let _ = writeln!(
                    out,
                    "      - {} ({}:{line})",
                    evidence.note,
                    io::to_slash_string(file)
                );
            }
            _ => {
                let _ = writeln!(out, "      - {}", evidence.note);
            }
        }
    }
    if m.evidence.len() > MAX_EVIDENCE_LINES {
        let _ = writeln!(
            out,
            "      ({} more evidence line(s))",
            m.evidence.len() - MAX_EVIDENCE_LINES
        );
    }
}

fn render_warning(out: &mut String, warning: &Warning) {
    match &warning.file {
        Some(file) => {
            let _ = writeln!(
                out,
                "  [{}] {}: {}",
                warning.category.display_name(),
                io::to_slash_string(file),
                warning.message
            );
        }
        None => {
            let _ = writeln!(
                out,
                "  [{}] {}",
                warning.category.display_name(),
                warning.message
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Confidence, DetectorKind, Evidence};
    use crate::output::{PackageSummary, Summary, SCHEMA_VERSION};

    fn export_with(matches: Vec<PatternMatch>, warnings: Vec<Warning>) -> ExportedModel {
        ExportedModel {
            schema_version: SCHEMA_VERSION,
            root: "demo".to_string(),
            partial: false,
            summary: Summary {
                files: 2,
                parsed_files: 2,
                packages: 1,
                types: 3,
                matches: matches.len(),
                warnings: warnings.len(),
                ..Summary::default()
            },
            packages: vec![PackageSummary {
                name: "app".to_string(),
                types: 3,
                files: 2,
            }],
            entities: Vec::new(),
            edges: Vec::new(),
            matches,
            warnings,
        }
    }

    #[test]
    fn test_render_includes_counts_and_sections() {
        let text = render(&export_with(
            vec![PatternMatch {
                detector: DetectorKind::Naming,
                rule: "stereotype-suffix".to_string(),
                participants: vec!["app.Foo".to_string()],
                confidence: Confidence::Medium,
                message: "`app.Foo` is misnamed".to_string(),
                evidence: vec![Evidence::note("declared as `Foo`")],
            }],
            vec![Warning::parse("app/Bad.java", "syntax error")],
        ));

        assert!(text.contains("Java source model: demo"));
        assert!(text.contains("Files     2 (2 parsed, 0 failed)"));
        assert!(text.contains("[naming] stereotype-suffix (medium)"));
        assert!(text.contains("[parse] app/Bad.java: syntax error"));
        assert!(!text.contains("PARTIAL"));
    }

    #[test]
    fn test_partial_banner() {
        let mut export = export_with(Vec::new(), Vec::new());
        export.partial = true;
        assert!(render(&export).contains("PARTIAL RESULT"));
    }

    #[test]
    fn test_evidence_lines_are_capped() {
        let evidence: Vec<Evidence> = (0..7)
            .map(|i| Evidence::note(format!("line {i}")))
            .collect();
        let text = render(&export_with(
            vec![PatternMatch {
                detector: DetectorKind::LegacyApi,
                rule: "restricted-api".to_string(),
                participants: vec!["app.Bridge".to_string()],
                confidence: Confidence::High,
                message: "restricted".to_string(),
                evidence,
            }],
            Vec::new(),
        ));

        assert!(text.contains("line 3"));
        assert!(!text.contains("line 4"));
        assert!(text.contains("(3 more evidence line(s))"));
    }
}
