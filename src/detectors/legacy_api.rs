//! Legacy API usage: references to deny-listed qualified names and
//! legacy database tables surfacing in string literals or @Table values
//!
//! Patterns are regexes over qualified target names; a Calls edge is
//! additionally matched as `target.method` so individual legacy methods
//! can be denied. The allow list exempts matches, letting a broad deny
//! pattern carry narrow exceptions.

use super::{Detector, DetectorOutput};
use crate::config::LegacyConfig;
use crate::core::{
    AnalysisModel, Confidence, DetectorKind, EdgeKind, Evidence, PatternMatch, RelationshipGraph,
    Result, TypeEntity,
};
use regex::Regex;
use std::collections::BTreeMap;

pub struct LegacyApiDetector {
    deny: Vec<Regex>,
    allow: Vec<Regex>,
    /// Configured table name plus its word-boundary matcher
    tables: Vec<(String, Regex)>,
}

impl LegacyApiDetector {
    pub fn new(config: &LegacyConfig) -> Result<Self> {
        let compile = |patterns: &[String]| -> Result<Vec<Regex>> {
            patterns
                .iter()
                .map(|p| Regex::new(p).map_err(Into::into))
                .collect()
        };
        let tables = config
            .tables
            .iter()
            .map(|table| {
                let matcher = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(table)))?;
                Ok((table.clone(), matcher))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            deny: compile(&config.patterns)?,
            allow: compile(&config.allow)?,
            tables,
        })
    }

    fn is_allowed(&self, candidate: &str) -> bool {
        self.allow.iter().any(|re| re.is_match(candidate))
    }

    fn edge_matches(&self, graph: &RelationshipGraph) -> Vec<PatternMatch> {
        // Hits grouped by (source entity, pattern) so one noisy
        // dependency yields one match with many evidence lines
        let mut hits: BTreeMap<(String, String), Vec<Evidence>> = BTreeMap::new();

        for edge in graph.edges() {
            let mut candidates = vec![edge.target.clone()];
            if edge.kind == EdgeKind::Calls {
                if let Some(member) = &edge.member {
                    candidates.push(format!("{}.{}", edge.target, member));
                }
            }

            for pattern in &self.deny {
                let Some(matched) = candidates
                    .iter()
                    .find(|c| pattern.is_match(c) && !self.is_allowed(c))
                else {
                    continue;
                };
                hits.entry((edge.source.clone(), pattern.to_string()))
                    .or_default()
                    .push(Evidence::at(
                        format!("{} {matched}", edge.kind.display_name()),
                        edge.file.clone(),
                        edge.line,
                    ));
                break;
            }
        }

        hits.into_iter()
            .map(|((source, pattern), evidence)| PatternMatch {
                detector: DetectorKind::LegacyApi,
                rule: "restricted-api".to_string(),
                participants: vec![source.clone()],
                confidence: Confidence::High,
                message: format!(
                    "`{source}` references restricted API matching `{pattern}` ({} reference(s))",
                    evidence.len()
                ),
                evidence,
            })
            .collect()
    }

    fn table_matches(&self, entity: &TypeEntity) -> Vec<PatternMatch> {
        let mut matches = Vec::new();
        for (table, matcher) in &self.tables {
            let mut evidence = Vec::new();
            let mut mapped = false;

            if let Some(annotation) = entity.annotation("Table") {
                let name = annotation
                    .argument("name")
                    .or_else(|| annotation.value())
                    .unwrap_or("");
                if name.eq_ignore_ascii_case(table) {
                    mapped = true;
                    evidence.push(Evidence::at(
                        format!("mapped via @Table to `{name}`"),
                        entity.file.clone(),
                        entity.line,
                    ));
                }
            }
            for field in &entity.fields {
                if field.string_literals.iter().any(|l| matcher.is_match(l)) {
                    evidence.push(Evidence::at(
                        format!("string literal in field `{}`", field.name),
                        entity.file.clone(),
                        field.line,
                    ));
                }
            }
            for method in &entity.methods {
                if method.string_literals.iter().any(|l| matcher.is_match(l)) {
                    evidence.push(Evidence::at(
                        format!("string literal in method `{}`", method.name),
                        entity.file.clone(),
                        method.line,
                    ));
                }
            }

            if evidence.is_empty() {
                continue;
            }
            matches.push(PatternMatch {
                detector: DetectorKind::LegacyApi,
                rule: "legacy-table".to_string(),
                participants: vec![entity.qualified_name.clone()],
                confidence: if mapped {
                    Confidence::High
                } else {
                    Confidence::Medium
                },
                message: format!(
                    "`{}` references legacy table `{table}`",
                    entity.qualified_name
                ),
                evidence,
            });
        }
        matches
    }
}

impl Detector for LegacyApiDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::LegacyApi
    }

    fn detect(&self, model: &AnalysisModel, graph: &RelationshipGraph) -> DetectorOutput {
        if self.deny.is_empty() && self.tables.is_empty() {
            return DetectorOutput::empty();
        }
        if model.is_empty() {
            return DetectorOutput::skipped(self.kind(), "model contains no types");
        }

        let mut output = DetectorOutput::empty();
        output.matches.extend(self.edge_matches(graph));
        for entity in model.types.values() {
            output.matches.extend(self.table_matches(entity));
        }
        output
    }
}
