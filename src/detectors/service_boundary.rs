//! Service boundary candidates from package-level coupling
//!
//! Types are grouped by the first package segment below the project's
//! common package prefix. A group whose Calls/FieldOf edges mostly stay
//! inside it is a candidate service boundary. External (JDK, library)
//! edges say nothing about internal structure and are excluded from
//! the ratio.

use super::{Detector, DetectorOutput};
use crate::config::BoundaryConfig;
use crate::core::{
    AnalysisModel, Confidence, DetectorKind, EdgeKind, Evidence, PatternMatch, RelationshipGraph,
};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub struct ServiceBoundaryDetector {
    config: BoundaryConfig,
}

struct PackageGroup {
    packages: BTreeSet<String>,
    type_count: usize,
    internal_edges: usize,
    leaving_edges: usize,
    /// Type-level edges inside the group, for cycle evidence
    internal_pairs: Vec<(String, String)>,
}

impl PackageGroup {
    fn new() -> Self {
        Self {
            packages: BTreeSet::new(),
            type_count: 0,
            internal_edges: 0,
            leaving_edges: 0,
            internal_pairs: Vec::new(),
        }
    }

    fn coupling_ratio(&self) -> f64 {
        self.leaving_edges as f64 / self.internal_edges as f64
    }
}

impl ServiceBoundaryDetector {
    pub fn new(config: BoundaryConfig) -> Self {
        Self { config }
    }

    /// Longest package prefix shared by every analyzed type
    fn common_prefix(model: &AnalysisModel) -> Vec<String> {
        let mut prefix: Option<Vec<String>> = None;
        for package in model.packages() {
            let segments: Vec<String> = if package.is_empty() {
                Vec::new()
            } else {
                package.split('.').map(str::to_string).collect()
            };
            prefix = Some(match prefix {
                None => segments,
                Some(current) => current
                    .into_iter()
                    .zip(segments)
                    .take_while(|(a, b)| a == b)
                    .map(|(a, _)| a)
                    .collect(),
            });
        }
        prefix.unwrap_or_default()
    }

    fn group_key(package: &str, prefix: &[String]) -> String {
        if package.is_empty() {
            return "(default)".to_string();
        }
        let segments: Vec<&str> = package.split('.').collect();
        if segments.len() > prefix.len() {
            segments[..=prefix.len()].join(".")
        } else {
            package.to_string()
        }
    }

    fn cycle_evidence(group: &PackageGroup) -> Option<Evidence> {
        let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
        let mut dependency_graph: DiGraph<&str, ()> = DiGraph::new();
        for (source, target) in &group.internal_pairs {
            let s = *nodes
                .entry(source)
                .or_insert_with(|| dependency_graph.add_node(source));
            let t = *nodes
                .entry(target)
                .or_insert_with(|| dependency_graph.add_node(target));
            dependency_graph.add_edge(s, t, ());
        }

        let mut cycles: Vec<Vec<&str>> = tarjan_scc(&dependency_graph)
            .into_iter()
            .filter(|component| component.len() >= 2)
            .map(|component| {
                let mut names: Vec<&str> =
                    component.iter().map(|&i| dependency_graph[i]).collect();
                names.sort_unstable();
                names
            })
            .collect();
        cycles.sort();

        let largest = cycles.into_iter().max_by_key(|c| c.len())?;
        let shown = largest.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
        let note = if largest.len() > 5 {
            format!(
                "tightly interdependent core of {} types: {shown} and {} more",
                largest.len(),
                largest.len() - 5
            )
        } else {
            format!(
                "tightly interdependent core of {} types: {shown}",
                largest.len()
            )
        };
        Some(Evidence::note(note))
    }
}

impl Detector for ServiceBoundaryDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::ServiceBoundary
    }

    fn detect(&self, model: &AnalysisModel, graph: &RelationshipGraph) -> DetectorOutput {
        if graph.is_empty() {
            return DetectorOutput::skipped(self.kind(), "relationship graph is empty");
        }

        let prefix = Self::common_prefix(model);
        let mut groups: BTreeMap<String, PackageGroup> = BTreeMap::new();
        let mut type_group: HashMap<&str, String> = HashMap::new();
        for entity in model.types.values() {
            let key = Self::group_key(&entity.package, &prefix);
            let group = groups.entry(key.clone()).or_insert_with(PackageGroup::new);
            group.packages.insert(entity.package.clone());
            group.type_count += 1;
            type_group.insert(entity.qualified_name.as_str(), key);
        }

        // One group cannot be a boundary against anything
        if groups.len() < 2 {
            return DetectorOutput::empty();
        }

        for edge in graph.edges() {
            if !matches!(edge.kind, EdgeKind::Calls | EdgeKind::FieldOf) {
                continue;
            }
            if !edge.resolution.is_resolved() || edge.source == edge.target {
                continue;
            }
            let (Some(source_group), Some(target_group)) = (
                type_group.get(edge.source.as_str()),
                type_group.get(edge.target.as_str()),
            ) else {
                continue;
            };
            if let Some(group) = groups.get_mut(source_group.as_str()) {
                if source_group == target_group {
                    group.internal_edges += 1;
                    group
                        .internal_pairs
                        .push((edge.source.clone(), edge.target.clone()));
                } else {
                    group.leaving_edges += 1;
                }
            }
        }

        let mut output = DetectorOutput::empty();
        for (key, group) in &groups {
            if group.type_count < self.config.min_group_types || group.internal_edges == 0 {
                continue;
            }
            let ratio = group.coupling_ratio();
            if ratio >= self.config.coupling_threshold {
                continue;
            }

            let confidence = if ratio <= self.config.coupling_threshold / 2.0 {
                Confidence::High
            } else {
                Confidence::Medium
            };
            let mut evidence = vec![Evidence::note(format!(
                "{} internal Calls/FieldOf edges, {} leaving the group",
                group.internal_edges, group.leaving_edges
            ))];
            if let Some(cycle) = Self::cycle_evidence(group) {
                evidence.push(cycle);
            }

            output.matches.push(PatternMatch {
                detector: self.kind(),
                rule: "low-external-coupling".to_string(),
                participants: group.packages.iter().cloned().collect(),
                confidence,
                message: format!(
                    "package group `{key}` forms a candidate service boundary \
                     ({} types, external/internal edge ratio {ratio:.2})",
                    group.type_count
                ),
                evidence,
            });
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture;
    use super::*;

    fn detector() -> ServiceBoundaryDetector {
        ServiceBoundaryDetector::new(BoundaryConfig::default())
    }

    #[test]
    fn test_cohesive_group_is_reported() {
        let (model, graph) = fixture(&[
            (
                "app/billing/Invoice.java",
                "package app.billing;\npublic class Invoice { Ledger ledger; void post() { ledger.record(); } }\n",
            ),
            (
                "app/billing/Ledger.java",
                "package app.billing;\npublic class Ledger { Invoice last; public void record() {} }\n",
            ),
            (
                "app/shipping/Parcel.java",
                "package app.shipping;\npublic class Parcel { Label label; void print() { label.render(); } }\n",
            ),
            (
                "app/shipping/Label.java",
                "package app.shipping;\npublic class Label { Parcel parcel; public void render() {} }\n",
            ),
        ]);
        let output = detector().detect(&model, &graph);

        assert_eq!(output.matches.len(), 2);
        let billing = &output.matches[0];
        assert_eq!(billing.rule, "low-external-coupling");
        assert_eq!(billing.participants, ["app.billing"]);
        assert_eq!(billing.confidence, Confidence::High);
        // Invoice and Ledger reference each other
        assert!(billing
            .evidence
            .iter()
            .any(|e| e.note.contains("interdependent")));
    }

    #[test]
    fn test_coupled_group_is_not_reported() {
        let (model, graph) = fixture(&[
            (
                "app/billing/Invoice.java",
                "package app.billing;\npublic class Invoice { Ledger ledger; app.shipping.Parcel p1; app.shipping.Label p2; }\n",
            ),
            (
                "app/billing/Ledger.java",
                "package app.billing;\npublic class Ledger {}\n",
            ),
            (
                "app/shipping/Parcel.java",
                "package app.shipping;\npublic class Parcel {}\n",
            ),
            (
                "app/shipping/Label.java",
                "package app.shipping;\npublic class Label {}\n",
            ),
        ]);
        let output = detector().detect(&model, &graph);

        // billing has 1 internal edge and 2 leaving: ratio 2.0
        assert!(output
            .matches
            .iter()
            .all(|m| m.participants != ["app.billing"]));
    }

    #[test]
    fn test_external_edges_do_not_count() {
        let (model, graph) = fixture(&[
            (
                "app/a/Names.java",
                "package app.a;\nimport java.util.ArrayList;\npublic class Names extends ArrayList { Other o; }\n",
            ),
            (
                "app/a/Other.java",
                "package app.a;\npublic class Other { Names names; }\n",
            ),
            ("app/b/Lone.java", "package app.b;\npublic class Lone { Peer p; }\n"),
            ("app/b/Peer.java", "package app.b;\npublic class Peer { Lone l; }\n"),
        ]);
        let output = detector().detect(&model, &graph);

        let group_a = output
            .matches
            .iter()
            .find(|m| m.participants == ["app.a"])
            .unwrap();
        // The ArrayList edge is external and must not appear in counts
        assert!(group_a.evidence[0].note.contains("0 leaving"));
    }

    #[test]
    fn test_single_group_project_yields_nothing() {
        let (model, graph) = fixture(&[
            ("p/A.java", "package p;\npublic class A { B b; }\n"),
            ("p/B.java", "package p;\npublic class B { A a; }\n"),
        ]);
        let output = detector().detect(&model, &graph);
        assert!(output.matches.is_empty());
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_empty_graph_warns_and_skips() {
        let (model, _) = fixture(&[("p/A.java", "package p;\npublic class A {}\n")]);
        let output = detector().detect(&model, &RelationshipGraph::new());
        assert!(output.matches.is_empty());
        assert_eq!(output.warnings.len(), 1);
    }
}
