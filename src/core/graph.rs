//! Relationship graph built by the resolver
//!
//! Immutable-collection backed, same shape as a call graph: an edge list
//! plus outgoing/incoming indices keyed by qualified type name. Edges are
//! never dropped; an unresolvable reference becomes an edge whose
//! resolution records why.

use im::{HashMap, Vector};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Relationship kinds, in export sort order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Extends,
    Implements,
    FieldOf,
    ParameterOf,
    Calls,
}

impl EdgeKind {
    pub fn display_name(&self) -> &str {
        match self {
            EdgeKind::Extends => "extends",
            EdgeKind::Implements => "implements",
            EdgeKind::FieldOf => "field_of",
            EdgeKind::ParameterOf => "parameter_of",
            EdgeKind::Calls => "calls",
        }
    }
}

/// How a reference was bound to its target
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum Resolution {
    /// Target is a type entity in the analyzed model
    Resolved,
    /// Target lives outside the analyzed sources (JDK, libraries)
    External,
    /// Could not be bound; carries the reason
    Unresolved(String),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved)
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Resolution::External)
    }
}

/// One directed relationship between a model entity and a target type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    /// Qualified name of the owning entity
    pub source: String,
    /// Qualified name when resolved or external, the as-written
    /// reference otherwise
    pub target: String,
    pub kind: EdgeKind,
    pub resolution: Resolution,
    /// The member that induced the edge: field name, parameter name,
    /// or called method name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    pub file: PathBuf,
    pub line: usize,
}

impl RelationshipEdge {
    /// Stable sort key used by the exporter
    pub fn sort_key(&self) -> (&str, &str, EdgeKind, usize, Option<&String>) {
        (
            self.source.as_str(),
            self.target.as_str(),
            self.kind,
            self.line,
            self.member.as_ref(),
        )
    }
}

/// The full relationship graph over an analyzed model
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    edges: Vector<RelationshipEdge>,
    outgoing: HashMap<String, Vector<usize>>,
    incoming: HashMap<String, Vector<usize>>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&mut self, edge: RelationshipEdge) {
        let index = self.edges.len();
        self.outgoing
            .entry(edge.source.clone())
            .or_default()
            .push_back(index);
        if edge.resolution.is_resolved() {
            self.incoming
                .entry(edge.target.clone())
                .or_default()
                .push_back(index);
        }
        self.edges.push_back(edge);
    }

    pub fn edges(&self) -> impl Iterator<Item = &RelationshipEdge> {
        self.edges.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All edges whose source is the given entity
    pub fn edges_from(&self, source: &str) -> Vec<&RelationshipEdge> {
        self.outgoing
            .get(source)
            .map(|indices| indices.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }

    /// All resolved edges pointing at the given entity
    pub fn edges_to(&self, target: &str) -> Vec<&RelationshipEdge> {
        self.incoming
            .get(target)
            .map(|indices| indices.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }

    /// Edges in exporter order
    pub fn sorted_edges(&self) -> Vec<RelationshipEdge> {
        let mut out: Vec<RelationshipEdge> = self.edges.iter().cloned().collect();
        out.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        out
    }
}
