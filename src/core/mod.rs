pub mod entities;
pub mod errors;
pub mod graph;

pub use entities::{
    Annotation, CallSite, Field, FileModel, Import, LocalVar, Method, Parameter, ParseStatus,
    SourceFile, TypeEntity, TypeKind, TypeRef,
};
pub use errors::{Error, Result, Warning, WarningCategory};
pub use graph::{EdgeKind, RelationshipEdge, RelationshipGraph, Resolution};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation shared across pipeline stages.
///
/// Checked at file granularity during parallel extraction and at
/// detector granularity afterwards. A cancelled run still returns
/// whatever model had been accumulated, marked partial.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Aggregated source model for one analysis run.
///
/// Built once from the per-file extraction results, then read-only for
/// the resolver and every detector.
#[derive(Clone, Debug, Default)]
pub struct AnalysisModel {
    pub root: PathBuf,
    /// Every admitted file, parsed or failed, sorted by path
    pub files: Vec<SourceFile>,
    /// Qualified name to entity, iteration order is name order
    pub types: BTreeMap<String, TypeEntity>,
    /// Per-file import lists for reference resolution
    pub imports: HashMap<PathBuf, Vec<Import>>,
    /// Simple name to the qualified names declaring it, each list sorted
    simple_names: HashMap<String, Vec<String>>,
}

impl AnalysisModel {
    /// Aggregate per-file models into one index.
    ///
    /// The qualified name is the unique key the rest of the pipeline
    /// relies on, so a collision between two declarations is a hard
    /// error rather than a degradation the model could paper over.
    pub fn from_files(root: PathBuf, file_models: Vec<FileModel>) -> Result<Self> {
        let mut files = Vec::with_capacity(file_models.len());
        let mut types: BTreeMap<String, TypeEntity> = BTreeMap::new();
        let mut imports: HashMap<PathBuf, Vec<Import>> = HashMap::new();
        let mut simple_names: HashMap<String, Vec<String>> = HashMap::new();

        for file_model in file_models {
            if !file_model.imports.is_empty() {
                imports.insert(file_model.file.path.clone(), file_model.imports);
            }
            for entity in file_model.types {
                if let Some(existing) = types.get(&entity.qualified_name) {
                    return Err(Error::DuplicateType {
                        qualified_name: entity.qualified_name,
                        first: existing.file.clone(),
                        second: entity.file,
                    });
                }
                // Local and anonymous types are not referable by simple
                // name outside their declaration site
                if !entity.synthetic {
                    simple_names
                        .entry(entity.simple_name.clone())
                        .or_default()
                        .push(entity.qualified_name.clone());
                }
                types.insert(entity.qualified_name.clone(), entity);
            }
            files.push(file_model.file);
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        for candidates in simple_names.values_mut() {
            candidates.sort();
        }

        Ok(Self {
            root,
            files,
            types,
            imports,
            simple_names,
        })
    }

    pub fn get_type(&self, qualified_name: &str) -> Option<&TypeEntity> {
        self.types.get(qualified_name)
    }

    pub fn contains_type(&self, qualified_name: &str) -> bool {
        self.types.contains_key(qualified_name)
    }

    /// Qualified names declaring the given simple name, sorted
    pub fn candidates_for(&self, simple_name: &str) -> &[String] {
        self.simple_names
            .get(simple_name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn imports_for(&self, file: &Path) -> &[Import] {
        self.imports.get(file).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Distinct declared packages, sorted
    pub fn packages(&self) -> BTreeSet<&str> {
        self.types.values().map(|t| t.package.as_str()).collect()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn parsed_file_count(&self) -> usize {
        self.files.iter().filter(|f| f.status.is_parsed()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Which detector produced a match, in export sort order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    ServiceBoundary,
    Integration,
    LegacyApi,
    Naming,
}

impl DetectorKind {
    pub fn display_name(&self) -> &str {
        match self {
            DetectorKind::ServiceBoundary => "service-boundary",
            DetectorKind::Integration => "integration",
            DetectorKind::LegacyApi => "legacy-api",
            DetectorKind::Naming => "naming",
        }
    }
}

/// Detector confidence in a match
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn display_name(&self) -> &str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

/// One piece of supporting evidence for a pattern match
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Evidence {
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Evidence {
    pub fn note(note: impl Into<String>) -> Self {
        Self {
            note: note.into(),
            file: None,
            line: None,
        }
    }

    pub fn at(note: impl Into<String>, file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            note: note.into(),
            file: Some(file.into()),
            line: Some(line),
        }
    }
}

/// A higher-level structure found by one detector.
///
/// Matches are produced once and never mutated; detectors do not see
/// each other's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub detector: DetectorKind,
    /// Detector-specific rule identifier, e.g. `rest-endpoint`
    pub rule: String,
    /// Participating entity qualified names, sorted
    pub participants: Vec<String>,
    pub confidence: Confidence,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<Evidence>,
}

impl PatternMatch {
    /// Stable sort key used by the exporter
    pub fn sort_key(&self) -> (DetectorKind, &str, Option<&String>) {
        (self.detector, self.rule.as_str(), self.participants.first())
    }
}

/// Complete output of one analysis run
#[derive(Clone, Debug)]
pub struct AnalysisOutcome {
    pub model: AnalysisModel,
    pub graph: RelationshipGraph,
    pub matches: Vec<PatternMatch>,
    pub warnings: Vec<Warning>,
    /// True when the run was cancelled before all stages completed
    pub partial: bool,
}
