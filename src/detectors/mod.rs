//! Pattern detectors over the aggregated model and relationship graph
//!
//! Every detector is independent: it reads the shared model and graph,
//! produces its own matches and warnings, and never sees another
//! detector's output. A detector that cannot establish the evidence it
//! needs emits no match rather than a guess.

pub mod integration;
pub mod legacy_api;
pub mod naming;
pub mod service_boundary;

pub use integration::IntegrationDetector;
pub use legacy_api::LegacyApiDetector;
pub use naming::NamingDetector;
pub use service_boundary::ServiceBoundaryDetector;

use crate::config::JavamapConfig;
use crate::core::{
    AnalysisModel, CancelFlag, DetectorKind, PatternMatch, RelationshipGraph, Result, Warning,
};

pub trait Detector: Send + Sync {
    fn kind(&self) -> DetectorKind;
    fn detect(&self, model: &AnalysisModel, graph: &RelationshipGraph) -> DetectorOutput;
}

/// What one detector produced
#[derive(Debug, Default)]
pub struct DetectorOutput {
    pub matches: Vec<PatternMatch>,
    pub warnings: Vec<Warning>,
}

impl DetectorOutput {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Zero matches plus a warning explaining the unmet precondition
    pub fn skipped(kind: DetectorKind, reason: impl Into<String>) -> Self {
        Self {
            matches: Vec::new(),
            warnings: vec![Warning::detector(kind.display_name(), reason)],
        }
    }
}

/// The canonical detector set, configured
pub fn all_detectors(config: &JavamapConfig) -> Result<Vec<Box<dyn Detector>>> {
    Ok(vec![
        Box::new(ServiceBoundaryDetector::new(config.boundaries.clone())),
        Box::new(IntegrationDetector::new(config.integration.clone())),
        Box::new(LegacyApiDetector::new(&config.legacy)?),
        Box::new(NamingDetector::new(config.naming.clone())),
    ])
}

/// Run every detector sequentially over the read-only model and graph.
///
/// Cancellation is honored between detectors; a detector never runs
/// half-way. Matches come back in exporter order.
pub fn run_detectors(
    detectors: &[Box<dyn Detector>],
    model: &AnalysisModel,
    graph: &RelationshipGraph,
    cancel: &CancelFlag,
) -> (Vec<PatternMatch>, Vec<Warning>, bool) {
    let mut matches = Vec::new();
    let mut warnings = Vec::new();
    let mut cancelled = false;

    for detector in detectors {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }
        let output = detector.detect(model, graph);
        matches.extend(output.matches);
        warnings.extend(output.warnings);
    }

    matches.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    (matches, warnings, cancelled)
}

/// Parse, extract and resolve a set of in-memory sources. Shared by the
/// detector test modules.
#[cfg(test)]
pub(crate) fn fixture(files: &[(&str, &str)]) -> (AnalysisModel, RelationshipGraph) {
    use crate::core::{FileModel, ParseStatus, SourceFile};
    use crate::parser::{parse_source, ParseOutcome};
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    let mut file_models = Vec::new();
    for (path, source) in files {
        let tree = match parse_source(source, Duration::from_secs(10)) {
            ParseOutcome::Tree(tree) => tree,
            ParseOutcome::Failed { reason } => panic!("parse failed: {reason}"),
        };
        let extracted = crate::extractor::extract(&tree, source, Path::new(path));
        file_models.push(FileModel {
            file: SourceFile {
                path: PathBuf::from(path),
                status: ParseStatus::Parsed,
            },
            package: extracted.package,
            imports: extracted.imports,
            types: extracted.types,
        });
    }
    let model = AnalysisModel::from_files(PathBuf::from("."), file_models).unwrap();
    let (graph, _) = crate::resolver::resolve(&model);
    (model, graph)
}
