// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod detectors;
pub mod engine;
pub mod extractor;
pub mod io;
pub mod output;
pub mod parser;
pub mod resolver;

// Re-export commonly used types
pub use crate::core::{
    AnalysisModel, AnalysisOutcome, Annotation, CallSite, CancelFlag, Confidence, DetectorKind,
    EdgeKind, Error, Evidence, Field, FileModel, Import, Method, ParseStatus, PatternMatch,
    RelationshipEdge, RelationshipGraph, Resolution, Result, SourceFile, TypeEntity, TypeKind,
    Warning, WarningCategory,
};

pub use crate::config::JavamapConfig;
pub use crate::engine::Engine;
pub use crate::output::{build_export, ExportedModel};
