//! Analysis pipeline
//!
//! Reading, parsing and extraction are file-local and run on the rayon
//! pool; aggregation, resolution and detection run sequentially over
//! the read-only model. Per-file failures degrade that file to a
//! `Failed` entry plus one warning and never abort the run.

use crate::config::JavamapConfig;
use crate::core::{
    AnalysisModel, AnalysisOutcome, CancelFlag, Error, FileModel, ParseStatus, RelationshipGraph,
    Result, SourceFile, Warning,
};
use crate::detectors;
use crate::extractor;
use crate::io::{self, SourceWalker};
use crate::parser::{self, ParseOutcome};
use crate::resolver;
use log::{debug, info};
use rayon::prelude::*;
use std::path::Path;
use std::time::Duration;

pub struct Engine {
    config: JavamapConfig,
    parallel: bool,
    cancel: CancelFlag,
}

impl Engine {
    pub fn new(config: JavamapConfig) -> Self {
        Self {
            config,
            parallel: true,
            cancel: CancelFlag::new(),
        }
    }

    /// Process files on the current thread instead of the rayon pool
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Handle for cancelling this run from another thread
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn analyze(&self, root: &Path) -> Result<AnalysisOutcome> {
        if !root.is_dir() {
            return Err(Error::config(format!(
                "analysis root {} is not a directory",
                root.display()
            )));
        }

        let walker = SourceWalker::new(root, &self.config.files.exclude)?;
        let (files, mut warnings) = walker.walk();
        info!(
            "analyzing {} source files under {}",
            files.len(),
            root.display()
        );

        let results: Vec<Option<(FileModel, Vec<Warning>)>> = if self.parallel {
            files
                .par_iter()
                .map(|f| self.process_file(root, f))
                .collect()
        } else {
            files.iter().map(|f| self.process_file(root, f)).collect()
        };

        let mut file_models = Vec::new();
        for (file_model, file_warnings) in results.into_iter().flatten() {
            warnings.extend(file_warnings);
            file_models.push(file_model);
        }

        let model = AnalysisModel::from_files(root.to_path_buf(), file_models)?;

        // Cancelled before resolution: partial model, no graph
        if self.cancel.is_cancelled() {
            warnings.sort();
            return Ok(AnalysisOutcome {
                model,
                graph: RelationshipGraph::new(),
                matches: Vec::new(),
                warnings,
                partial: true,
            });
        }

        let (graph, resolution_warnings) = resolver::resolve(&model);
        warnings.extend(resolution_warnings);
        debug!(
            "resolved {} edges over {} types",
            graph.edge_count(),
            model.type_count()
        );

        let detector_set = detectors::all_detectors(&self.config)?;
        let (matches, detector_warnings, cancelled) =
            detectors::run_detectors(&detector_set, &model, &graph, &self.cancel);
        warnings.extend(detector_warnings);

        warnings.sort();
        Ok(AnalysisOutcome {
            model,
            graph,
            matches,
            warnings,
            partial: cancelled,
        })
    }

    /// Read, parse and extract one file. `None` when the run was
    /// cancelled before this file was picked up.
    fn process_file(&self, root: &Path, relative: &Path) -> Option<(FileModel, Vec<Warning>)> {
        if self.cancel.is_cancelled() {
            return None;
        }
        let full = root.join(relative);

        let failed = |reason: String| FileModel {
            file: SourceFile {
                path: relative.to_path_buf(),
                status: ParseStatus::Failed {
                    reason,
                    line: None,
                    column: None,
                },
            },
            package: String::new(),
            imports: Vec::new(),
            types: Vec::new(),
        };

        match io::file_size(&full) {
            Ok(size) if size > self.config.files.max_file_size_bytes => {
                let reason = format!(
                    "file size {size} exceeds the {} byte limit",
                    self.config.files.max_file_size_bytes
                );
                let warning = Warning::file_read(relative, reason.clone());
                return Some((failed(reason), vec![warning]));
            }
            Err(e) => {
                let reason = format!("could not stat file: {e}");
                let warning = Warning::file_read(relative, reason.clone());
                return Some((failed(reason), vec![warning]));
            }
            Ok(_) => {}
        }

        let content = match io::read_file(&full) {
            Ok(content) => content,
            Err(e) => {
                let reason = format!("could not read file: {e}");
                let warning = Warning::file_read(relative, reason.clone());
                return Some((failed(reason), vec![warning]));
            }
        };

        let timeout = Duration::from_secs(self.config.files.parse_timeout_secs);
        let tree = match parser::parse_source(&content, timeout) {
            ParseOutcome::Tree(tree) => tree,
            ParseOutcome::Failed { reason } => {
                let warning = Warning::parse(relative, reason.clone());
                return Some((failed(reason), vec![warning]));
            }
        };

        // A tree with localized errors still yields the intact
        // declarations; the defect is reported once
        let mut warnings = Vec::new();
        let mut issue = None;
        if tree.root_node().has_error() {
            issue = parser::first_syntax_issue(&tree);
            let message = match &issue {
                Some(issue) => format!(
                    "syntax error at {}:{}: {}",
                    issue.line, issue.column, issue.message
                ),
                None => "syntax error".to_string(),
            };
            warnings.push(Warning::parse(relative, message));
        }

        let extracted = extractor::extract(&tree, &content, relative);

        // When not a single declaration survived the errors, the file
        // contributes nothing the model can use
        let status = match issue {
            Some(issue) if extracted.types.is_empty() => ParseStatus::Failed {
                reason: issue.message,
                line: Some(issue.line),
                column: Some(issue.column),
            },
            _ => ParseStatus::Parsed,
        };

        Some((
            FileModel {
                file: SourceFile {
                    path: relative.to_path_buf(),
                    status,
                },
                package: extracted.package,
                imports: extracted.imports,
                types: extracted.types,
            },
            warnings,
        ))
    }
}
