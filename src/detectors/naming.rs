//! Stereotype naming conventions
//!
//! Each configured rule ties an annotation to an expected simple-name
//! suffix, e.g. types annotated `@Service` end in `Service`. The first
//! rule whose annotation an entity carries decides; later rules do not
//! pile further matches onto the same type.

use super::{Detector, DetectorOutput};
use crate::config::NamingConfig;
use crate::core::{
    AnalysisModel, Confidence, DetectorKind, Evidence, PatternMatch, RelationshipGraph,
};

pub struct NamingDetector {
    config: NamingConfig,
}

impl NamingDetector {
    pub fn new(config: NamingConfig) -> Self {
        Self { config }
    }
}

impl Detector for NamingDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Naming
    }

    fn detect(&self, model: &AnalysisModel, _graph: &RelationshipGraph) -> DetectorOutput {
        if self.config.suffix_rules.is_empty() {
            return DetectorOutput::empty();
        }
        if model.is_empty() {
            return DetectorOutput::skipped(self.kind(), "model contains no types");
        }

        let mut output = DetectorOutput::empty();
        for entity in model.types.values() {
            // Anonymous and local types have machine-made names
            if entity.synthetic {
                continue;
            }
            let Some(rule) = self
                .config
                .suffix_rules
                .iter()
                .find(|r| entity.has_annotation(&r.annotation))
            else {
                continue;
            };
            if entity.simple_name.ends_with(&rule.suffix) {
                continue;
            }

            output.matches.push(PatternMatch {
                detector: self.kind(),
                rule: "stereotype-suffix".to_string(),
                participants: vec![entity.qualified_name.clone()],
                confidence: Confidence::Medium,
                message: format!(
                    "`{}` is annotated @{} but its name does not end with `{}`",
                    entity.qualified_name, rule.annotation, rule.suffix
                ),
                evidence: vec![Evidence::at(
                    format!("declared as `{}`", entity.simple_name),
                    entity.file.clone(),
                    entity.line,
                )],
            });
        }
        output
    }
}
