//! Integration point recognition: HTTP endpoints and clients,
//! message producers and consumers, and producer/consumer pairing
//!
//! Recognition is driven entirely by the configured annotation and type
//! name lists, so projects on stacks other than the Spring/JAX-RS/Kafka
//! defaults can supply their own shapes.

use super::{Detector, DetectorOutput};
use crate::config::IntegrationConfig;
use crate::core::{
    AnalysisModel, Annotation, Confidence, DetectorKind, EdgeKind, Evidence, PatternMatch,
    RelationshipGraph, TypeEntity,
};
use std::collections::{BTreeMap, BTreeSet};

pub struct IntegrationDetector {
    config: IntegrationConfig,
}

impl IntegrationDetector {
    pub fn new(config: IntegrationConfig) -> Self {
        Self { config }
    }

    fn is_listed(list: &[String], name: &str) -> bool {
        list.iter().any(|entry| entry == name)
    }

    fn path_argument(annotation: &Annotation) -> Option<&str> {
        annotation.value().or_else(|| annotation.argument("path"))
    }

    /// HTTP verb implied by a mapping annotation name
    fn http_method(annotation: &Annotation) -> String {
        match annotation.simple_name() {
            "GetMapping" | "GET" => "GET".to_string(),
            "PostMapping" | "POST" => "POST".to_string(),
            "PutMapping" | "PUT" => "PUT".to_string(),
            "DeleteMapping" | "DELETE" => "DELETE".to_string(),
            "PatchMapping" | "PATCH" => "PATCH".to_string(),
            _ => annotation
                .argument("method")
                .and_then(|m| m.rsplit('.').next())
                .unwrap_or("*")
                .to_string(),
        }
    }

    fn join_paths(base: &str, sub: &str) -> String {
        match (base.is_empty(), sub.is_empty()) {
            (true, true) => "/".to_string(),
            (true, false) => sub.to_string(),
            (false, true) => base.to_string(),
            (false, false) => format!("{}/{}", base.trim_end_matches('/'), sub.trim_start_matches('/')),
        }
    }

    /// Channel names from a listener annotation: `topics`, `destination`,
    /// `queues` or the default element, array values comma-joined
    fn listener_channels(annotation: &Annotation) -> BTreeSet<String> {
        ["topics", "destination", "queues", "value"]
            .iter()
            .filter_map(|key| annotation.argument(key))
            .flat_map(|raw| raw.split(','))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }

    fn server_match(&self, entity: &TypeEntity) -> Option<PatternMatch> {
        let marker = entity
            .annotations
            .iter()
            .find(|a| Self::is_listed(&self.config.server_annotations, a.simple_name()))?;

        // Base path lives on the marker itself (JAX-RS @Path) or on a
        // type-level mapping annotation (Spring @RequestMapping)
        let base = Self::path_argument(marker)
            .or_else(|| {
                entity
                    .annotations
                    .iter()
                    .find(|a| Self::is_listed(&self.config.mapping_annotations, a.simple_name()))
                    .and_then(Self::path_argument)
            })
            .unwrap_or("");

        let mut endpoints = 0;
        let mut evidence = Vec::new();
        for method in &entity.methods {
            for annotation in &method.annotations {
                if !Self::is_listed(&self.config.mapping_annotations, annotation.simple_name()) {
                    continue;
                }
                endpoints += 1;
                let route = Self::join_paths(base, Self::path_argument(annotation).unwrap_or(""));
                evidence.push(Evidence::at(
                    format!("{} {} ({})", Self::http_method(annotation), route, method.name),
                    entity.file.clone(),
                    method.line,
                ));
            }
        }
        if evidence.is_empty() {
            evidence.push(Evidence::at(
                format!("annotated @{}", marker.simple_name()),
                entity.file.clone(),
                entity.line,
            ));
        }

        Some(PatternMatch {
            detector: DetectorKind::Integration,
            rule: "http-endpoint".to_string(),
            participants: vec![entity.qualified_name.clone()],
            confidence: Confidence::High,
            message: if endpoints > 0 {
                format!(
                    "`{}` serves {endpoints} HTTP endpoint(s) under `{}`",
                    entity.qualified_name,
                    if base.is_empty() { "/" } else { base }
                )
            } else {
                format!("`{}` is annotated as an HTTP server class", entity.qualified_name)
            },
            evidence,
        })
    }

    fn client_match(&self, entity: &TypeEntity) -> Option<PatternMatch> {
        let mut evidence = Vec::new();
        let mut annotated = false;

        for annotation in &entity.annotations {
            if Self::is_listed(&self.config.client_annotations, annotation.simple_name()) {
                annotated = true;
                let target = annotation
                    .argument("url")
                    .or_else(|| annotation.argument("name"))
                    .or_else(|| annotation.value())
                    .unwrap_or("unspecified target");
                evidence.push(Evidence::at(
                    format!("@{} -> {target}", annotation.simple_name()),
                    entity.file.clone(),
                    entity.line,
                ));
            }
        }
        for field in &entity.fields {
            if Self::is_listed(&self.config.client_types, &field.type_ref.name) {
                evidence.push(Evidence::at(
                    format!("field `{}` of type `{}`", field.name, field.type_ref.name),
                    entity.file.clone(),
                    field.line,
                ));
            }
        }
        for method in &entity.methods {
            for instantiation in &method.instantiations {
                if Self::is_listed(&self.config.client_types, &instantiation.name) {
                    evidence.push(Evidence::at(
                        format!("instantiates `{}` in {}", instantiation.name, method.name),
                        entity.file.clone(),
                        instantiation.line,
                    ));
                }
            }
        }
        if evidence.is_empty() {
            return None;
        }

        Some(PatternMatch {
            detector: DetectorKind::Integration,
            rule: "http-client".to_string(),
            participants: vec![entity.qualified_name.clone()],
            confidence: if annotated {
                Confidence::High
            } else {
                Confidence::Medium
            },
            message: format!("`{}` acts as an HTTP client", entity.qualified_name),
            evidence,
        })
    }

    fn consumer_match(&self, entity: &TypeEntity) -> Option<(PatternMatch, BTreeSet<String>)> {
        let mut channels = BTreeSet::new();
        let mut evidence = Vec::new();
        for method in &entity.methods {
            for annotation in &method.annotations {
                if !Self::is_listed(&self.config.listener_annotations, annotation.simple_name()) {
                    continue;
                }
                let listened = Self::listener_channels(annotation);
                let described = if listened.is_empty() {
                    "unspecified channel".to_string()
                } else {
                    listened
                        .iter()
                        .map(|c| format!("`{c}`"))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                evidence.push(Evidence::at(
                    format!("@{} {} on {described}", annotation.simple_name(), method.name),
                    entity.file.clone(),
                    method.line,
                ));
                channels.extend(listened);
            }
        }
        if evidence.is_empty() {
            return None;
        }

        let pattern = PatternMatch {
            detector: DetectorKind::Integration,
            rule: "message-consumer".to_string(),
            participants: vec![entity.qualified_name.clone()],
            confidence: Confidence::High,
            message: format!("`{}` consumes messages", entity.qualified_name),
            evidence,
        };
        Some((pattern, channels))
    }

    fn producer_match(&self, entity: &TypeEntity) -> Option<(PatternMatch, BTreeSet<String>)> {
        let producer_fields: Vec<&str> = entity
            .fields
            .iter()
            .filter(|f| Self::is_listed(&self.config.producer_types, &f.type_ref.name))
            .map(|f| f.name.as_str())
            .collect();
        if producer_fields.is_empty() {
            return None;
        }

        let mut evidence: Vec<Evidence> = entity
            .fields
            .iter()
            .filter(|f| producer_fields.contains(&f.name.as_str()))
            .map(|f| {
                Evidence::at(
                    format!("field `{}` of type `{}`", f.name, f.type_ref.name),
                    entity.file.clone(),
                    f.line,
                )
            })
            .collect();

        // A send call on a producer field makes the method's string
        // literals candidate channel names
        let mut channels = BTreeSet::new();
        let mut send_sites = 0;
        for method in &entity.methods {
            let sends: Vec<_> = method
                .call_sites
                .iter()
                .filter(|call| {
                    call.receiver.as_deref().is_some_and(|r| {
                        producer_fields.contains(&r) || producer_fields.contains(&r.trim_start_matches("this."))
                    })
                })
                .collect();
            if sends.is_empty() {
                continue;
            }
            send_sites += sends.len();
            channels.extend(method.string_literals.iter().cloned());
            for call in sends {
                evidence.push(Evidence::at(
                    format!("{}.{}(..) in {}", call.receiver.as_deref().unwrap_or(""), call.method, method.name),
                    entity.file.clone(),
                    call.line,
                ));
            }
        }

        let pattern = PatternMatch {
            detector: DetectorKind::Integration,
            rule: "message-producer".to_string(),
            participants: vec![entity.qualified_name.clone()],
            confidence: if send_sites > 0 {
                Confidence::High
            } else {
                Confidence::Medium
            },
            message: format!("`{}` produces messages", entity.qualified_name),
            evidence,
        };
        Some((pattern, channels))
    }

    /// Producer/consumer pairing: a shared channel literal, a resolved
    /// call between the two, or a shared non-JDK external dependency
    fn pair_matches(
        &self,
        graph: &RelationshipGraph,
        producers: &BTreeMap<String, BTreeSet<String>>,
        consumers: &BTreeMap<String, BTreeSet<String>>,
    ) -> Vec<PatternMatch> {
        let mut pairs = Vec::new();
        for (producer, produced) in producers {
            for (consumer, consumed) in consumers {
                if producer == consumer {
                    continue;
                }

                let shared_channels: Vec<&String> = produced.intersection(consumed).collect();
                let (confidence, evidence) = if !shared_channels.is_empty() {
                    let notes = shared_channels
                        .iter()
                        .map(|c| Evidence::note(format!("shared channel `{c}`")))
                        .collect();
                    (Confidence::High, notes)
                } else if self.linked_by_call(graph, producer, consumer) {
                    (
                        Confidence::High,
                        vec![Evidence::note("resolved call links the two types")],
                    )
                } else if let Some(dependency) = shared_external(graph, producer, consumer) {
                    (
                        Confidence::Medium,
                        vec![Evidence::note(format!("both depend on `{dependency}`"))],
                    )
                } else {
                    continue;
                };

                let mut participants = vec![producer.clone(), consumer.clone()];
                participants.sort();
                pairs.push(PatternMatch {
                    detector: DetectorKind::Integration,
                    rule: "producer-consumer-pair".to_string(),
                    participants,
                    confidence,
                    message: format!("`{producer}` feeds `{consumer}`"),
                    evidence,
                });
            }
        }
        pairs
    }

    fn linked_by_call(&self, graph: &RelationshipGraph, a: &str, b: &str) -> bool {
        graph
            .edges_from(a)
            .iter()
            .chain(graph.edges_from(b).iter())
            .any(|e| {
                e.kind == EdgeKind::Calls
                    && e.resolution.is_resolved()
                    && ((e.source == a && e.target == b) || (e.source == b && e.target == a))
            })
    }
}

/// First external dependency shared by both entities, JDK types excluded
fn shared_external(graph: &RelationshipGraph, a: &str, b: &str) -> Option<String> {
    let externals = |name: &str| -> BTreeSet<String> {
        graph
            .edges_from(name)
            .iter()
            .filter(|e| e.resolution.is_external())
            .filter(|e| {
                !["java.", "javax.", "jakarta."]
                    .iter()
                    .any(|p| e.target.starts_with(p))
            })
            .map(|e| e.target.clone())
            .collect()
    };
    externals(a).intersection(&externals(b)).next().cloned()
}

impl Detector for IntegrationDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Integration
    }

    fn detect(&self, model: &AnalysisModel, graph: &RelationshipGraph) -> DetectorOutput {
        if model.is_empty() {
            return DetectorOutput::skipped(self.kind(), "model contains no types");
        }

        let mut output = DetectorOutput::empty();
        let mut producers: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut consumers: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for entity in model.types.values() {
            if let Some(m) = self.server_match(entity) {
                output.matches.push(m);
            }
            if let Some(m) = self.client_match(entity) {
                output.matches.push(m);
            }
            if let Some((m, channels)) = self.consumer_match(entity) {
                output.matches.push(m);
                consumers.insert(entity.qualified_name.clone(), channels);
            }
            if let Some((m, channels)) = self.producer_match(entity) {
                output.matches.push(m);
                producers.insert(entity.qualified_name.clone(), channels);
            }
        }

        output
            .matches
            .extend(self.pair_matches(graph, &producers, &consumers));
        output
    }
}
