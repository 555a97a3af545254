//! Relationship resolution across the aggregated model
//!
//! Binds the as-written type references collected at extraction to
//! entities in the model, producing the relationship graph. Resolution
//! is purely syntactic: explicit imports beat same-package declarations
//! beat wildcard imports, and anything the rules cannot settle becomes
//! an Unresolved edge with a reason instead of a guess.

use crate::core::{
    AnalysisModel, EdgeKind, Method, RelationshipEdge, RelationshipGraph, Resolution, TypeEntity,
    TypeKind, Warning,
};

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void", "var",
];

/// Common java.lang types, implicitly imported everywhere. A simple name
/// matching nothing else but this table binds to the JDK rather than
/// ending up Unresolved.
const JAVA_LANG_TYPES: &[&str] = &[
    "AutoCloseable",
    "Boolean",
    "Byte",
    "CharSequence",
    "Character",
    "Class",
    "ClassLoader",
    "ClassCastException",
    "Cloneable",
    "Comparable",
    "Deprecated",
    "Double",
    "Enum",
    "Error",
    "Exception",
    "Float",
    "FunctionalInterface",
    "IllegalArgumentException",
    "IllegalStateException",
    "IndexOutOfBoundsException",
    "Integer",
    "InterruptedException",
    "Iterable",
    "Long",
    "Math",
    "NullPointerException",
    "Number",
    "NumberFormatException",
    "Object",
    "Override",
    "Process",
    "ProcessBuilder",
    "Record",
    "Runnable",
    "RuntimeException",
    "SafeVarargs",
    "Short",
    "String",
    "StringBuffer",
    "StringBuilder",
    "SuppressWarnings",
    "System",
    "Thread",
    "Throwable",
    "UnsupportedOperationException",
    "Void",
];

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

/// Resolve every reference in the model into the relationship graph.
///
/// Edges are produced in qualified-name order over the entities, member
/// order within each entity, so repeated runs emit identical graphs.
pub fn resolve(model: &AnalysisModel) -> (RelationshipGraph, Vec<Warning>) {
    let mut resolver = Resolver {
        model,
        graph: RelationshipGraph::new(),
        warnings: Vec::new(),
    };
    for entity in model.types.values() {
        resolver.resolve_entity(entity);
    }
    (resolver.graph, resolver.warnings)
}

/// One bound reference
#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    target: String,
    resolution: Resolution,
}

impl Binding {
    fn resolved(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            resolution: Resolution::Resolved,
        }
    }

    fn external(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            resolution: Resolution::External,
        }
    }

    fn unresolved(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            resolution: Resolution::Unresolved(reason.into()),
        }
    }
}

struct Resolver<'a> {
    model: &'a AnalysisModel,
    graph: RelationshipGraph,
    warnings: Vec<Warning>,
}

impl Resolver<'_> {
    fn resolve_entity(&mut self, entity: &TypeEntity) {
        self.hierarchy_edges(entity);
        self.field_edges(entity);
        for method in &entity.methods {
            self.signature_edges(entity, method);
            self.call_edges(entity, method);
        }
    }

    fn push_edge(
        &mut self,
        entity: &TypeEntity,
        kind: EdgeKind,
        binding: Binding,
        member: Option<String>,
        line: usize,
    ) {
        self.graph.add_edge(RelationshipEdge {
            source: entity.qualified_name.clone(),
            target: binding.target,
            kind,
            resolution: binding.resolution,
            member,
            file: entity.file.clone(),
            line,
        });
    }

    fn hierarchy_edges(&mut self, entity: &TypeEntity) {
        if let Some(superclass) = &entity.superclass {
            let binding = self.resolve_type_name(&superclass.name, entity);
            // An anonymous type's supertype may turn out to be an
            // interface it implements rather than a class it extends
            let kind = if entity.synthetic && self.binds_to_interface(&binding) {
                EdgeKind::Implements
            } else {
                EdgeKind::Extends
            };
            self.push_edge(entity, kind, binding, None, superclass.line);
        }

        // For interfaces the declared list is interface inheritance
        let kind = if entity.kind == TypeKind::Interface {
            EdgeKind::Extends
        } else {
            EdgeKind::Implements
        };
        for interface in &entity.interfaces {
            let binding = self.resolve_type_name(&interface.name, entity);
            self.push_edge(entity, kind, binding, None, interface.line);
        }
    }

    fn binds_to_interface(&self, binding: &Binding) -> bool {
        binding.resolution.is_resolved()
            && self
                .model
                .get_type(&binding.target)
                .is_some_and(|t| t.kind == TypeKind::Interface)
    }

    fn field_edges(&mut self, entity: &TypeEntity) {
        for field in &entity.fields {
            if is_primitive(&field.type_ref.name) {
                continue;
            }
            let binding = self.resolve_type_name(&field.type_ref.name, entity);
            self.push_edge(
                entity,
                EdgeKind::FieldOf,
                binding,
                Some(field.name.clone()),
                field.type_ref.line,
            );
        }
    }

    /// Parameter and return types both describe the method signature
    fn signature_edges(&mut self, entity: &TypeEntity, method: &Method) {
        for parameter in &method.parameters {
            if is_primitive(&parameter.type_ref.name) {
                continue;
            }
            let binding = self.resolve_type_name(&parameter.type_ref.name, entity);
            self.push_edge(
                entity,
                EdgeKind::ParameterOf,
                binding,
                Some(parameter.name.clone()),
                parameter.type_ref.line,
            );
        }
        if let Some(return_type) = &method.return_type {
            if !is_primitive(&return_type.name) {
                let binding = self.resolve_type_name(&return_type.name, entity);
                self.push_edge(
                    entity,
                    EdgeKind::ParameterOf,
                    binding,
                    Some(method.name.clone()),
                    return_type.line,
                );
            }
        }
    }

    fn call_edges(&mut self, entity: &TypeEntity, method: &Method) {
        for instantiation in &method.instantiations {
            if is_primitive(&instantiation.name) {
                continue;
            }
            let binding = self.resolve_type_name(&instantiation.name, entity);
            self.push_edge(
                entity,
                EdgeKind::Calls,
                binding,
                Some("<init>".to_string()),
                instantiation.line,
            );
        }

        for call in &method.call_sites {
            let binding = match self.receiver_type(entity, method, call.receiver.as_deref()) {
                ReceiverType::Own => Binding::resolved(entity.qualified_name.clone()),
                ReceiverType::Named(type_name) => self.resolve_type_name(&type_name, entity),
                ReceiverType::NotDetermined(reason) => Binding::unresolved(
                    call.receiver.clone().unwrap_or_else(|| call.method.clone()),
                    reason,
                ),
            };
            self.push_edge(
                entity,
                EdgeKind::Calls,
                binding,
                Some(call.method.clone()),
                call.line,
            );
        }
    }

    /// Static type of a call receiver, where determinable.
    ///
    /// Local declarations take priority over parameters over fields,
    /// matching Java shadowing. Chained expressions and anything typed
    /// through generics stay undetermined rather than guessed.
    fn receiver_type(
        &self,
        entity: &TypeEntity,
        method: &Method,
        receiver: Option<&str>,
    ) -> ReceiverType {
        let Some(receiver) = receiver else {
            return ReceiverType::Own;
        };

        if receiver == "this" {
            return ReceiverType::Own;
        }
        if receiver == "super" {
            return match &entity.superclass {
                Some(superclass) => ReceiverType::Named(superclass.name.clone()),
                None => ReceiverType::NotDetermined("no superclass declared".to_string()),
            };
        }
        if receiver.contains('(') || receiver.contains('[') {
            return ReceiverType::NotDetermined(
                "receiver type not statically determined".to_string(),
            );
        }

        // this.x is field access on the own type
        let field_name = receiver.strip_prefix("this.");
        if let Some(name) = field_name {
            return match entity.fields.iter().find(|f| f.name == name) {
                Some(field) => self.typed_variable(&field.type_ref.name),
                None => ReceiverType::NotDetermined(format!("no field named `{name}`")),
            };
        }

        if !receiver.contains('.') {
            let locals: Vec<&str> = method
                .locals
                .iter()
                .filter(|l| l.name == receiver)
                .map(|l| l.type_name.as_str())
                .collect();
            match locals.as_slice() {
                [] => {}
                [only] => return self.typed_variable(only),
                [first, rest @ ..] if rest.iter().all(|t| t == first) => {
                    return self.typed_variable(first);
                }
                _ => {
                    return ReceiverType::NotDetermined(format!(
                        "conflicting local declarations of `{receiver}`"
                    ));
                }
            }
            if let Some(parameter) = method.parameters.iter().find(|p| p.name == receiver) {
                return self.typed_variable(&parameter.type_ref.name);
            }
            if let Some(field) = entity.fields.iter().find(|f| f.name == receiver) {
                return self.typed_variable(&field.type_ref.name);
            }
        }

        // A capitalized final segment reads as a type: a static call
        let final_segment = receiver.rsplit('.').next().unwrap_or(receiver);
        if final_segment.starts_with(|c: char| c.is_ascii_uppercase()) {
            return ReceiverType::Named(receiver.to_string());
        }

        ReceiverType::NotDetermined("receiver type not statically determined".to_string())
    }

    fn typed_variable(&self, type_name: &str) -> ReceiverType {
        if type_name == "var" || is_primitive(type_name) {
            ReceiverType::NotDetermined("receiver type not statically determined".to_string())
        } else {
            ReceiverType::Named(type_name.to_string())
        }
    }

    /// Bind a type name written in `entity`'s file.
    ///
    /// Order: enclosing-type scope, explicit single-type import,
    /// same-package declaration, wildcard imports, implicit java.lang.
    /// An ambiguous wildcard match is Unresolved, never a guess.
    fn resolve_type_name(&mut self, name: &str, entity: &TypeEntity) -> Binding {
        if name.contains('.') {
            return self.resolve_qualified(name, entity);
        }

        // Nested types of the enclosing chain are in scope by simple name
        let mut scope = entity.qualified_name.as_str();
        while scope.len() > entity.package.len() {
            let candidate = format!("{scope}.{name}");
            if self.model.contains_type(&candidate) {
                return Binding::resolved(candidate);
            }
            match scope.rfind('.') {
                Some(idx) => scope = &scope[..idx],
                None => break,
            }
        }

        let imports = self.model.imports_for(&entity.file);
        // Static imports bind members, not type names
        if let Some(import) = imports
            .iter()
            .find(|i| !i.wildcard && !i.is_static && i.simple_name() == Some(name))
        {
            return if self.model.contains_type(&import.path) {
                Binding::resolved(import.path.clone())
            } else {
                Binding::external(import.path.clone())
            };
        }

        let same_package = if entity.package.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", entity.package, name)
        };
        if self.model.contains_type(&same_package) {
            return Binding::resolved(same_package);
        }

        let wildcard_matches: Vec<String> = imports
            .iter()
            .filter(|i| i.wildcard && !i.is_static)
            .map(|i| format!("{}.{}", i.path, name))
            .filter(|candidate| self.model.contains_type(candidate))
            .collect();
        match wildcard_matches.as_slice() {
            [only] => return Binding::resolved(only.clone()),
            [] => {}
            several => {
                let reason = format!(
                    "ambiguous wildcard import resolution: {}",
                    several.join(", ")
                );
                self.warnings.push(Warning::resolution(
                    Some(entity.file.clone()),
                    format!("`{name}` in {}: {reason}", entity.qualified_name),
                ));
                return Binding::unresolved(name, reason);
            }
        }

        if JAVA_LANG_TYPES.contains(&name) {
            return Binding::external(format!("java.lang.{name}"));
        }

        // Declared somewhere in the model but not visible from this file
        let candidates = self.model.candidates_for(name);
        if !candidates.is_empty() {
            return Binding::unresolved(
                name,
                format!(
                    "declared as {} but not imported here",
                    candidates.join(", ")
                ),
            );
        }

        let wildcards: Vec<&str> = imports
            .iter()
            .filter(|i| i.wildcard && !i.is_static)
            .map(|i| i.path.as_str())
            .collect();
        if wildcards.is_empty() {
            Binding::unresolved(name, "no matching import or declaration")
        } else {
            Binding::unresolved(
                name,
                format!(
                    "not declared in the analyzed sources; may come from {}",
                    wildcards
                        .iter()
                        .map(|w| format!("{w}.*"))
                        .collect::<Vec<_>>()
                        .join(" or ")
                ),
            )
        }
    }

    fn resolve_qualified(&mut self, name: &str, entity: &TypeEntity) -> Binding {
        if self.model.contains_type(name) {
            return Binding::resolved(name);
        }

        // Partially qualified relative to the package, e.g. Outer.Inner
        if !entity.package.is_empty() {
            let package_relative = format!("{}.{}", entity.package, name);
            if self.model.contains_type(&package_relative) {
                return Binding::resolved(package_relative);
            }
        }

        // First segment may itself be an imported or local simple name
        if let Some((head, rest)) = name.split_once('.') {
            if head.starts_with(|c: char| c.is_ascii_uppercase()) {
                if let Some(target) = self.resolve_simple_in_model(head, entity) {
                    let candidate = format!("{target}.{rest}");
                    if self.model.contains_type(&candidate) {
                        return Binding::resolved(candidate);
                    }
                }
            }
        }

        // A qualified name into a package we analyzed, naming a type we
        // never saw, is reported instead of presumed external
        if let Some(parent) = name.rsplit_once('.').map(|(p, _)| p) {
            if self.model.packages().contains(parent) {
                let reason = format!("package `{parent}` declares no such type");
                self.warnings.push(Warning::resolution(
                    Some(entity.file.clone()),
                    format!("`{name}` in {}: {reason}", entity.qualified_name),
                ));
                return Binding::unresolved(name, reason);
            }
        }

        Binding::external(name)
    }

    /// Simple-name lookup restricted to unambiguous in-model hits.
    /// Used when binding the head segment of a partially qualified name.
    fn resolve_simple_in_model(&self, name: &str, entity: &TypeEntity) -> Option<String> {
        let mut scope = entity.qualified_name.as_str();
        while scope.len() > entity.package.len() {
            let candidate = format!("{scope}.{name}");
            if self.model.contains_type(&candidate) {
                return Some(candidate);
            }
            match scope.rfind('.') {
                Some(idx) => scope = &scope[..idx],
                None => break,
            }
        }

        let imports = self.model.imports_for(&entity.file);
        if let Some(import) = imports
            .iter()
            .find(|i| !i.wildcard && !i.is_static && i.simple_name() == Some(name))
        {
            return self
                .model
                .contains_type(&import.path)
                .then(|| import.path.clone());
        }

        let same_package = if entity.package.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", entity.package, name)
        };
        if self.model.contains_type(&same_package) {
            return Some(same_package);
        }

        let mut matches = imports
            .iter()
            .filter(|i| i.wildcard && !i.is_static)
            .map(|i| format!("{}.{}", i.path, name))
            .filter(|candidate| self.model.contains_type(candidate));
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
    }
}

enum ReceiverType {
    /// The enclosing type itself (unqualified calls, `this`)
    Own,
    /// A type name still to be resolved
    Named(String),
    NotDetermined(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AnalysisModel, FileModel, ParseStatus, SourceFile};
    use crate::extractor;
    use crate::parser::{parse_source, ParseOutcome};
    use indoc::indoc;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn model_of(files: &[(&str, &str)]) -> AnalysisModel {
        let mut file_models = Vec::new();
        for (path, source) in files {
            let tree = match parse_source(source, Duration::from_secs(10)) {
                ParseOutcome::Tree(tree) => tree,
                ParseOutcome::Failed { reason } => panic!("parse failed: {reason}"),
            };
            let extracted = extractor::extract(&tree, source, Path::new(path));
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
        AnalysisModel::from_files(PathBuf::from("."), file_models).unwrap()
    }

    fn find_edge<'g>(
        graph: &'g RelationshipGraph,
        source: &str,
        kind: EdgeKind,
    ) -> &'g RelationshipEdge {
        graph
            .edges()
            .find(|e| e.source == source && e.kind == kind)
            .unwrap_or_else(|| panic!("no {kind:?} edge from {source}"))
    }

    #[test]
    fn test_implements_field_and_call_through_field() {
        let model = model_of(&[
            (
                "pkg/B.java",
                "package pkg;\npublic interface B { void doWork(); }\n",
            ),
            (
                "pkg/A.java",
                "package pkg;\npublic class A implements B { public void doWork() {} }\n",
            ),
            (
                "pkg/C.java",
                indoc! {r#"
                    package pkg;
                    public class C {
                        private A a;
                        void trigger() { a.doWork(); }
                    }
                "#},
            ),
        ]);
        let (graph, warnings) = resolve(&model);

        let implements = find_edge(&graph, "pkg.A", EdgeKind::Implements);
        assert_eq!(implements.target, "pkg.B");
        assert!(implements.resolution.is_resolved());

        let field_of = find_edge(&graph, "pkg.C", EdgeKind::FieldOf);
        assert_eq!(field_of.target, "pkg.A");
        assert_eq!(field_of.member.as_deref(), Some("a"));

        let calls = find_edge(&graph, "pkg.C", EdgeKind::Calls);
        assert_eq!(calls.target, "pkg.A");
        assert_eq!(calls.member.as_deref(), Some("doWork"));
        assert!(calls.resolution.is_resolved());

        assert!(warnings.is_empty());
    }

    #[test]
    fn test_extends_jdk_class_is_external() {
        let model = model_of(&[(
            "p/Names.java",
            "package p;\nimport java.util.ArrayList;\npublic class Names extends ArrayList {}\n",
        )]);
        let (graph, _) = resolve(&model);

        let extends = find_edge(&graph, "p.Names", EdgeKind::Extends);
        assert_eq!(extends.target, "java.util.ArrayList");
        assert_eq!(extends.resolution, Resolution::External);
    }

    #[test]
    fn test_ambiguous_wildcard_is_unresolved_with_warning() {
        let model = model_of(&[
            ("a/Foo.java", "package a;\npublic class Foo {}\n"),
            ("b/Foo.java", "package b;\npublic class Foo {}\n"),
            (
                "c/User.java",
                indoc! {r#"
                    package c;
                    import a.*;
                    import b.*;
                    public class User {
                        private Foo foo;
                    }
                "#},
            ),
        ]);
        let (graph, warnings) = resolve(&model);

        let edge = find_edge(&graph, "c.User", EdgeKind::FieldOf);
        match &edge.resolution {
            Resolution::Unresolved(reason) => {
                assert!(reason.contains("ambiguous wildcard import"));
                assert!(reason.contains("a.Foo"));
                assert!(reason.contains("b.Foo"));
            }
            other => panic!("expected unresolved, got {other:?}"),
        }
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_explicit_import_beats_wildcard() {
        let model = model_of(&[
            ("a/Foo.java", "package a;\npublic class Foo {}\n"),
            ("b/Foo.java", "package b;\npublic class Foo {}\n"),
            (
                "c/User.java",
                indoc! {r#"
                    package c;
                    import a.Foo;
                    import b.*;
                    public class User {
                        private Foo foo;
                    }
                "#},
            ),
        ]);
        let (graph, warnings) = resolve(&model);

        let edge = find_edge(&graph, "c.User", EdgeKind::FieldOf);
        assert_eq!(edge.target, "a.Foo");
        assert!(edge.resolution.is_resolved());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_same_package_beats_wildcard() {
        let model = model_of(&[
            ("a/Foo.java", "package a;\npublic class Foo {}\n"),
            ("c/Foo.java", "package c;\npublic class Foo {}\n"),
            (
                "c/User.java",
                indoc! {r#"
                    package c;
                    import a.*;
                    public class User {
                        private Foo foo;
                    }
                "#},
            ),
        ]);
        let (graph, _) = resolve(&model);

        let edge = find_edge(&graph, "c.User", EdgeKind::FieldOf);
        assert_eq!(edge.target, "c.Foo");
    }

    #[test]
    fn test_receiver_through_parameter_and_local() {
        let model = model_of(&[
            ("p/Svc.java", "package p;\npublic class Svc { public void go() {} }\n"),
            (
                "p/Caller.java",
                indoc! {r#"
                    package p;
                    public class Caller {
                        void viaParam(Svc svc) { svc.go(); }
                        void viaLocal() {
                            Svc s = new Svc();
                            s.go();
                        }
                    }
                "#},
            ),
        ]);
        let (graph, _) = resolve(&model);

        let calls: Vec<&RelationshipEdge> = graph
            .edges()
            .filter(|e| e.source == "p.Caller" && e.kind == EdgeKind::Calls)
            .collect();
        // new Svc() plus two resolved go() calls
        assert!(calls.iter().all(|e| e.target == "p.Svc"));
        assert_eq!(calls.len(), 3);
        assert!(calls
            .iter()
            .any(|e| e.member.as_deref() == Some("<init>")));
    }

    #[test]
    fn test_chained_receiver_stays_unresolved() {
        let model = model_of(&[(
            "p/Chain.java",
            indoc! {r#"
                package p;
                public class Chain {
                    void run(Builder b) { b.build().execute(); }
                }
            "#},
        )]);
        let (graph, _) = resolve(&model);

        let execute = graph
            .edges()
            .find(|e| e.member.as_deref() == Some("execute"))
            .unwrap();
        match &execute.resolution {
            Resolution::Unresolved(reason) => {
                assert_eq!(reason, "receiver type not statically determined");
            }
            other => panic!("expected unresolved, got {other:?}"),
        }
    }

    #[test]
    fn test_super_and_unqualified_calls() {
        let model = model_of(&[
            (
                "p/Base.java",
                "package p;\npublic class Base { protected void init() {} }\n",
            ),
            (
                "p/Derived.java",
                indoc! {r#"
                    package p;
                    public class Derived extends Base {
                        void setUp() {
                            super.init();
                            helper();
                        }
                        void helper() {}
                    }
                "#},
            ),
        ]);
        let (graph, _) = resolve(&model);

        let super_call = graph
            .edges()
            .find(|e| e.member.as_deref() == Some("init"))
            .unwrap();
        assert_eq!(super_call.target, "p.Base");

        let self_call = graph
            .edges()
            .find(|e| e.member.as_deref() == Some("helper"))
            .unwrap();
        assert_eq!(self_call.target, "p.Derived");
    }

    #[test]
    fn test_plain_string_binds_to_java_lang() {
        let model = model_of(&[(
            "p/Doc.java",
            "package p;\npublic class Doc { private String title; }\n",
        )]);
        let (graph, _) = resolve(&model);

        let edge = find_edge(&graph, "p.Doc", EdgeKind::FieldOf);
        assert_eq!(edge.target, "java.lang.String");
        assert_eq!(edge.resolution, Resolution::External);
    }

    #[test]
    fn test_unimported_declaration_is_named_in_the_reason() {
        let model = model_of(&[
            ("a/Hidden.java", "package a;\npublic class Hidden {}\n"),
            (
                "c/User.java",
                "package c;\npublic class User { private Hidden h; }\n",
            ),
        ]);
        let (graph, _) = resolve(&model);

        let edge = find_edge(&graph, "c.User", EdgeKind::FieldOf);
        match &edge.resolution {
            Resolution::Unresolved(reason) => {
                assert_eq!(reason, "declared as a.Hidden but not imported here");
            }
            other => panic!("expected unresolved, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_type_in_analyzed_package_is_reported() {
        let model = model_of(&[
            ("a/Known.java", "package a;\npublic class Known {}\n"),
            (
                "p/User.java",
                "package p;\npublic class User { private a.Ghost ghost; }\n",
            ),
        ]);
        let (graph, warnings) = resolve(&model);

        let edge = find_edge(&graph, "p.User", EdgeKind::FieldOf);
        assert!(matches!(edge.resolution, Resolution::Unresolved(_)));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("a.Ghost"));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let model = model_of(&[
            ("p/B.java", "package p;\npublic interface B {}\n"),
            (
                "p/A.java",
                "package p;\npublic class A implements B { void go(A other) { other.hashCode(); } }\n",
            ),
        ]);
        let (first, _) = resolve(&model);
        let (second, _) = resolve(&model);

        assert_eq!(first.sorted_edges(), second.sorted_edges());
    }

    #[test]
    fn test_anonymous_supertype_kind_follows_target() {
        let model = model_of(&[
            ("p/Task.java", "package p;\npublic interface Task { void run(); }\n"),
            (
                "p/Runner.java",
                indoc! {r#"
                    package p;
                    public class Runner {
                        void submit() {
                            Task t = new Task() { public void run() {} };
                        }
                    }
                "#},
            ),
        ]);
        let (graph, _) = resolve(&model);

        let edge = find_edge(&graph, "p.Runner.submit$1", EdgeKind::Implements);
        assert_eq!(edge.target, "p.Task");
    }
}
