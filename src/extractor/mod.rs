//! Entity extraction from Java parse trees
//!
//! Walks one file's tree and produces the declared types with their
//! members, call sites and literals. Qualified names are built from the
//! package plus the enclosing-type chain; anonymous and local types get
//! synthetic names from the enclosing method (or field, for
//! initializers) plus a declaration ordinal counted per enclosing type,
//! so repeated runs on identical input name them identically and
//! overloaded methods cannot collide.

use crate::core::{
    Annotation, CallSite, Field, Import, LocalVar, Method, Parameter, TypeEntity, TypeKind,
    TypeRef,
};
use crate::parser::{node_line, node_text};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Tree};

/// Declarations found in one parsed file
#[derive(Debug, Default)]
pub struct ExtractedFile {
    pub package: String,
    pub imports: Vec<Import>,
    pub types: Vec<TypeEntity>,
}

pub fn extract(tree: &Tree, source: &str, file: &Path) -> ExtractedFile {
    let mut extractor = Extractor {
        source,
        file: file.to_path_buf(),
        package: String::new(),
        imports: Vec::new(),
        types: Vec::new(),
    };
    extractor.walk_root(tree.root_node());
    ExtractedFile {
        package: extractor.package,
        imports: extractor.imports,
        types: extractor.types,
    }
}

/// Call sites and declarations collected from one method body
#[derive(Default)]
struct BodyScan {
    call_sites: Vec<CallSite>,
    instantiations: Vec<TypeRef>,
    locals: Vec<LocalVar>,
    string_literals: Vec<String>,
}

struct Extractor<'a> {
    source: &'a str,
    file: PathBuf,
    package: String,
    imports: Vec<Import>,
    types: Vec<TypeEntity>,
}

const TYPE_DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

impl Extractor<'_> {
    fn text(&self, node: Node) -> &str {
        node_text(&node, self.source)
    }

    fn walk_root(&mut self, root: Node) {
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "package_declaration" => self.package = self.extract_package(child),
                "import_declaration" => {
                    if let Some(import) = self.extract_import(child) {
                        self.imports.push(import);
                    }
                }
                kind if TYPE_DECLARATION_KINDS.contains(&kind) => {
                    self.extract_declared_type(child, None, false);
                }
                _ => {}
            }
        }
    }

    fn extract_package(&self, node: Node) -> String {
        let mut cursor = node.walk();
        let package = node
            .named_children(&mut cursor)
            .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"))
            .map(|c| self.text(c).to_string())
            .unwrap_or_default();
        package
    }

    fn extract_import(&self, node: Node) -> Option<Import> {
        let text = self.text(node).trim().trim_end_matches(';').trim();
        let text = text.strip_prefix("import")?.trim();
        let (is_static, text) = match text.strip_prefix("static") {
            Some(rest) if rest.starts_with(char::is_whitespace) => (true, rest.trim()),
            _ => (false, text),
        };
        let (wildcard, path) = match text.strip_suffix(".*") {
            Some(base) => (true, base),
            None => (false, text),
        };
        if path.is_empty() {
            return None;
        }
        Some(Import {
            path: path.to_string(),
            wildcard,
            is_static,
        })
    }

    /// Extract a type declaration node, computing its names from the
    /// package and enclosing chain
    fn extract_declared_type(&mut self, node: Node, enclosing: Option<&str>, synthetic: bool) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let simple = self.text(name_node).to_string();
        let qualified = match enclosing {
            Some(outer) => format!("{outer}.{simple}"),
            None if self.package.is_empty() => simple.clone(),
            None => format!("{}.{}", self.package, simple),
        };
        self.extract_type_with_names(node, qualified, simple, synthetic);
    }

    fn extract_type_with_names(
        &mut self,
        node: Node,
        qualified: String,
        simple: String,
        synthetic: bool,
    ) {
        let kind = match node.kind() {
            "interface_declaration" => TypeKind::Interface,
            "enum_declaration" => TypeKind::Enum,
            "annotation_type_declaration" => TypeKind::Annotation,
            // Records are modeled as classes with final fields
            _ => TypeKind::Class,
        };

        let (modifiers, annotations) = self.modifiers_and_annotations(node);
        let mut entity = TypeEntity {
            qualified_name: qualified,
            simple_name: simple,
            package: self.package.clone(),
            kind,
            modifiers,
            annotations,
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            file: self.file.clone(),
            line: node_line(&node),
            synthetic,
        };

        entity.superclass = self.extract_superclass(node);
        entity.interfaces = self.extract_interface_list(node);

        if node.kind() == "record_declaration" {
            self.extract_record_components(node, &mut entity);
        }

        // One counter per enclosing type keeps synthetic names unique
        // even when overloaded methods each declare an anonymous class
        let mut synth_ordinal = 1usize;
        if let Some(body) = node.child_by_field_name("body") {
            self.extract_members(body, &mut entity, &mut synth_ordinal);
        }

        self.types.push(entity);
    }

    fn extract_superclass(&self, node: Node) -> Option<TypeRef> {
        let mut cursor = node.walk();
        let superclass = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "superclass")?;
        let mut inner = superclass.walk();
        let type_ref = superclass
            .named_children(&mut inner)
            .next()
            .map(|t| TypeRef::new(self.erased_type_name(t), node_line(&t)));
        type_ref
    }

    /// `implements` list for classes/enums/records, `extends` list for
    /// interfaces; the resolver picks the edge kind from the entity kind
    fn extract_interface_list(&self, node: Node) -> Vec<TypeRef> {
        let mut refs = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if !matches!(child.kind(), "super_interfaces" | "extends_interfaces") {
                continue;
            }
            let mut inner = child.walk();
            for list in child.named_children(&mut inner) {
                if list.kind() != "type_list" {
                    continue;
                }
                let mut list_cursor = list.walk();
                for ty in list.named_children(&mut list_cursor) {
                    refs.push(TypeRef::new(self.erased_type_name(ty), node_line(&ty)));
                }
            }
        }
        refs
    }

    fn extract_record_components(&self, node: Node, entity: &mut TypeEntity) {
        let Some(params) = node.child_by_field_name("parameters") else {
            return;
        };
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if param.kind() != "formal_parameter" {
                continue;
            }
            let (Some(ty), Some(name)) = (
                param.child_by_field_name("type"),
                param.child_by_field_name("name"),
            ) else {
                continue;
            };
            entity.fields.push(Field {
                name: self.text(name).to_string(),
                type_ref: TypeRef::new(self.erased_type_name(ty), node_line(&ty)),
                modifiers: ["private", "final"].iter().map(|s| s.to_string()).collect(),
                annotations: Vec::new(),
                string_literals: Vec::new(),
                line: node_line(&param),
            });
        }
    }

    fn extract_members(&mut self, body: Node, entity: &mut TypeEntity, synth_ordinal: &mut usize) {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "field_declaration" => self.extract_fields(member, entity, synth_ordinal),
                "method_declaration" => {
                    let method =
                        self.extract_method(member, &entity.qualified_name, false, synth_ordinal);
                    entity.methods.push(method);
                }
                "constructor_declaration" => {
                    let method =
                        self.extract_method(member, &entity.qualified_name, true, synth_ordinal);
                    entity.methods.push(method);
                }
                "enum_constant" => {
                    entity.fields.push(Field {
                        name: member
                            .child_by_field_name("name")
                            .map(|n| self.text(n).to_string())
                            .unwrap_or_default(),
                        type_ref: TypeRef::new(entity.simple_name.clone(), node_line(&member)),
                        modifiers: ["public", "static", "final"]
                            .iter()
                            .map(|s| s.to_string())
                            .collect(),
                        annotations: Vec::new(),
                        string_literals: Vec::new(),
                        line: node_line(&member),
                    });
                }
                // Enum bodies nest ordinary members one level down
                "enum_body_declarations" => {
                    self.extract_members(member, entity, synth_ordinal);
                }
                "annotation_type_element_declaration" => {
                    if let Some(name) = member.child_by_field_name("name") {
                        entity.methods.push(Method {
                            name: self.text(name).to_string(),
                            return_type: member
                                .child_by_field_name("type")
                                .map(|t| TypeRef::new(self.erased_type_name(t), node_line(&t))),
                            parameters: Vec::new(),
                            modifiers: BTreeSet::new(),
                            annotations: Vec::new(),
                            call_sites: Vec::new(),
                            instantiations: Vec::new(),
                            locals: Vec::new(),
                            string_literals: Vec::new(),
                            is_constructor: false,
                            line: node_line(&member),
                        });
                    }
                }
                kind if TYPE_DECLARATION_KINDS.contains(&kind) => {
                    self.extract_declared_type(member, Some(&entity.qualified_name), false);
                }
                _ => {}
            }
        }
    }

    fn extract_fields(&mut self, node: Node, entity: &mut TypeEntity, synth_ordinal: &mut usize) {
        let Some(type_node) = node.child_by_field_name("type") else {
            return;
        };
        let type_name = self.erased_type_name(type_node);
        let (modifiers, annotations) = self.modifiers_and_annotations(node);

        let mut cursor = node.walk();
        for declarator in node.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name) = declarator.child_by_field_name("name") else {
                continue;
            };
            let field_name = self.text(name).to_string();

            // Initializers contribute literals and anonymous types;
            // call sites in them are not modeled. Anonymous types take
            // the field name where method-scoped ones take the method
            let mut scratch = BodyScan::default();
            if let Some(value) = declarator.child_by_field_name("value") {
                self.scan_body(
                    value,
                    &entity.qualified_name,
                    &field_name,
                    &mut scratch,
                    synth_ordinal,
                );
            }

            entity.fields.push(Field {
                name: field_name,
                type_ref: TypeRef::new(type_name.clone(), node_line(&type_node)),
                modifiers: modifiers.clone(),
                annotations: annotations.clone(),
                string_literals: scratch.string_literals,
                line: node_line(&declarator),
            });
        }
    }

    fn extract_method(
        &mut self,
        node: Node,
        enclosing: &str,
        is_constructor: bool,
        synth_ordinal: &mut usize,
    ) -> Method {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let (modifiers, annotations) = self.modifiers_and_annotations(node);

        let return_type = if is_constructor {
            None
        } else {
            node.child_by_field_name("type")
                .filter(|t| t.kind() != "void_type")
                .map(|t| TypeRef::new(self.erased_type_name(t), node_line(&t)))
        };

        let parameters = node
            .child_by_field_name("parameters")
            .map(|p| self.extract_parameters(p))
            .unwrap_or_default();

        let mut scan = BodyScan::default();
        if let Some(body) = node.child_by_field_name("body") {
            self.scan_body(body, enclosing, &name, &mut scan, synth_ordinal);
        }

        Method {
            name,
            return_type,
            parameters,
            modifiers,
            annotations,
            call_sites: scan.call_sites,
            instantiations: scan.instantiations,
            locals: scan.locals,
            string_literals: scan.string_literals,
            is_constructor,
            line: node_line(&node),
        }
    }

    fn extract_parameters(&self, params: Node) -> Vec<Parameter> {
        let mut out = Vec::new();
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            match param.kind() {
                "formal_parameter" => {
                    if let (Some(ty), Some(name)) = (
                        param.child_by_field_name("type"),
                        param.child_by_field_name("name"),
                    ) {
                        out.push(Parameter {
                            name: self.text(name).to_string(),
                            type_ref: TypeRef::new(self.erased_type_name(ty), node_line(&ty)),
                        });
                    }
                }
                "spread_parameter" => {
                    // Varargs: type and declarator are positional children
                    let mut inner = param.walk();
                    let children: Vec<Node> = param.named_children(&mut inner).collect();
                    let ty = children.iter().find(|c| c.kind() != "variable_declarator");
                    let name = children
                        .iter()
                        .find(|c| c.kind() == "variable_declarator")
                        .and_then(|d| d.child_by_field_name("name"));
                    if let (Some(ty), Some(name)) = (ty, name) {
                        out.push(Parameter {
                            name: self.text(name).to_string(),
                            type_ref: TypeRef::new(self.erased_type_name(*ty), node_line(ty)),
                        });
                    }
                }
                _ => {}
            }
        }
        out
    }

    fn scan_body(
        &mut self,
        node: Node,
        enclosing: &str,
        method: &str,
        scan: &mut BodyScan,
        ordinal: &mut usize,
    ) {
        match node.kind() {
            "method_invocation" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let receiver = node
                        .child_by_field_name("object")
                        .map(|o| self.text(o).to_string());
                    scan.call_sites.push(CallSite {
                        receiver,
                        method: self.text(name).to_string(),
                        line: node_line(&node),
                    });
                }
                self.scan_children(node, enclosing, method, scan, ordinal);
            }
            "object_creation_expression" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    scan.instantiations
                        .push(TypeRef::new(self.erased_type_name(ty), node_line(&node)));
                }
                let mut cursor = node.walk();
                let class_body = node
                    .named_children(&mut cursor)
                    .find(|c| c.kind() == "class_body");
                if let Some(body) = class_body {
                    self.extract_anonymous_type(node, body, enclosing, method, ordinal);
                }
                // Arguments may contain further calls; the anonymous
                // body's calls belong to its own methods
                let mut cursor = node.walk();
                let children: Vec<Node> = node.named_children(&mut cursor).collect();
                for child in children {
                    if child.kind() != "class_body" {
                        self.scan_body(child, enclosing, method, scan, ordinal);
                    }
                }
            }
            "explicit_constructor_invocation" => {
                let receiver = node
                    .child_by_field_name("constructor")
                    .map(|c| self.text(c).to_string())
                    .unwrap_or_else(|| "this".to_string());
                scan.call_sites.push(CallSite {
                    receiver: Some(receiver),
                    method: "<init>".to_string(),
                    line: node_line(&node),
                });
                self.scan_children(node, enclosing, method, scan, ordinal);
            }
            "local_variable_declaration" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    let type_name = self.erased_type_name(ty);
                    let mut cursor = node.walk();
                    for declarator in node.named_children(&mut cursor) {
                        if declarator.kind() != "variable_declarator" {
                            continue;
                        }
                        if let Some(name) = declarator.child_by_field_name("name") {
                            scan.locals.push(LocalVar {
                                name: self.text(name).to_string(),
                                type_name: type_name.clone(),
                                line: node_line(&declarator),
                            });
                        }
                    }
                }
                self.scan_children(node, enclosing, method, scan, ordinal);
            }
            "enhanced_for_statement" | "resource" => {
                if let (Some(ty), Some(name)) = (
                    node.child_by_field_name("type"),
                    node.child_by_field_name("name"),
                ) {
                    scan.locals.push(LocalVar {
                        name: self.text(name).to_string(),
                        type_name: self.erased_type_name(ty),
                        line: node_line(&node),
                    });
                }
                self.scan_children(node, enclosing, method, scan, ordinal);
            }
            "catch_formal_parameter" => {
                let mut cursor = node.walk();
                let single_type = node
                    .named_children(&mut cursor)
                    .find(|c| c.kind() == "catch_type")
                    .and_then(|ct| {
                        let mut inner = ct.walk();
                        let types: Vec<Node> = ct.named_children(&mut inner).collect();
                        // Union catch types are never statically determined
                        (types.len() == 1).then_some(types[0])
                    });
                if let (Some(ty), Some(name)) = (single_type, node.child_by_field_name("name")) {
                    scan.locals.push(LocalVar {
                        name: self.text(name).to_string(),
                        type_name: self.erased_type_name(ty),
                        line: node_line(&node),
                    });
                }
            }
            "string_literal" | "text_block" => {
                scan.string_literals.push(unquote(self.text(node)));
            }
            kind if TYPE_DECLARATION_KINDS.contains(&kind) => {
                // Local type: synthetic qualified name, declared simple
                // name kept; its own bodies are not scanned for the
                // enclosing method
                let qualified = format!("{enclosing}.{method}${ordinal}");
                let simple = node
                    .child_by_field_name("name")
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_else(|| format!("{method}${ordinal}"));
                *ordinal += 1;
                self.extract_type_with_names(node, qualified, simple, true);
            }
            _ => {
                self.scan_children(node, enclosing, method, scan, ordinal);
            }
        }
    }

    fn scan_children(
        &mut self,
        node: Node,
        enclosing: &str,
        method: &str,
        scan: &mut BodyScan,
        ordinal: &mut usize,
    ) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            self.scan_body(child, enclosing, method, scan, ordinal);
        }
    }

    fn extract_anonymous_type(
        &mut self,
        creation: Node,
        class_body: Node,
        enclosing: &str,
        method: &str,
        ordinal: &mut usize,
    ) {
        let qualified = format!("{enclosing}.{method}${ordinal}");
        let simple = format!("{method}${ordinal}");
        *ordinal += 1;

        // The created name may be a class or an interface; the resolver
        // settles the edge kind once the target is known
        let supertype = creation
            .child_by_field_name("type")
            .map(|t| TypeRef::new(self.erased_type_name(t), node_line(&creation)));

        let mut entity = TypeEntity {
            qualified_name: qualified,
            simple_name: simple,
            package: self.package.clone(),
            kind: TypeKind::Class,
            modifiers: BTreeSet::new(),
            annotations: Vec::new(),
            superclass: supertype,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            file: self.file.clone(),
            line: node_line(&creation),
            synthetic: true,
        };

        // The anonymous type is its own synthetic-name scope
        let mut synth_ordinal = 1usize;
        self.extract_members(class_body, &mut entity, &mut synth_ordinal);
        self.types.push(entity);
    }

    fn modifiers_and_annotations(&self, node: Node) -> (BTreeSet<String>, Vec<Annotation>) {
        let mut modifiers = BTreeSet::new();
        let mut annotations = Vec::new();

        let mut cursor = node.walk();
        let Some(mods) = node
            .children(&mut cursor)
            .find(|c| c.kind() == "modifiers")
        else {
            return (modifiers, annotations);
        };

        let mut inner = mods.walk();
        for child in mods.children(&mut inner) {
            match child.kind() {
                "marker_annotation" | "annotation" => {
                    annotations.push(self.extract_annotation(child));
                }
                keyword
                    if keyword
                        .chars()
                        .all(|c| c.is_ascii_alphabetic() || c == '-') =>
                {
                    modifiers.insert(keyword.to_string());
                }
                _ => {}
            }
        }
        (modifiers, annotations)
    }

    fn extract_annotation(&self, node: Node) -> Annotation {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_else(|| self.text(node).trim_start_matches('@').to_string());
        let mut annotation = Annotation::new(name);

        if let Some(args) = node.child_by_field_name("arguments") {
            let mut cursor = args.walk();
            for arg in args.named_children(&mut cursor) {
                if arg.kind() == "element_value_pair" {
                    if let (Some(key), Some(value)) = (
                        arg.child_by_field_name("key"),
                        arg.child_by_field_name("value"),
                    ) {
                        annotation
                            .arguments
                            .push((self.text(key).to_string(), self.literal_text(value)));
                    }
                } else {
                    annotation
                        .arguments
                        .push(("value".to_string(), self.literal_text(arg)));
                }
            }
        }
        annotation
    }

    /// Raw literal value of an annotation element, unquoted; arrays are
    /// flattened to a comma-joined list
    fn literal_text(&self, node: Node) -> String {
        match node.kind() {
            "string_literal" | "text_block" => unquote(self.text(node)),
            "element_value_array_initializer" => {
                let mut cursor = node.walk();
                node.named_children(&mut cursor)
                    .map(|c| self.literal_text(c))
                    .collect::<Vec<_>>()
                    .join(",")
            }
            _ => self.text(node).to_string(),
        }
    }

    /// Type name with generics and array dimensions erased; scoped names
    /// keep their dots
    fn erased_type_name(&self, node: Node) -> String {
        match node.kind() {
            "generic_type" => {
                let mut cursor = node.walk();
                let name = node
                    .named_children(&mut cursor)
                    .find(|c| c.kind() != "type_arguments")
                    .map(|c| self.erased_type_name(c))
                    .unwrap_or_else(|| self.text(node).to_string());
                name
            }
            "array_type" => node
                .child_by_field_name("element")
                .map(|e| self.erased_type_name(e))
                .unwrap_or_else(|| self.text(node).to_string()),
            _ => self.text(node).to_string(),
        }
    }
}

fn unquote(text: &str) -> String {
    let trimmed = text.trim();
    for quote in ["\"\"\"", "\""] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|s| s.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }
    trimmed.to_string()
}
