//! Source model types produced by extraction
//!
//! Everything here is a plain data description of what the parser saw.
//! Resolution and detection never mutate these; they read them and build
//! the relationship graph on top.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Outcome of reading and parsing one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParseStatus {
    Parsed,
    Failed {
        reason: String,
        /// Best-effort location; absent for read failures
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column: Option<usize>,
    },
}

impl ParseStatus {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ParseStatus::Parsed)
    }
}

/// One file the walker admitted, whether or not it parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path relative to the analysis root, `/`-separated
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: ParseStatus,
}

/// Declaration kind of a type entity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl TypeKind {
    pub fn display_name(&self) -> &str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Annotation => "annotation",
        }
    }
}

/// An unresolved, as-written reference to another type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    /// The name as it appears in source: simple, qualified, or generic-erased
    pub name: String,
    pub line: usize,
}

impl TypeRef {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
        }
    }
}

/// An annotation usage with its raw argument text, keyed by element name.
/// The default (single unnamed) element is stored under `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Simple name without the `@` sigil
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<(String, String)>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Name without any package qualifier, e.g. `Table` for
    /// `@javax.persistence.Table`
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Look up one element's raw value, unquoted if it was a string literal
    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The default element, i.e. `@Foo("bar")`
    pub fn value(&self) -> Option<&str> {
        self.argument("value")
    }
}

/// A declared field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub type_ref: TypeRef,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub modifiers: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    /// String literals in the initializer, for legacy-system scanning
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub string_literals: Vec<String>,
    pub line: usize,
}

/// A method or constructor parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_ref: TypeRef,
}

/// One call expression inside a method body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    /// Receiver text as written: an identifier, `this`, `super`, a
    /// qualified name, or `None` for unqualified calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    pub method: String,
    pub line: usize,
}

/// A local variable declaration, kept for receiver typing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalVar {
    pub name: String,
    pub type_name: String,
    pub line: usize,
}

/// A declared method or constructor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    /// None for constructors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub modifiers: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub call_sites: Vec<CallSite>,
    /// Types instantiated with `new` in the body
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instantiations: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locals: Vec<LocalVar>,
    /// String literals appearing in the body, for legacy-system scanning
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub string_literals: Vec<String>,
    pub is_constructor: bool,
    pub line: usize,
}

/// A single import statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// The dotted path without trailing `.*`
    pub path: String,
    pub wildcard: bool,
    pub is_static: bool,
}

impl Import {
    /// Simple name this import binds, if it binds one
    pub fn simple_name(&self) -> Option<&str> {
        if self.wildcard {
            None
        } else {
            self.path.rsplit('.').next()
        }
    }
}

/// A fully extracted type declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntity {
    /// `package.Outer.Inner` for nested types
    pub qualified_name: String,
    pub simple_name: String,
    /// Empty string for the default package
    pub package: String,
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub modifiers: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<Method>,
    /// Path relative to the analysis root
    pub file: PathBuf,
    pub line: usize,
    /// True for anonymous classes named `Enclosing.method$N`
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

impl TypeEntity {
    /// Annotation lookup by simple name, so `@javax.persistence.Table`
    /// and `@Table` both answer to `Table`
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.simple_name() == name)
    }
}

/// Everything extracted from one parsed source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileModel {
    pub file: SourceFile,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub package: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<Import>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeEntity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_simple_name() {
        let single = Import {
            path: "com.acme.billing.Invoice".to_string(),
            wildcard: false,
            is_static: false,
        };
        assert_eq!(single.simple_name(), Some("Invoice"));

        let wildcard = Import {
            path: "com.acme.billing".to_string(),
            wildcard: true,
            is_static: false,
        };
        assert_eq!(wildcard.simple_name(), None);
    }

    #[test]
    fn test_annotation_value_lookup() {
        let mut ann = Annotation::new("RequestMapping");
        ann.arguments.push(("value".to_string(), "/api".to_string()));
        ann.arguments.push(("method".to_string(), "GET".to_string()));
        assert_eq!(ann.value(), Some("/api"));
        assert_eq!(ann.argument("method"), Some("GET"));
        assert_eq!(ann.argument("produces"), None);
    }

    #[test]
    fn test_parse_status_serializes_with_tag() {
        let failed = ParseStatus::Failed {
            reason: "syntax error".to_string(),
            line: Some(4),
            column: Some(2),
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["line"], 4);

        let unread = ParseStatus::Failed {
            reason: "file exceeds size limit".to_string(),
            line: None,
            column: None,
        };
        let json = serde_json::to_value(&unread).unwrap();
        assert!(json.get("line").is_none());
    }
}
