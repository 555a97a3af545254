//! Tree-sitter parser integration for Java
//!
//! One invocation per file, no shared state, so calls are freely
//! parallelizable. A file that cannot produce any tree is reported as
//! failed; a tree containing error nodes is still returned so the
//! extractor can model the declarations that did parse.

use std::time::Duration;
use tree_sitter::{Node, Parser, Tree};

/// Result of one parse attempt
pub enum ParseOutcome {
    /// A tree was produced; it may still contain error nodes
    Tree(Tree),
    /// No usable tree at all
    Failed { reason: String },
}

/// Location and description of the first syntax problem in a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Parse Java source text, bounded by the per-file timeout
pub fn parse_source(content: &str, timeout: Duration) -> ParseOutcome {
    let mut parser = Parser::new();
    let language = tree_sitter_java::LANGUAGE.into();

    if let Err(e) = parser.set_language(&language) {
        return ParseOutcome::Failed {
            reason: format!("failed to initialize Java grammar: {e}"),
        };
    }

    #[allow(deprecated)]
    parser.set_timeout_micros(timeout.as_micros() as u64);

    match parser.parse(content, None) {
        Some(tree) => ParseOutcome::Tree(tree),
        None => ParseOutcome::Failed {
            reason: format!(
                "parser produced no tree within {}s",
                timeout.as_secs()
            ),
        },
    }
}

/// Find the first error or missing node, if any
pub fn first_syntax_issue(tree: &Tree) -> Option<SyntaxIssue> {
    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }

    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            let message = if node.is_missing() {
                format!("missing {}", node.kind())
            } else {
                "unexpected syntax".to_string()
            };
            return Some(SyntaxIssue {
                line: node_line(&node),
                column: node_column(&node),
                message,
            });
        }

        // Descend into the first subtree still carrying an error
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                // Tree claims an error we could not locate
                return Some(SyntaxIssue {
                    line: node_line(&root),
                    column: node_column(&root),
                    message: "unexpected syntax".to_string(),
                });
            }
        }
    }
}

/// Get text for a tree-sitter node
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    let start = node.start_byte();
    let end = node.end_byte();
    &source[start..end]
}

/// Get the line number for a tree-sitter node (1-indexed)
pub fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Get the column number for a tree-sitter node (1-indexed)
pub fn node_column(node: &Node) -> usize {
    node.start_position().column + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Tree {
        match parse_source(content, Duration::from_secs(10)) {
            ParseOutcome::Tree(tree) => tree,
            ParseOutcome::Failed { reason } => panic!("parse failed: {reason}"),
        }
    }

    #[test]
    fn test_parse_wellformed_java() {
        let tree = parse("package p;\n\nclass A { void run() {} }\n");
        assert!(!tree.root_node().has_error());
        assert!(first_syntax_issue(&tree).is_none());
    }

    #[test]
    fn test_parse_reports_first_issue_location() {
        let tree = parse("package p;\nclass A {\n  void run( {}\n}\n");
        let issue = first_syntax_issue(&tree).unwrap();
        assert_eq!(issue.line, 3);
    }

    #[test]
    fn test_garbage_produces_tree_with_errors() {
        let tree = parse("%%% not java at all {{{");
        assert!(tree.root_node().has_error());
        assert!(first_syntax_issue(&tree).is_some());
    }

    #[test]
    fn test_node_text_and_line() {
        let source = "package p;\nclass A {}\n";
        let tree = parse(source);
        let root = tree.root_node();
        assert!(node_text(&root, source).starts_with("package p;"));
        assert_eq!(node_line(&root), 1);
    }
}
