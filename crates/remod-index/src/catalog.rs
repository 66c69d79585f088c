//! Syntax node catalog
//!
//! Parses one file's source with the tree-sitter TSX grammar and flattens
//! every UI element node (nested included) into an ordered, addressable
//! list. Identifiers are run-scoped: `node_1..node_N` in pre-order, valid
//! only for this catalog-build call.
//!
//! Parse failure is never fatal: a tree with syntax errors yields an empty
//! catalog and the caller moves on to the next file.

use crate::heuristics;
use tree_sitter::{Node, Parser};

/// Lines of surrounding source added on each side of a node's range.
pub const CONTEXT_LINES: usize = 3;

/// One addressable UI element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    /// Run-scoped identifier (`node_1`, `node_2`, ...)
    pub id: String,
    /// Tag name from the opening element, else `unknown`
    pub tag_name: String,
    /// Concatenated direct literal-text children, trimmed
    pub text_content: String,
    /// 1-based start line
    pub start_line: usize,
    /// 1-based end line (inclusive)
    pub end_line: usize,
    /// 0-based start column
    pub start_column: usize,
    /// 0-based end column
    pub end_column: usize,
    /// Exact source substring for the node's line range
    pub snippet: String,
    /// Source widened by up to [`CONTEXT_LINES`] on each side
    pub context: String,
    /// Tag name contains control vocabulary
    pub is_control: bool,
    /// Text content matches authentication vocabulary
    pub has_auth_text: bool,
    /// Attribute names present on the opening tag
    pub attributes: Vec<String>,
}

/// Parse source and extract the ordered element catalog.
///
/// Returns an empty catalog when the grammar cannot be loaded, the parse
/// yields no tree, or the tree contains syntax errors.
#[must_use]
pub fn build_catalog(source: &str) -> Vec<SyntaxNode> {
    let mut parser = Parser::new();
    let language: tree_sitter::Language = tree_sitter_typescript::LANGUAGE_TSX.into();
    if let Err(err) = parser.set_language(&language) {
        tracing::warn!(%err, "failed to load TSX grammar");
        return Vec::new();
    }

    let Some(tree) = parser.parse(source, None) else {
        tracing::warn!("parser returned no tree");
        return Vec::new();
    };

    let root = tree.root_node();
    if root.has_error() {
        tracing::debug!("source has syntax errors, returning empty catalog");
        return Vec::new();
    }

    let lines: Vec<&str> = source.lines().collect();
    let mut nodes = Vec::new();
    let mut stack = vec![root];

    // Pre-order traversal; identifiers are assigned in visit order.
    while let Some(node) = stack.pop() {
        if matches!(node.kind(), "jsx_element" | "jsx_self_closing_element") {
            let id = format!("node_{}", nodes.len() + 1);
            nodes.push(extract_node(node, source, &lines, id));
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }

    tracing::debug!(
        elements = nodes.len(),
        controls = nodes.iter().filter(|n| n.is_control).count(),
        auth = nodes.iter().filter(|n| n.has_auth_text).count(),
        "catalog built"
    );

    nodes
}

fn extract_node(node: Node<'_>, source: &str, lines: &[&str], id: String) -> SyntaxNode {
    let bytes = source.as_bytes();

    // Self-closing elements carry name and attributes themselves; full
    // elements keep them on the opening tag child.
    let opening = if node.kind() == "jsx_element" {
        child_of_kind(node, "jsx_opening_element").unwrap_or(node)
    } else {
        node
    };

    let tag_name = opening
        .child_by_field_name("name")
        .and_then(|n| n.utf8_text(bytes).ok())
        .unwrap_or("unknown")
        .to_string();

    let mut text_parts = Vec::new();
    if node.kind() == "jsx_element" {
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                if child.kind() == "jsx_text" {
                    if let Ok(text) = child.utf8_text(bytes) {
                        let trimmed = text.trim();
                        if !trimmed.is_empty() {
                            text_parts.push(trimmed);
                        }
                    }
                }
            }
        }
    }
    let text_content = text_parts.join(" ");

    let mut attributes = Vec::new();
    for i in 0..opening.named_child_count() {
        if let Some(attr) = opening.named_child(i) {
            if attr.kind() == "jsx_attribute" {
                if let Some(name) = attr.named_child(0).and_then(|n| n.utf8_text(bytes).ok()) {
                    attributes.push(name.to_string());
                }
            }
        }
    }

    let start_line = node.start_position().row + 1;
    let end_line = node.end_position().row + 1;

    let snippet = slice_lines(lines, start_line - 1, end_line);
    let context_start = start_line.saturating_sub(CONTEXT_LINES + 1);
    let context_end = (end_line + CONTEXT_LINES).min(lines.len());
    let context = slice_lines(lines, context_start, context_end);

    SyntaxNode {
        is_control: tag_name.to_lowercase().contains("button"),
        has_auth_text: heuristics::has_auth_text(&text_content),
        id,
        tag_name,
        text_content,
        start_line,
        end_line,
        start_column: node.start_position().column,
        end_column: node.end_position().column,
        snippet,
        context,
        attributes,
    }
}

fn child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    (0..node.child_count())
        .filter_map(|i| node.child(i))
        .find(|child| child.kind() == kind)
}

fn slice_lines(lines: &[&str], start: usize, end: usize) -> String {
    let end = end.min(lines.len());
    if start >= end {
        return String::new();
    }
    lines[start..end].join("\n")
}
