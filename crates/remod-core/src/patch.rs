//! Position-stable range patching
//!
//! Replaces node line ranges with replacement text while leaving every
//! untouched line byte-identical. Replacements are applied in descending
//! start-line order: replacing one node then never shifts the line
//! numbers of any node with a smaller start line, even though all ranges
//! were computed against the original content.
//!
//! Content is split on `'\n'` only, so carriage returns and the trailing
//! newline ride along in the line buffer and survive the rejoin.
//!
//! Overlapping or nested target ranges are rejected outright; splicing
//! them in any order can silently corrupt output.

use crate::error::PatchError;
use remod_index::SyntaxNode;
use std::collections::BTreeMap;

/// Rewrite `content` by substituting node ranges with replacement text.
///
/// Only nodes present in `targets` with an entry in `replacements` are
/// applied; other mapping keys are ignored. Returns the patched content;
/// the caller owns the write.
pub fn apply_replacements(
    content: &str,
    targets: &[SyntaxNode],
    replacements: &BTreeMap<String, String>,
) -> Result<String, PatchError> {
    let mut applicable: Vec<&SyntaxNode> = targets
        .iter()
        .filter(|node| replacements.contains_key(&node.id))
        .collect();

    if applicable.is_empty() {
        return Ok(content.to_string());
    }

    let mut patched: Vec<&str> = content.split('\n').collect();
    let file_lines = patched.len();

    for node in &applicable {
        if node.start_line == 0 || node.end_line > file_lines || node.start_line > node.end_line {
            return Err(PatchError::RangeOutOfBounds {
                id: node.id.clone(),
                start_line: node.start_line,
                end_line: node.end_line,
                file_lines,
            });
        }
    }

    // Reject overlap and nesting before touching anything.
    let mut by_start = applicable.clone();
    by_start.sort_by_key(|node| (node.start_line, node.end_line));
    for pair in by_start.windows(2) {
        if pair[1].start_line <= pair[0].end_line {
            return Err(PatchError::OverlappingRanges {
                first: pair[0].id.clone(),
                second: pair[1].id.clone(),
            });
        }
    }

    // Descending start line; ties cannot survive the overlap check, but
    // the identifier keeps the order fully deterministic anyway.
    applicable.sort_by(|a, b| {
        b.start_line
            .cmp(&a.start_line)
            .then_with(|| b.id.cmp(&a.id))
    });

    for node in applicable {
        let replacement = replacements[&node.id].as_str();
        patched.splice(node.start_line - 1..node.end_line, replacement.split('\n'));
        tracing::debug!(
            node = %node.id,
            start = node.start_line,
            end = node.end_line,
            "range spliced"
        );
    }

    Ok(patched.join("\n"))
}
