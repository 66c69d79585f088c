//! Compact textual project summary for oracle prompts
//!
//! Ordering matters: entry files first, then authentication-tagged files,
//! then the rest alphabetically, so the most likely candidates lead the
//! prompt.

use crate::indexer::{IndexedFile, ProjectIndex};
use std::cmp::Ordering;
use std::fmt::Write as _;

/// Serialize the index into the prompt-facing project summary.
#[must_use]
pub fn build_project_summary(index: &ProjectIndex) -> String {
    let mut files: Vec<&IndexedFile> = index.files().collect();
    files.sort_by(|a, b| summary_order(a, b));

    let mut summary = String::from("**PROJECT FILE TREE + METADATA:**\n\n");
    for file in files {
        let _ = writeln!(summary, "**{}**", file.logical_path);
        let _ = writeln!(summary, "- Size: {} bytes, {} lines", file.size, file.lines);
        let _ = writeln!(
            summary,
            "- Component: {}",
            file.component_name.as_deref().unwrap_or("Unknown")
        );
        let _ = writeln!(summary, "- Has controls: {}", yes_no(file.has_controls));
        let _ = writeln!(summary, "- Has auth: {}", yes_no(file.has_auth));
        let _ = writeln!(summary, "- Is entry file: {}", yes_no(file.is_entry));
        let _ = writeln!(summary, "- Code preview:\n```\n{}\n```\n", file.preview);
    }

    summary
}

fn summary_order(a: &IndexedFile, b: &IndexedFile) -> Ordering {
    b.is_entry
        .cmp(&a.is_entry)
        .then(b.has_auth.cmp(&a.has_auth))
        .then_with(|| a.logical_path.cmp(&b.logical_path))
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
