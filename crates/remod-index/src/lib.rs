//! Project indexing for the ReMod engine
//!
//! Turns a UI source tree into queryable metadata:
//! - A per-run [`ProjectIndex`] of [`IndexedFile`] entries with heuristic
//!   tags (interactive controls, authentication markup, entry file)
//! - A compact textual project summary for oracle prompts
//! - A per-file [`SyntaxNode`] catalog extracted from a tree-sitter parse
//!
//! All entries are owned by a single modification run. The next run's scan
//! supersedes them wholesale; nothing here persists.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod catalog;
pub mod heuristics;
pub mod indexer;
pub mod summary;

pub use catalog::{build_catalog, SyntaxNode, CONTEXT_LINES};
pub use indexer::{IndexOptions, IndexedFile, ProjectIndex};
pub use summary::build_project_summary;
