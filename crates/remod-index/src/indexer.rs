//! Project scanner
//!
//! Walks `<root>/src` and builds one [`IndexedFile`] per qualifying UI
//! source file. The scan is tolerant by design: unreadable entries are
//! logged and skipped, and an empty result is reported to the caller as a
//! run precondition failure, not as an error here.

use crate::heuristics;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Extensions that mark a file as UI source.
const UI_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

/// Dependency directory never descended into.
const DEPENDENCY_DIR: &str = "node_modules";

/// Scan options
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Logical-path segment of library-provided UI primitives, excluded
    /// from the index
    pub library_segment: String,
    /// Leading lines kept as the file preview
    pub preview_lines: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            library_segment: "components/ui/".to_string(),
            preview_lines: 15,
        }
    }
}

/// One indexed source file
///
/// Immutable for the duration of a modification run; superseded wholesale
/// by the next run's scan.
#[derive(Debug, Clone)]
pub struct IndexedFile {
    /// File name with extension
    pub name: String,
    /// Absolute path on disk
    pub path: PathBuf,
    /// Root-relative logical path (`src/...`)
    pub logical_path: String,
    /// Raw file content
    pub content: String,
    /// Newline-split line count
    pub lines: usize,
    /// Byte size
    pub size: u64,
    /// Leading-lines preview
    pub preview: String,
    /// Best-effort primary symbol name
    pub component_name: Option<String>,
    /// Content mentions interactive-control markup
    pub has_controls: bool,
    /// Content mentions authentication vocabulary
    pub has_auth: bool,
    /// Heuristically a top-level entry file
    pub is_entry: bool,
}

impl IndexedFile {
    /// Build an entry from raw file data, deriving all heuristic tags.
    #[must_use]
    pub fn analyze(
        name: String,
        path: PathBuf,
        logical_path: String,
        content: String,
        size: u64,
        preview_lines: usize,
    ) -> Self {
        // Newline-split segment count; a trailing newline adds a segment.
        let lines = content.split('\n').count();
        let preview = content
            .lines()
            .take(preview_lines)
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            component_name: heuristics::primary_symbol(&content),
            has_controls: heuristics::has_interactive_controls(&content),
            has_auth: heuristics::has_auth_markup(&content),
            is_entry: heuristics::is_entry_file(&name, &content),
            name,
            path,
            logical_path,
            lines,
            size,
            preview,
            content,
        }
    }
}

/// The per-run project index
///
/// Maps logical path to file entry. Later files with colliding logical
/// paths overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct ProjectIndex {
    files: BTreeMap<String, IndexedFile>,
}

impl ProjectIndex {
    /// Scan a project root and build the index.
    ///
    /// Visits `<root>/src` recursively, skipping hidden directories,
    /// dependency directories, and the configured library segment. A
    /// missing `src` directory yields an empty index.
    pub async fn scan(root: &Path, options: &IndexOptions) -> Self {
        let src = root.join("src");
        let mut index = Self::default();

        if tokio::fs::metadata(&src).await.is_err() {
            tracing::warn!(root = %root.display(), "no src directory under project root");
            return index;
        }

        let mut pending: Vec<(PathBuf, String)> = vec![(src, String::new())];

        while let Some((dir, relative)) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(dir = %dir.display(), %err, "failed to read directory, skipping");
                    continue;
                }
            };

            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(err) => {
                        tracing::warn!(dir = %dir.display(), %err, "failed to read entry, skipping rest of directory");
                        break;
                    }
                };

                let name = entry.file_name().to_string_lossy().into_owned();
                let file_type = match entry.file_type().await {
                    Ok(file_type) => file_type,
                    Err(err) => {
                        tracing::warn!(entry = %name, %err, "failed to stat entry, skipping");
                        continue;
                    }
                };

                let child_relative = if relative.is_empty() {
                    name.clone()
                } else {
                    format!("{relative}/{name}")
                };

                if file_type.is_dir() {
                    if name.starts_with('.') || name == DEPENDENCY_DIR {
                        continue;
                    }
                    pending.push((entry.path(), child_relative));
                } else if file_type.is_file() && has_ui_extension(&name) {
                    if child_relative.contains(&options.library_segment) {
                        tracing::debug!(file = %child_relative, "skipping library UI component");
                        continue;
                    }
                    index.analyze_file(entry.path(), &name, &child_relative, options).await;
                }
            }
        }

        tracing::info!(files = index.len(), "project scan complete");
        index
    }

    async fn analyze_file(
        &mut self,
        path: PathBuf,
        name: &str,
        relative: &str,
        options: &IndexOptions,
    ) {
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(file = %relative, %err, "failed to read file, skipping");
                return;
            }
        };

        let size = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                tracing::warn!(file = %relative, %err, "failed to stat file, skipping");
                return;
            }
        };

        let logical_path = format!("src/{relative}");
        let file = IndexedFile::analyze(
            name.to_string(),
            path,
            logical_path.clone(),
            content,
            size,
            options.preview_lines,
        );

        // Colliding logical paths overwrite; accepted, not deduplicated.
        self.files.insert(logical_path, file);
    }

    /// Look up a file by logical path.
    #[inline]
    #[must_use]
    pub fn get(&self, logical_path: &str) -> Option<&IndexedFile> {
        self.files.get(logical_path)
    }

    /// Insert a file entry directly (test fixtures, pre-built indexes).
    pub fn insert(&mut self, file: IndexedFile) {
        self.files.insert(file.logical_path.clone(), file);
    }

    /// Iterate entries in logical-path order.
    pub fn files(&self) -> impl Iterator<Item = &IndexedFile> {
        self.files.values()
    }

    /// Number of indexed files.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the index is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn has_ui_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| UI_EXTENSIONS.contains(&ext))
}
