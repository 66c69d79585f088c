//! Engine configuration

use remod_index::IndexOptions;
use serde::{Deserialize, Serialize};

/// Configuration for a modification engine
///
/// Token budgets mirror the expected response size of each oracle call:
/// scope decisions are small JSON payloads, whole-file rewrites are not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Logical-path segment of library UI primitives, excluded at index time
    pub library_segment: String,
    /// Leading lines kept as each file's preview
    pub preview_lines: usize,
    /// Minimum fallback score a file must exceed to be a candidate
    pub fallback_threshold: u32,
    /// Maximum files returned by the fallback search
    pub fallback_limit: usize,
    /// Token budget for the primary scope decision
    pub scope_budget: u32,
    /// Token budget for the narrow (fallback) scope decision
    pub narrow_scope_budget: u32,
    /// Token budget for target node selection
    pub target_budget: u32,
    /// Token budget for snippet rewriting
    pub snippet_budget: u32,
    /// Token budget for whole-file rewriting
    pub whole_file_budget: u32,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With fallback score threshold
    #[inline]
    #[must_use]
    pub fn with_fallback_threshold(mut self, threshold: u32) -> Self {
        self.fallback_threshold = threshold;
        self
    }

    /// With fallback candidate limit
    #[inline]
    #[must_use]
    pub fn with_fallback_limit(mut self, limit: usize) -> Self {
        self.fallback_limit = limit;
        self
    }

    /// With library segment
    #[inline]
    #[must_use]
    pub fn with_library_segment(mut self, segment: impl Into<String>) -> Self {
        self.library_segment = segment.into();
        self
    }

    /// Index scan options derived from this configuration
    #[inline]
    #[must_use]
    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            library_segment: self.library_segment.clone(),
            preview_lines: self.preview_lines,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            library_segment: "components/ui/".to_string(),
            preview_lines: 15,
            fallback_threshold: 20,
            fallback_limit: 3,
            scope_budget: 500,
            narrow_scope_budget: 50,
            target_budget: 200,
            snippet_budget: 2000,
            whole_file_budget: 4000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.fallback_threshold, 20);
        assert_eq!(config.fallback_limit, 3);
        assert_eq!(config.library_segment, "components/ui/");
    }

    #[test]
    fn builders() {
        let config = EngineConfig::new()
            .with_fallback_threshold(5)
            .with_fallback_limit(1)
            .with_library_segment("lib/ui/");

        assert_eq!(config.fallback_threshold, 5);
        assert_eq!(config.fallback_limit, 1);
        assert_eq!(config.index_options().library_segment, "lib/ui/");
    }
}
