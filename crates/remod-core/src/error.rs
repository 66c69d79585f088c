//! Error types for the modification engine
//!
//! The taxonomy follows the run's failure surface: only run-ending
//! conditions are errors here. Per-file oracle, patch, and write failures
//! are handled inline by the orchestrator as skip-and-continue, and
//! everything is converted to a structured result at the public boundary.

/// Engine errors
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The project scan found no indexable files
    #[error("no source files found in project")]
    NoSourceFiles,

    /// Neither the primary path nor the fallback produced candidates
    #[error("no relevant files found for request")]
    NoRelevantFiles,

    /// Every whole-file rewrite in the run failed
    #[error("full file modifications failed")]
    WholeFileFailed,

    /// The targeted branch applied zero ranges
    #[error("no modifications were successfully applied")]
    NoModificationsApplied,
}

/// Range patcher errors
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// Two selected nodes overlap or nest; splicing them would corrupt
    /// the file, so the set is rejected outright.
    #[error("overlapping node ranges: {first} and {second}")]
    OverlappingRanges {
        /// Earlier node identifier
        first: String,
        /// Later node identifier
        second: String,
    },

    /// A node's range lies outside the file's line count
    #[error("node {id} range {start_line}-{end_line} exceeds file length {file_lines}")]
    RangeOutOfBounds {
        id: String,
        start_line: usize,
        end_line: usize,
        file_lines: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_ending_messages() {
        assert_eq!(
            EngineError::NoSourceFiles.to_string(),
            "no source files found in project"
        );
        assert_eq!(
            EngineError::NoRelevantFiles.to_string(),
            "no relevant files found for request"
        );
        assert_eq!(
            EngineError::WholeFileFailed.to_string(),
            "full file modifications failed"
        );
        assert_eq!(
            EngineError::NoModificationsApplied.to_string(),
            "no modifications were successfully applied"
        );
    }

    #[test]
    fn patch_error_display() {
        let err = PatchError::OverlappingRanges {
            first: "node_1".to_string(),
            second: "node_2".to_string(),
        };
        assert!(err.to_string().contains("node_1"));
        assert!(err.to_string().contains("node_2"));
    }
}
