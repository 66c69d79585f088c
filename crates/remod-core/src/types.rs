//! Core types for a modification run
//!
//! - The incoming request (instruction plus opaque prior context)
//! - The structured outcome record returned across the public boundary
//! - The fire-and-forget progress sink

use serde::{Deserialize, Serialize};

/// A natural-language modification request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModificationRequest {
    /// The instruction text
    pub prompt: String,
    /// Optional prior-conversation context, opaque to the engine
    pub context: Option<String>,
}

impl ModificationRequest {
    /// Create a request without prior context
    #[inline]
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            context: None,
        }
    }

    /// Attach prior-conversation context
    #[inline]
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Edit granularity chosen for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    /// Regenerate each candidate file in full
    #[serde(rename = "FULL_FILE")]
    WholeFile,
    /// Rewrite only specific node ranges
    #[serde(rename = "TARGETED_NODES")]
    Targeted,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::WholeFile => write!(f, "whole-file"),
            Granularity::Targeted => write!(f, "targeted"),
        }
    }
}

/// A line/column range in the original file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeRange {
    /// 1-based start line
    pub start_line: usize,
    /// 1-based end line (inclusive)
    pub end_line: usize,
    /// 0-based start column
    pub start_column: usize,
    /// 0-based end column
    pub end_column: usize,
    /// Original source text for the range
    pub original: String,
}

/// One applied replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedRange {
    /// Logical file path (or joined file group for whole-file runs)
    pub file: String,
    /// The replaced range in the original content
    pub range: CodeRange,
    /// The replacement text written in its place
    pub replacement: String,
}

/// Structured outcome of a modification run
///
/// Invariant: `success == true` implies at least one file was written, and
/// `applied_ranges` reflects exactly what was written.
#[derive(Debug, Clone, Serialize)]
pub struct ModificationResult {
    /// Whether any modification was applied
    pub success: bool,
    /// Candidate files chosen for the run
    pub selected_files: Vec<String>,
    /// Chosen granularity, when scope selection completed
    pub granularity: Option<Granularity>,
    /// Oracle-supplied rationale, best effort
    pub reasoning: Option<String>,
    /// Applied replacements (one sentinel entry for whole-file runs)
    pub applied_ranges: Vec<AppliedRange>,
    /// Failure description when `success` is false
    pub error: Option<String>,
}

impl ModificationResult {
    /// Build a failure result with a reason
    #[inline]
    #[must_use]
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            selected_files: Vec::new(),
            granularity: None,
            reasoning: None,
            applied_ranges: Vec::new(),
            error: Some(reason.into()),
        }
    }
}

/// Fire-and-forget progress reporting
///
/// Receives human-readable status strings during a run. No acknowledgment,
/// no ordering guarantee beyond "emitted before the stage's outcome is
/// known".
pub trait ProgressSink: Send + Sync {
    /// Accept one status message
    fn emit(&self, message: &str);
}

/// Sink that drops all messages
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _message: &str) {}
}

/// Adapter turning a closure into a sink
#[derive(Debug, Clone)]
pub struct FnSink<F>(pub F);

impl<F> ProgressSink for FnSink<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn emit(&self, message: &str) {
        (self.0)(message);
    }
}
