//! The modification engine orchestrator
//!
//! Sequences one run through the state machine:
//! `Indexing -> SelectingScope -> {WholeFileBranch | TargetedBranch} ->
//! Reporting`, with `AbortedEmpty` when indexing or selection comes up
//! dry.
//!
//! Per-file discipline is skip-and-continue: a request may legitimately
//! apply to only one of several candidate files, so one file's parse
//! error or oracle non-response must not abort changes already queued
//! for siblings. Only the run preconditions are terminal.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::patch;
use crate::rewrite::{SnippetRewriter, WholeFileRewriter};
use crate::scope::{ScopeDecision, ScopeSelector};
use crate::state::{advance, RunState};
use crate::targets::TargetSelector;
use crate::types::{
    AppliedRange, CodeRange, Granularity, ModificationRequest, ModificationResult, NullSink,
    ProgressSink,
};
use remod_index::{build_catalog, ProjectIndex};
use remod_oracle::Oracle;
use std::path::PathBuf;
use std::sync::Arc;

/// Sentinel end line marking a whole-file rewrite in the result ranges.
const WHOLE_FILE_END_LINE: usize = 9999;

/// The intelligent modification engine
///
/// Owns one project root and an oracle handle; each [`run`] call is an
/// independent modification run with its own index and catalogs.
///
/// [`run`]: ModificationEngine::run
pub struct ModificationEngine {
    oracle: Arc<dyn Oracle>,
    project_root: PathBuf,
    config: EngineConfig,
    progress: Arc<dyn ProgressSink>,
}

impl ModificationEngine {
    /// Create an engine for a project root
    #[must_use]
    pub fn new(oracle: Arc<dyn Oracle>, project_root: impl Into<PathBuf>) -> Self {
        Self {
            oracle,
            project_root: project_root.into(),
            config: EngineConfig::default(),
            progress: Arc::new(NullSink),
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// With a progress sink
    #[inline]
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Execute one modification run.
    ///
    /// Never returns a raw error: every failure, expected or not, is
    /// converted into a structured result at this boundary.
    pub async fn run(&self, request: ModificationRequest) -> ModificationResult {
        tracing::info!(prompt = %request.prompt, "starting modification run");
        match self.execute(&request).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(%err, "modification run failed");
                self.progress.emit(&format!("run failed: {err}"));
                ModificationResult::failure(err.to_string())
            }
        }
    }

    async fn execute(
        &self,
        request: &ModificationRequest,
    ) -> Result<ModificationResult, EngineError> {
        let mut state = RunState::Indexing;
        self.progress.emit("scanning project sources");

        let index = ProjectIndex::scan(&self.project_root, &self.config.index_options()).await;
        if index.is_empty() {
            advance(&mut state, RunState::AbortedEmpty);
            return Err(EngineError::NoSourceFiles);
        }

        advance(&mut state, RunState::SelectingScope);
        self.progress
            .emit(&format!("indexed {} files, selecting scope", index.len()));

        let selector = ScopeSelector::new(self.oracle.as_ref(), &self.config);
        let decision = selector.select(request, &index).await;
        if decision.files.is_empty() {
            advance(&mut state, RunState::AbortedEmpty);
            return Err(EngineError::NoRelevantFiles);
        }

        self.progress.emit(&format!(
            "processing {} candidate files with {} granularity",
            decision.files.len(),
            decision.granularity
        ));

        let result = match decision.granularity {
            Granularity::WholeFile => {
                advance(&mut state, RunState::WholeFileBranch);
                self.whole_file_branch(request, &index, &decision).await
            }
            Granularity::Targeted => {
                advance(&mut state, RunState::TargetedBranch);
                self.targeted_branch(request, &index, &decision).await
            }
        };

        advance(&mut state, RunState::Reporting);
        result
    }

    async fn whole_file_branch(
        &self,
        request: &ModificationRequest,
        index: &ProjectIndex,
        decision: &ScopeDecision,
    ) -> Result<ModificationResult, EngineError> {
        let rewriter = WholeFileRewriter::new(self.oracle.as_ref(), &self.config);
        let mut successes = 0usize;

        for path in &decision.files {
            let Some(file) = index.get(path) else {
                tracing::warn!(file = %path, "candidate not in index, skipping");
                continue;
            };

            self.progress.emit(&format!("rewriting {path} in full"));
            let Some(body) = rewriter.generate(&request.prompt, file).await else {
                self.progress.emit(&format!("no rewrite produced for {path}"));
                continue;
            };

            match tokio::fs::write(&file.path, &body).await {
                Ok(()) => {
                    self.progress.emit(&format!("wrote {path}"));
                    successes += 1;
                }
                Err(err) => {
                    tracing::warn!(file = %path, %err, "write failed, skipping file");
                    self.progress.emit(&format!("write failed for {path}"));
                }
            }
        }

        if successes == 0 {
            return Err(EngineError::WholeFileFailed);
        }

        Ok(ModificationResult {
            success: true,
            selected_files: decision.files.clone(),
            granularity: Some(Granularity::WholeFile),
            reasoning: decision.reasoning.clone(),
            applied_ranges: vec![AppliedRange {
                file: decision.files.join(", "),
                range: CodeRange {
                    start_line: 1,
                    end_line: WHOLE_FILE_END_LINE,
                    start_column: 0,
                    end_column: 0,
                    original: "full file rewrite".to_string(),
                },
                replacement: "complete file modification".to_string(),
            }],
            error: None,
        })
    }

    async fn targeted_branch(
        &self,
        request: &ModificationRequest,
        index: &ProjectIndex,
        decision: &ScopeDecision,
    ) -> Result<ModificationResult, EngineError> {
        let target_selector = TargetSelector::new(self.oracle.as_ref(), &self.config);
        let rewriter = SnippetRewriter::new(self.oracle.as_ref(), &self.config);
        let mut applied: Vec<AppliedRange> = Vec::new();

        for path in &decision.files {
            let Some(file) = index.get(path) else {
                tracing::warn!(file = %path, "candidate not in index, skipping");
                continue;
            };

            let catalog = build_catalog(&file.content);
            if catalog.is_empty() {
                self.progress
                    .emit(&format!("no addressable elements in {path}, skipping"));
                continue;
            }

            let targets = target_selector
                .select(&request.prompt, path, &catalog)
                .await;
            if targets.is_empty() {
                self.progress
                    .emit(&format!("no target nodes identified in {path}, skipping"));
                continue;
            }

            let replacements = rewriter.rewrite(&request.prompt, &targets).await;
            if replacements.is_empty() {
                self.progress
                    .emit(&format!("no replacements produced for {path}, skipping"));
                continue;
            }

            let patched = match patch::apply_replacements(&file.content, &targets, &replacements)
            {
                Ok(patched) => patched,
                Err(err) => {
                    tracing::warn!(file = %path, %err, "patch rejected, skipping file");
                    self.progress.emit(&format!("patch rejected for {path}: {err}"));
                    continue;
                }
            };

            if let Err(err) = tokio::fs::write(&file.path, &patched).await {
                tracing::warn!(file = %path, %err, "write failed, skipping file");
                self.progress.emit(&format!("write failed for {path}"));
                continue;
            }

            self.progress.emit(&format!(
                "applied {} replacements to {path}",
                replacements.len()
            ));
            for node in &targets {
                if let Some(replacement) = replacements.get(&node.id) {
                    applied.push(AppliedRange {
                        file: path.clone(),
                        range: CodeRange {
                            start_line: node.start_line,
                            end_line: node.end_line,
                            start_column: node.start_column,
                            end_column: node.end_column,
                            original: node.snippet.clone(),
                        },
                        replacement: replacement.clone(),
                    });
                }
            }
        }

        if applied.is_empty() {
            return Err(EngineError::NoModificationsApplied);
        }

        Ok(ModificationResult {
            success: true,
            selected_files: decision.files.clone(),
            granularity: Some(Granularity::Targeted),
            reasoning: decision.reasoning.clone(),
            applied_ranges: applied,
            error: None,
        })
    }
}
