//! Replacement code generation
//!
//! Two rewriters share the oracle seam:
//! - [`SnippetRewriter`] asks for a replacement source substring per
//!   selected node, returned as a flat id -> text mapping.
//! - [`WholeFileRewriter`] asks for a complete regenerated file body,
//!   extracted from a fenced code block.
//!
//! Both degrade to "nothing to apply" on any oracle or parsing failure;
//! neither touches the filesystem. The orchestrator owns all writes.

use crate::config::EngineConfig;
use remod_index::{IndexedFile, SyntaxNode};
use remod_oracle::{extract, CompletionRequest, Oracle};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Snippet rewriter for targeted modifications
pub struct SnippetRewriter<'a> {
    oracle: &'a dyn Oracle,
    config: &'a EngineConfig,
}

impl<'a> SnippetRewriter<'a> {
    /// Create a rewriter over an oracle and configuration
    #[inline]
    #[must_use]
    pub fn new(oracle: &'a dyn Oracle, config: &'a EngineConfig) -> Self {
        Self { oracle, config }
    }

    /// Request replacement text for each target node.
    ///
    /// Entries whose value is not a non-empty string are discarded. An
    /// empty map means no modification is applied for this file.
    pub async fn rewrite(
        &self,
        prompt: &str,
        targets: &[SyntaxNode],
    ) -> BTreeMap<String, String> {
        let request = CompletionRequest::new(
            snippet_prompt(prompt, targets),
            self.config.snippet_budget,
        );

        let response = match self.oracle.complete(request).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, "snippet rewrite call failed");
                return BTreeMap::new();
            }
        };

        let replacements = extract::string_map(&response);
        tracing::info!(
            requested = targets.len(),
            produced = replacements.len(),
            "snippet replacements received"
        );
        replacements
    }
}

/// Whole-file rewriter for comprehensive modifications
pub struct WholeFileRewriter<'a> {
    oracle: &'a dyn Oracle,
    config: &'a EngineConfig,
}

impl<'a> WholeFileRewriter<'a> {
    /// Create a rewriter over an oracle and configuration
    #[inline]
    #[must_use]
    pub fn new(oracle: &'a dyn Oracle, config: &'a EngineConfig) -> Self {
        Self { oracle, config }
    }

    /// Request a complete replacement body for one file.
    ///
    /// The body is taken verbatim from the response's fenced code block;
    /// no structural validation is performed. `None` means this file is
    /// skipped.
    pub async fn generate(&self, prompt: &str, file: &IndexedFile) -> Option<String> {
        let request = CompletionRequest::new(
            whole_file_prompt(prompt, file),
            self.config.whole_file_budget,
        );

        let response = match self.oracle.complete(request).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(file = %file.logical_path, %err, "whole-file rewrite call failed");
                return None;
            }
        };

        let body = extract::fenced_source(&response);
        if body.is_none() {
            tracing::warn!(
                file = %file.logical_path,
                "whole-file response carried no code block"
            );
        }
        body
    }
}

fn snippet_prompt(prompt: &str, targets: &[SyntaxNode]) -> String {
    let mut snippets = String::new();
    for node in targets {
        let _ = write!(
            snippets,
            "**{}:** (lines {}-{})\n```jsx\n{}\n```\n\nContext:\n```jsx\n{}\n```\n\n",
            node.id, node.start_line, node.end_line, node.snippet, node.context
        );
    }

    format!(
        "**User Request:** \"{prompt}\"\n\n\
         **Code Snippets to Modify:**\n{snippets}\
         **Task:** Modify each snippet according to the request. Return the exact \
         replacement code for each node.\n\n\
         **Response Format:** Return ONLY this JSON (no other text):\n\
         ```json\n{{\n  \"node_5\": \"<modified code here>\"\n}}\n```\n"
    )
}

fn whole_file_prompt(prompt: &str, file: &IndexedFile) -> String {
    format!(
        "**User Request:** \"{prompt}\"\n\n\
         **Current File Content:**\n```jsx\n{}\n```\n\n\
         **Task:** Rewrite the entire file according to the request. Preserve \
         functionality but apply comprehensive changes.\n\n\
         **Response:** Return only the complete modified file:\n\
         ```jsx\n[complete file content here]\n```\n",
        file.content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use remod_index::build_catalog;
    use remod_test_utils::{FailingOracle, ScriptedOracle, LOGIN_FORM};
    use std::path::PathBuf;

    fn login_file() -> IndexedFile {
        IndexedFile::analyze(
            "Login.tsx".to_string(),
            PathBuf::from("/tmp/Login.tsx"),
            "src/Login.tsx".to_string(),
            LOGIN_FORM.to_string(),
            LOGIN_FORM.len() as u64,
            15,
        )
    }

    #[tokio::test]
    async fn snippet_rewrite_parses_mapping() {
        let catalog = build_catalog(LOGIN_FORM);
        let button = catalog.iter().find(|n| n.is_control).unwrap().clone();

        let oracle = ScriptedOracle::new().respond(&format!(
            "```json\n{{\"{}\": \"<button className=\\\"bg-red-500\\\">Sign In</button>\"}}\n```",
            button.id
        ));
        let config = EngineConfig::default();
        let rewriter = SnippetRewriter::new(&oracle, &config);

        let replacements = rewriter.rewrite("make signin button red", &[button.clone()]).await;

        assert_eq!(replacements.len(), 1);
        assert!(replacements[&button.id].contains("bg-red-500"));
    }

    #[tokio::test]
    async fn snippet_rewrite_failure_is_empty() {
        let catalog = build_catalog(LOGIN_FORM);
        let config = EngineConfig::default();
        let rewriter = SnippetRewriter::new(&FailingOracle, &config);

        let replacements = rewriter.rewrite("tweak", &catalog).await;
        assert!(replacements.is_empty());
    }

    #[tokio::test]
    async fn whole_file_extracts_fenced_body() {
        let oracle =
            ScriptedOracle::new().respond("Here you go:\n```jsx\nconst Dark = () => <div/>;\n```");
        let config = EngineConfig::default();
        let rewriter = WholeFileRewriter::new(&oracle, &config);

        let body = rewriter.generate("add dark mode", &login_file()).await;
        assert_eq!(body.as_deref(), Some("const Dark = () => <div/>;"));
    }

    #[tokio::test]
    async fn whole_file_without_code_block_is_none() {
        let oracle = ScriptedOracle::new().respond("I cannot rewrite this file.");
        let config = EngineConfig::default();
        let rewriter = WholeFileRewriter::new(&oracle, &config);

        let body = rewriter.generate("add dark mode", &login_file()).await;
        assert!(body.is_none());
    }
}
