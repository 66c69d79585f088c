//! Target node selection
//!
//! Presents one file's catalog to the oracle as one-line digests and maps
//! the returned identifier array back onto catalog entries. Unknown
//! identifiers are ignored; an empty or garbled response means zero
//! targets for this file, which the orchestrator treats as "skip and
//! continue".

use crate::config::EngineConfig;
use remod_index::SyntaxNode;
use remod_oracle::{extract, CompletionRequest, Oracle};
use std::fmt::Write as _;

/// Target node selector
pub struct TargetSelector<'a> {
    oracle: &'a dyn Oracle,
    config: &'a EngineConfig,
}

impl<'a> TargetSelector<'a> {
    /// Create a selector over an oracle and configuration
    #[inline]
    #[must_use]
    pub fn new(oracle: &'a dyn Oracle, config: &'a EngineConfig) -> Self {
        Self { oracle, config }
    }

    /// Select the catalog entries the request applies to.
    ///
    /// Returned nodes keep catalog order. Never fails; any oracle or
    /// parsing problem yields an empty selection.
    pub async fn select(
        &self,
        prompt: &str,
        logical_path: &str,
        catalog: &[SyntaxNode],
    ) -> Vec<SyntaxNode> {
        let request = CompletionRequest::new(
            target_prompt(prompt, logical_path, catalog),
            self.config.target_budget,
        );

        let response = match self.oracle.complete(request).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(file = logical_path, %err, "target selection call failed");
                return Vec::new();
            }
        };

        let ids = extract::id_array(&response);
        if ids.is_empty() {
            tracing::debug!(file = logical_path, "no target nodes identified");
            return Vec::new();
        }

        let selected: Vec<SyntaxNode> = catalog
            .iter()
            .filter(|node| ids.contains(&node.id))
            .cloned()
            .collect();

        tracing::info!(
            file = logical_path,
            requested = ids.len(),
            matched = selected.len(),
            "target nodes selected"
        );
        selected
    }
}

fn target_prompt(prompt: &str, logical_path: &str, catalog: &[SyntaxNode]) -> String {
    let mut digest = String::new();
    for node in catalog {
        let _ = writeln!(digest, "{}", digest_line(node));
    }

    format!(
        "**User Request:** \"{prompt}\"\n**File:** {logical_path}\n\n\
         **Available Element Nodes:**\n{digest}\n\
         **Task:** Identify which specific nodes need modification for this request.\n\n\
         **Guidelines:**\n\
         - For \"make signin button red\": look for control nodes with signin text\n\
         - Be precise: only select nodes that actually need to change\n\n\
         **Response Format:** Return ONLY a JSON array of node IDs:\n\
         ```json\n[\"node_5\", \"node_12\"]\n```\n\n\
         If no nodes need changes, return: []\n"
    )
}

fn digest_line(node: &SyntaxNode) -> String {
    format!(
        "**{}:** <{}> \"{}\" (lines {}-{}){}{}",
        node.id,
        node.tag_name,
        node.text_content,
        node.start_line,
        node.end_line,
        if node.is_control { " [CONTROL]" } else { "" },
        if node.has_auth_text { " [AUTH]" } else { "" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use remod_index::build_catalog;
    use remod_test_utils::{FailingOracle, ScriptedOracle, LOGIN_FORM};

    #[tokio::test]
    async fn select_maps_ids_onto_catalog() {
        let catalog = build_catalog(LOGIN_FORM);
        let button_id = catalog
            .iter()
            .find(|n| n.is_control)
            .map(|n| n.id.clone())
            .unwrap();

        let oracle = ScriptedOracle::new().respond(&format!("```json\n[\"{button_id}\"]\n```"));
        let config = EngineConfig::default();
        let selector = TargetSelector::new(&oracle, &config);

        let targets = selector
            .select("make signin button red", "src/Login.tsx", &catalog)
            .await;

        assert_eq!(targets.len(), 1);
        assert!(targets[0].is_control);
        assert!(targets[0].has_auth_text);
    }

    #[tokio::test]
    async fn unknown_ids_are_ignored() {
        let catalog = build_catalog(LOGIN_FORM);
        let oracle = ScriptedOracle::new().respond("[\"node_1\", \"node_999\"]");
        let config = EngineConfig::default();
        let selector = TargetSelector::new(&oracle, &config);

        let targets = selector.select("tweak", "src/Login.tsx", &catalog).await;
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id, "node_1");
    }

    #[tokio::test]
    async fn garbled_response_yields_no_targets() {
        let catalog = build_catalog(LOGIN_FORM);
        let oracle = ScriptedOracle::new().respond("no elements match, sorry");
        let config = EngineConfig::default();
        let selector = TargetSelector::new(&oracle, &config);

        let targets = selector.select("tweak", "src/Login.tsx", &catalog).await;
        assert!(targets.is_empty());
    }

    #[tokio::test]
    async fn oracle_failure_yields_no_targets() {
        let catalog = build_catalog(LOGIN_FORM);
        let config = EngineConfig::default();
        let selector = TargetSelector::new(&FailingOracle, &config);

        let targets = selector.select("tweak", "src/Login.tsx", &catalog).await;
        assert!(targets.is_empty());
    }

    #[test]
    fn digest_carries_tags() {
        let catalog = build_catalog(LOGIN_FORM);
        let button = catalog.iter().find(|n| n.is_control).unwrap();
        let line = digest_line(button);

        assert!(line.contains("[CONTROL]"));
        assert!(line.contains("[AUTH]"));
        assert!(line.contains(&button.id));
    }
}
