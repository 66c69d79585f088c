//! Relevance and scope selection
//!
//! Two paths produce the candidate file set:
//! - Primary: serialize the index into a project summary and ask the
//!   oracle for files, granularity, and a rationale in one fenced JSON
//!   payload. Malformed output degrades to an empty file list.
//! - Fallback: keyword scoring over indexed content, used only when the
//!   primary path yields nothing. Fallback candidates get a second,
//!   narrower oracle call for granularity only, defaulting to targeted.

use crate::config::EngineConfig;
use crate::types::{Granularity, ModificationRequest};
use remod_index::{build_project_summary, IndexedFile, ProjectIndex};
use remod_oracle::{extract, CompletionRequest, Oracle};
use serde::Deserialize;
use std::fmt::Write as _;

/// Per-term content score cap; keeps incidental repeats from dominating.
const TERM_SCORE_CAP: u32 = 100;
/// Occurrence counts at or above this are treated as noise and ignored.
const OCCURRENCE_NOISE_FLOOR: usize = 100;
/// Keywords this short or shorter are ignored by the fallback search.
const TERM_LEN_FLOOR: usize = 2;

/// Outcome of scope selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeDecision {
    /// Candidate logical file paths
    pub files: Vec<String>,
    /// Chosen edit granularity
    pub granularity: Granularity,
    /// Oracle-supplied rationale, best effort
    pub reasoning: Option<String>,
}

impl ScopeDecision {
    fn empty() -> Self {
        Self {
            files: Vec::new(),
            granularity: Granularity::Targeted,
            reasoning: None,
        }
    }
}

/// Raw oracle payload for the primary decision
#[derive(Debug, Deserialize)]
struct RawDecision {
    files: Vec<String>,
    scope: String,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Relevance and scope selector
pub struct ScopeSelector<'a> {
    oracle: &'a dyn Oracle,
    config: &'a EngineConfig,
}

impl<'a> ScopeSelector<'a> {
    /// Create a selector over an oracle and configuration
    #[inline]
    #[must_use]
    pub fn new(oracle: &'a dyn Oracle, config: &'a EngineConfig) -> Self {
        Self { oracle, config }
    }

    /// Select candidate files and granularity for a request.
    ///
    /// Never fails: an empty `files` list in the returned decision means
    /// both paths came up dry and the run should abort.
    pub async fn select(
        &self,
        request: &ModificationRequest,
        index: &ProjectIndex,
    ) -> ScopeDecision {
        let primary = self.primary(request, index).await;
        if !primary.files.is_empty() {
            tracing::info!(
                files = primary.files.len(),
                granularity = %primary.granularity,
                "primary scope selection succeeded"
            );
            return primary;
        }

        tracing::info!("primary scope selection empty, running fallback search");
        let fallback = self.fallback_search(&request.prompt, index);
        if fallback.is_empty() {
            return ScopeDecision::empty();
        }

        let granularity = self.narrow_scope(&request.prompt, &fallback).await;
        tracing::info!(
            files = fallback.len(),
            %granularity,
            "fallback scope selection succeeded"
        );
        ScopeDecision {
            files: fallback,
            granularity,
            reasoning: None,
        }
    }

    async fn primary(&self, request: &ModificationRequest, index: &ProjectIndex) -> ScopeDecision {
        let prompt = primary_prompt(request, index);
        let response = match self
            .oracle
            .complete(CompletionRequest::new(prompt, self.config.scope_budget))
            .await
        {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, "scope oracle call failed");
                return ScopeDecision::empty();
            }
        };

        let Some(block) = extract::fenced_json(&response) else {
            tracing::warn!("scope response carried no fenced JSON");
            return ScopeDecision::empty();
        };

        match serde_json::from_str::<RawDecision>(block) {
            Ok(raw) => ScopeDecision {
                files: raw.files,
                granularity: parse_granularity(&raw.scope),
                reasoning: raw.reasoning,
            },
            Err(err) => {
                tracing::warn!(%err, "scope response JSON did not match the expected shape");
                ScopeDecision::empty()
            }
        }
    }

    /// Heuristic file search, independent of the oracle.
    ///
    /// Scores every indexed file on keyword frequency, filename matches,
    /// and domain tags; returns up to `fallback_limit` paths whose score
    /// exceeds the threshold, best first.
    #[must_use]
    pub fn fallback_search(&self, prompt: &str, index: &ProjectIndex) -> Vec<String> {
        if index.is_empty() {
            return Vec::new();
        }

        let needle = prompt.to_lowercase();
        let terms: Vec<&str> = needle
            .split_whitespace()
            .filter(|term| term.len() > TERM_LEN_FLOOR)
            .collect();

        let mut matches: Vec<(&IndexedFile, u32)> = Vec::new();
        for file in index.files() {
            let score = score_file(file, &needle, &terms);
            if score > self.config.fallback_threshold {
                matches.push((file, score));
            }
        }

        matches.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.0.logical_path.cmp(&b.0.logical_path))
        });

        matches
            .into_iter()
            .take(self.config.fallback_limit)
            .map(|(file, _)| file.logical_path.clone())
            .collect()
    }

    /// Granularity decision for fallback-selected files.
    ///
    /// A narrow rubric-only call; any oracle failure defaults to targeted.
    pub async fn narrow_scope(&self, prompt: &str, files: &[String]) -> Granularity {
        let request =
            CompletionRequest::new(narrow_prompt(prompt, files), self.config.narrow_scope_budget);
        match self.oracle.complete(request).await {
            Ok(text) if text.contains("FULL_FILE") => Granularity::WholeFile,
            Ok(_) => Granularity::Targeted,
            Err(err) => {
                tracing::warn!(%err, "narrow scope call failed, defaulting to targeted");
                Granularity::Targeted
            }
        }
    }
}

fn parse_granularity(tag: &str) -> Granularity {
    if tag.contains("FULL_FILE") {
        Granularity::WholeFile
    } else {
        Granularity::Targeted
    }
}

fn score_file(file: &IndexedFile, needle: &str, terms: &[&str]) -> u32 {
    let content = file.content.to_lowercase();
    let name = file.name.to_lowercase();
    let mut score = 0u32;

    for term in terms {
        let occurrences = content.matches(term).count();
        if occurrences > 0 && occurrences < OCCURRENCE_NOISE_FLOOR {
            score += ((occurrences as u32) * 10).min(TERM_SCORE_CAP);
        }
        if name.contains(term) {
            score += 20;
        }
    }

    if needle.contains("signin") || needle.contains("login") || needle.contains("sign in") {
        if file.has_auth {
            score += 50;
        }
        if file.has_controls {
            score += 25;
        }
    }

    if needle.contains("button") && file.has_controls {
        score += 40;
    }

    if file.is_entry {
        score += 10;
    }

    score
}

fn primary_prompt(request: &ModificationRequest, index: &ProjectIndex) -> String {
    let mut prompt = String::from(
        "You are analyzing a UI project to determine which files need modification \
         AND the scope of changes.\n\n",
    );

    if let Some(context) = &request.context {
        let _ = write!(prompt, "**Conversation Context:**\n{context}\n\n");
    }

    let _ = write!(
        prompt,
        "**Current User Request:** \"{}\"\n\n{}",
        request.prompt,
        build_project_summary(index)
    );

    prompt.push_str(SCOPE_RUBRIC);
    prompt.push_str(
        "\n**File Selection Guidelines:**\n\
         - For signin/login requests: prefer files with auth content\n\
         - For button styling: prefer files with controls\n\
         - For layout/theme changes: focus on entry files\n\
         - Consider files mentioned in the conversation context\n\
         - Never select files under the library UI components folder\n\n\
         **Response Format:** Return ONLY this JSON:\n\
         ```json\n\
         {\n  \"files\": [\"src/App.tsx\"],\n  \"scope\": \"FULL_FILE\",\n  \"reasoning\": \"brief explanation\"\n}\n\
         ```\n",
    );

    prompt
}

fn narrow_prompt(prompt: &str, files: &[String]) -> String {
    format!(
        "**User Request:** \"{}\"\n**Files Found:** {}\n\n\
         **Task:** Determine the modification scope based ONLY on the request type.\n\n\
         {}\n**Response:** Return ONLY the scope tag, either FULL_FILE or TARGETED_NODES.\n",
        prompt,
        files.join(", "),
        SCOPE_RUBRIC
    )
}

const SCOPE_RUBRIC: &str = "**Scope Guidelines:**\n\
    - **FULL_FILE**: theme or dark-mode changes, layout redesigns, responsive \
    design, comprehensive styling, structural changes to entire components, or \
    any request using \"entire\", \"all\", \"complete\", \"comprehensive\", or \
    continuation of a previously broad change.\n\
    - **TARGETED_NODES**: specific element colors or text, single element \
    modifications, small styling tweaks, attribute changes, or continuation of \
    a previously narrow change.\n\n\
    **Examples:**\n\
    - \"make signin button red\" -> TARGETED_NODES\n\
    - \"add dark mode theme\" -> FULL_FILE\n\
    - \"change layout to modern design\" -> FULL_FILE\n\
    - \"change text color of welcome message\" -> TARGETED_NODES\n";

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use remod_test_utils::{FailingOracle, ScriptedOracle};
    use std::path::PathBuf;

    fn file(logical: &str, content: &str) -> IndexedFile {
        IndexedFile::analyze(
            logical.rsplit('/').next().unwrap_or(logical).to_string(),
            PathBuf::from(logical),
            logical.to_string(),
            content.to_string(),
            content.len() as u64,
            15,
        )
    }

    fn sample_index() -> ProjectIndex {
        let mut index = ProjectIndex::default();
        index.insert(file("src/App.tsx", "export default function App() { return <div/>; }"));
        index.insert(file(
            "src/Login.tsx",
            "const LoginForm = () => <button>Sign In</button>;",
        ));
        index.insert(file("src/About.tsx", "const About = () => <p>hello</p>;"));
        index
    }

    #[tokio::test]
    async fn primary_path_parses_fenced_decision() {
        let oracle = ScriptedOracle::new().respond(
            "```json\n{\"files\": [\"src/Login.tsx\"], \"scope\": \"TARGETED_NODES\", \"reasoning\": \"signin lives here\"}\n```",
        );
        let config = EngineConfig::default();
        let selector = ScopeSelector::new(&oracle, &config);

        let decision = selector
            .select(&ModificationRequest::new("make signin button red"), &sample_index())
            .await;

        assert_eq!(decision.files, vec!["src/Login.tsx"]);
        assert_eq!(decision.granularity, Granularity::Targeted);
        assert_eq!(decision.reasoning.as_deref(), Some("signin lives here"));
    }

    #[tokio::test]
    async fn malformed_primary_falls_back() {
        // Primary returns prose, fallback finds the login file, narrow
        // scope call answers targeted.
        let oracle = ScriptedOracle::new()
            .respond("I think you should edit some files.")
            .respond("TARGETED_NODES");
        let config = EngineConfig::default();
        let selector = ScopeSelector::new(&oracle, &config);

        let decision = selector
            .select(&ModificationRequest::new("make signin button red"), &sample_index())
            .await;

        assert_eq!(decision.files, vec!["src/Login.tsx".to_string()]);
        assert_eq!(decision.granularity, Granularity::Targeted);
        assert_eq!(decision.reasoning, None);
    }

    #[tokio::test]
    async fn oracle_failure_everywhere_defaults_to_targeted() {
        let oracle = FailingOracle;
        let config = EngineConfig::default();
        let selector = ScopeSelector::new(&oracle, &config);

        let decision = selector
            .select(&ModificationRequest::new("make signin button red"), &sample_index())
            .await;

        // Fallback still finds the auth-tagged file without the oracle.
        assert_eq!(decision.files, vec!["src/Login.tsx".to_string()]);
        assert_eq!(decision.granularity, Granularity::Targeted);
    }

    #[tokio::test]
    async fn narrow_scope_detects_full_file() {
        let oracle = ScriptedOracle::new().respond("FULL_FILE");
        let config = EngineConfig::default();
        let selector = ScopeSelector::new(&oracle, &config);

        let granularity = selector
            .narrow_scope("add dark mode", &["src/App.tsx".to_string()])
            .await;
        assert_eq!(granularity, Granularity::WholeFile);
    }

    #[test]
    fn fallback_prefers_auth_files_for_signin_requests() {
        let oracle = FailingOracle;
        let config = EngineConfig::default();
        let selector = ScopeSelector::new(&oracle, &config);

        let files = selector.fallback_search("make signin button red", &sample_index());
        assert_eq!(files.first().map(String::as_str), Some("src/Login.tsx"));
    }

    #[test]
    fn fallback_below_threshold_is_empty() {
        let oracle = FailingOracle;
        let config = EngineConfig::default();
        let selector = ScopeSelector::new(&oracle, &config);

        let mut index = ProjectIndex::default();
        index.insert(file("src/Misc.tsx", "const Misc = () => null;"));

        let files = selector.fallback_search("polish the frobnicator widget", &index);
        assert!(files.is_empty());
    }

    #[test]
    fn fallback_caps_candidate_count() {
        let oracle = FailingOracle;
        let config = EngineConfig::default();
        let selector = ScopeSelector::new(&oracle, &config);

        let mut index = ProjectIndex::default();
        for i in 0..6 {
            index.insert(file(
                &format!("src/Button{i}.tsx"),
                "export const B = () => <button>Press button now</button>;",
            ));
        }

        let files = selector.fallback_search("make every button bigger", &index);
        assert_eq!(files.len(), 3);
    }
}
