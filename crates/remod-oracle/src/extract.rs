//! Defensive extraction of structured data from oracle responses
//!
//! Oracle output is best-effort text. These helpers pull fenced JSON,
//! fenced code blocks, bare arrays, and bare objects out of a response,
//! returning `None`/empty on any shape mismatch. Nothing here is a hard
//! error: garbled output always degrades to "no data".

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\n(.*?)```").expect("static regex"));
static FENCED_ANY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```\n(.*?)```").expect("static regex"));
static FENCED_UI_SOURCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:jsx|tsx)\n(.*?)```").expect("static regex"));
static BARE_ARRAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[(.*?)\]").expect("static regex"));
static BARE_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("static regex"));

/// Extract the body of a ```json fenced block, if present.
#[must_use]
pub fn fenced_json(text: &str) -> Option<&str> {
    FENCED_JSON
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Extract a source code block from a response.
///
/// Prefers a `jsx`/`tsx` fence, then falls back to an unlabelled fence.
#[must_use]
pub fn fenced_source(text: &str) -> Option<String> {
    FENCED_UI_SOURCE
        .captures(text)
        .or_else(|| FENCED_ANY.captures(text))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a JSON object from a response.
///
/// Tries, in order: a ```json fence, any fence, a bare `{ ... }` span.
#[must_use]
pub fn json_object(text: &str) -> Option<Value> {
    let candidate = fenced_json(text)
        .map(str::to_string)
        .or_else(|| {
            FENCED_ANY
                .captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })
        .or_else(|| BARE_OBJECT.find(text).map(|m| m.as_str().to_string()))?;

    match serde_json::from_str::<Value>(&candidate) {
        Ok(value) if value.is_object() => Some(value),
        _ => None,
    }
}

/// Parse a flat array of string identifiers from a response.
///
/// Accepts a ```json fence or the first bare `[ ... ]` span. Anything that
/// does not parse as an array of strings yields an empty list.
#[must_use]
pub fn id_array(text: &str) -> Vec<String> {
    let candidate = fenced_json(text)
        .map(str::to_string)
        .or_else(|| BARE_ARRAY.find(text).map(|m| m.as_str().to_string()));

    let Some(candidate) = candidate else {
        return Vec::new();
    };

    match serde_json::from_str::<Value>(&candidate) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Parse a key → text mapping from a response.
///
/// Entries whose value is not a non-empty string are discarded.
#[must_use]
pub fn string_map(text: &str) -> BTreeMap<String, String> {
    let Some(Value::Object(entries)) = json_object(text) else {
        return BTreeMap::new();
    };

    entries
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) if !s.trim().is_empty() => Some((key, s)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fenced_json_found() {
        let text = "intro\n```json\n{\"files\": []}\n```\ntrailer";
        assert_eq!(fenced_json(text), Some("{\"files\": []}\n"));
    }

    #[test]
    fn fenced_json_absent() {
        assert_eq!(fenced_json("no fences here"), None);
    }

    #[test]
    fn fenced_source_prefers_ui_fence() {
        let text = "```tsx\n<div>ok</div>\n```";
        assert_eq!(fenced_source(text), Some("<div>ok</div>".to_string()));
    }

    #[test]
    fn fenced_source_falls_back_to_plain_fence() {
        let text = "```\n<div>plain</div>\n```";
        assert_eq!(fenced_source(text), Some("<div>plain</div>".to_string()));
    }

    #[test]
    fn fenced_source_empty_block_is_none() {
        assert_eq!(fenced_source("```jsx\n   \n```"), None);
        assert_eq!(fenced_source("prose only"), None);
    }

    #[test]
    fn json_object_from_bare_braces() {
        let text = "here you go: {\"a\": 1}";
        let value = json_object(text).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn json_object_rejects_non_object() {
        assert!(json_object("```json\n[1, 2]\n```").is_none());
        assert!(json_object("not json at all").is_none());
    }

    #[test]
    fn id_array_from_fence() {
        let ids = id_array("```json\n[\"node_5\", \"node_12\"]\n```");
        assert_eq!(ids, vec!["node_5", "node_12"]);
    }

    #[test]
    fn id_array_from_bare_brackets() {
        let ids = id_array("targets: [\"node_1\"] done");
        assert_eq!(ids, vec!["node_1"]);
    }

    #[test]
    fn id_array_garbled_is_empty() {
        assert!(id_array("no brackets").is_empty());
        assert!(id_array("[not, valid, json]").is_empty());
    }

    #[test]
    fn id_array_ignores_non_strings() {
        assert_eq!(id_array("[\"node_2\", 7, null]"), vec!["node_2"]);
    }

    #[test]
    fn string_map_discards_empty_and_non_string() {
        let text = r#"```json
{"node_1": "<button/>", "node_2": "", "node_3": 42, "node_4": "   "}
```"#;
        let map = string_map(text);
        assert_eq!(map.len(), 1);
        assert_eq!(map["node_1"], "<button/>");
    }

    #[test]
    fn string_map_garbled_is_empty() {
        assert!(string_map("nothing structured").is_empty());
    }
}
