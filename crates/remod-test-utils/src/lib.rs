//! Testing utilities for the ReMod workspace
//!
//! Scripted oracle doubles and on-disk fixture projects.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use remod_oracle::{CompletionRequest, Oracle, OracleError};
use std::collections::VecDeque;
use std::path::Path;
use tempfile::TempDir;

/// Oracle double that replays a fixed script of responses in order.
///
/// Each `complete` call pops the next entry; an exhausted script fails
/// the call, which surfaces missing expectations immediately in tests.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    script: Mutex<VecDeque<Result<String, String>>>,
}

impl ScriptedOracle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    #[must_use]
    pub fn respond(self, text: &str) -> Self {
        self.script.lock().push_back(Ok(text.to_string()));
        self
    }

    /// Queue a failed call
    #[must_use]
    pub fn fail(self, reason: &str) -> Self {
        self.script.lock().push_back(Err(reason.to_string()));
        self
    }

    /// Responses not yet consumed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, OracleError> {
        match self.script.lock().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(OracleError::RequestFailed(reason)),
            None => Err(OracleError::RequestFailed("script exhausted".to_string())),
        }
    }
}

/// Oracle double that fails every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingOracle;

#[async_trait]
impl Oracle for FailingOracle {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, OracleError> {
        Err(OracleError::RequestFailed("oracle offline".to_string()))
    }
}

/// A login form with one auth-tagged control node, shared across tests.
pub const LOGIN_FORM: &str = r#"export default function Login() {
  return (
    <div className="page">
      <h1>Welcome</h1>
      <button className="btn" onClick={submit}>Sign In</button>
    </div>
  );
}
"#;

/// A minimal entry file.
pub const APP_SHELL: &str = r#"export default function App() {
  return (
    <main>
      <p>Hello</p>
    </main>
  );
}
"#;

/// Create a temporary project with the given `src/`-relative files.
pub async fn fixture_project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create tempdir");
    for (relative, content) in files {
        let path = dir.path().join("src").join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .expect("create fixture directories");
        }
        tokio::fs::write(&path, content)
            .await
            .expect("write fixture file");
    }
    dir
}

/// Read a fixture file back from `src/`.
pub async fn read_fixture(root: &Path, relative: &str) -> String {
    tokio::fs::read_to_string(root.join("src").join(relative))
        .await
        .expect("read fixture file")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_oracle_replays_in_order() {
        let oracle = ScriptedOracle::new().respond("one").fail("down").respond("two");

        assert_eq!(
            oracle.complete(CompletionRequest::new("a", 10)).await.unwrap(),
            "one"
        );
        assert!(oracle.complete(CompletionRequest::new("b", 10)).await.is_err());
        assert_eq!(
            oracle.complete(CompletionRequest::new("c", 10)).await.unwrap(),
            "two"
        );
        assert_eq!(oracle.remaining(), 0);
        assert!(oracle.complete(CompletionRequest::new("d", 10)).await.is_err());
    }

    #[tokio::test]
    async fn fixture_project_lays_out_src() {
        let dir = fixture_project(&[("App.tsx", APP_SHELL), ("pages/Login.tsx", LOGIN_FORM)]).await;

        assert_eq!(read_fixture(dir.path(), "App.tsx").await, APP_SHELL);
        assert_eq!(read_fixture(dir.path(), "pages/Login.tsx").await, LOGIN_FORM);
    }
}
