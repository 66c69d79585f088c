//! Oracle seam for the ReMod engine
//!
//! The pipeline treats the external text-generation service as an opaque
//! function: prompt in, text or failure out. Everything the engine learns
//! from an oracle response goes through the defensive extractors in
//! [`extract`], which map any shape mismatch to "no data" instead of an
//! error.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod extract;

use async_trait::async_trait;

/// A single-turn completion request.
///
/// Each call site carries its own token budget; the oracle has no session
/// state across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Full prompt text
    pub prompt: String,
    /// Maximum response tokens
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a new request
    #[inline]
    #[must_use]
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
        }
    }
}

/// Oracle errors
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// Transport or service failure
    #[error("oracle request failed: {0}")]
    RequestFailed(String),

    /// The oracle returned no usable text
    #[error("oracle returned an empty response")]
    EmptyResponse,
}

/// The text-generation oracle
///
/// Implementations are request/response only. Latency, retries, and
/// per-call timeouts are the implementor's concern; callers surface any
/// failure as a normal per-stage fallback, never as a crash.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Run one completion
    async fn complete(&self, request: CompletionRequest) -> Result<String, OracleError>;
}
