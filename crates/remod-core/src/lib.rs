//! ReMod Core - the intelligent modification engine
//!
//! Sequences a single modification run:
//! - Index the project's UI sources into queryable metadata
//! - Decide which files are implicated and at what granularity
//! - Map the request onto addressable syntax nodes per file
//! - Obtain replacement code from the oracle
//! - Apply replacements via position-stable line patching
//!
//! The public boundary never throws: [`ModificationEngine::run`] always
//! returns a structured [`ModificationResult`], converting every internal
//! failure into a reason string.
//!
//! # Example
//!
//! ```rust,ignore
//! use remod_core::{ModificationEngine, ModificationRequest};
//! use std::sync::Arc;
//!
//! # async fn example(oracle: Arc<dyn remod_oracle::Oracle>) {
//! let engine = ModificationEngine::new(oracle, "/path/to/project");
//! let result = engine
//!     .run(ModificationRequest::new("make signin button red"))
//!     .await;
//!
//! println!("success: {}, files: {:?}", result.success, result.selected_files);
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod patch;
pub mod rewrite;
pub mod scope;
pub mod state;
pub mod targets;
pub mod types;

pub use config::EngineConfig;
pub use engine::ModificationEngine;
pub use error::{EngineError, PatchError};
pub use scope::{ScopeDecision, ScopeSelector};
pub use state::RunState;
pub use types::{
    AppliedRange, CodeRange, FnSink, Granularity, ModificationRequest, ModificationResult,
    NullSink, ProgressSink,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a modification run
    pub use crate::{
        EngineConfig, Granularity, ModificationEngine, ModificationRequest, ModificationResult,
        ProgressSink,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
