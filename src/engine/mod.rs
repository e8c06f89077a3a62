//! Two-pass AI rewrite engine: backends, prompts, sanitization, scoring,
//! and the orchestrator that sequences them.

pub mod backend;
pub mod error;
pub mod generator;
pub mod model;
pub mod orchestrator;
pub mod progress;
pub mod prompt;
pub mod quality;
pub mod sanitize;
pub mod styleguide;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use backend::{BackendConfig, BackendKind, RewriteBackend};
pub use error::EngineError;
pub use model::{RewriteContext, RewriteRequest, RewriteResult, Severity, StyleError};
pub use orchestrator::RewriteEngine;
pub use progress::{NoopProgressSink, ProgressEvent, ProgressSink, StderrJsonlProgressSink};
pub use prompt::{PromptBuilder, PromptStyle};
pub use styleguide::StyleGuide;
