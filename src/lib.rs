//! Redraft library crate providing two-pass AI style rewriting.
//!
//! The library turns a content string plus a list of detected style errors
//! into a quality-scored rewrite using a configurable generation backend
//! (remote OpenAI-compatible HTTP service or a local deterministic
//! pipeline), deterministic prompt construction, heuristic output
//! sanitization, and a bounded confidence evaluator. The engine never
//! panics across its public boundary: every failure surfaces as a soft
//! error inside the returned result.

pub mod config;
pub mod engine;

pub use config::RedraftConfig;
pub use engine::{
    BackendConfig, BackendKind, EngineError, NoopProgressSink, ProgressEvent, ProgressSink,
    PromptBuilder, PromptStyle, RewriteContext, RewriteEngine, RewriteRequest, RewriteResult,
    Severity, StderrJsonlProgressSink, StyleError, StyleGuide,
};
