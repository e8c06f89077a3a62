//! Error types shared by the rewrite engine's sub-components.
//!
//! These errors circulate between the backend, prompt, and configuration
//! layers. They never cross the orchestrator's public boundary: the
//! orchestrator converts every failure into a soft `RewriteResult` error
//! string instead.

use thiserror::Error;

/// Errors surfaced by engine sub-components before absorption.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Engine or backend configuration could not be resolved.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Networking failed while calling the remote model service.
    #[error("network error talking to the model service: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The remote model service returned an API-level failure.
    #[error("model service error: {message}")]
    Api {
        /// Response body or status detail describing the failure.
        message: String,
    },

    /// Local in-process inference failed.
    #[error("local inference error: {message}")]
    Inference {
        /// Detail from the local pipeline.
        message: String,
    },

    /// The style-guide instruction templates were invalid.
    #[error("style guide template error: {message}")]
    Template {
        /// Description of the invalid template entry.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}
