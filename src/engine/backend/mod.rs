//! Text-generation backend abstraction.
//!
//! Two interchangeable strategies implement [`RewriteBackend`]: a remote
//! OpenAI-compatible HTTP service ([`remote::RemoteHttpBackend`]) and a local
//! in-process pipeline ([`local::LocalPipelineBackend`]). The variant is
//! selected once at engine construction and never branched on downstream.

pub mod local;
pub mod remote;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::error::EngineError;

/// Default OpenAI-compatible endpoint (an Ollama server's `/v1` surface).
pub const DEFAULT_REMOTE_ENDPOINT: &str = "http://127.0.0.1:11434/v1";
/// Default model identifier sent to the remote service.
pub const DEFAULT_MODEL: &str = "qwen2.5";
/// Default per-call timeout for remote generation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which backend family serves generation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Remote OpenAI-compatible HTTP model service.
    RemoteHttp,
    /// Local in-process inference pipeline.
    LocalPipeline,
}

impl BackendKind {
    /// Label used in `model_used` strings and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RemoteHttp => "remote_http",
            Self::LocalPipeline => "local_pipeline",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Parse error for [`BackendKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported backend kind '{value}': valid options are 'remote_http' or 'local_pipeline'")]
pub struct BackendKindParseError {
    value: String,
}

impl FromStr for BackendKind {
    type Err = BackendKindParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "remote_http" => Ok(Self::RemoteHttp),
            "local_pipeline" => Ok(Self::LocalPipeline),
            _ => Err(BackendKindParseError {
                value: value.to_owned(),
            }),
        }
    }
}

/// Immutable backend configuration resolved once at engine construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Backend family to construct.
    pub kind: BackendKind,
    /// Model identifier (remote) or pipeline label (local).
    pub model_id: String,
    /// Base URL of the remote service; ignored by the local pipeline.
    pub endpoint: Option<Url>,
    /// Per-call timeout for remote generation.
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::RemoteHttp,
            model_id: DEFAULT_MODEL.to_owned(),
            endpoint: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Uniform contract over the two generation strategies.
///
/// Implementations may return errors from [`RewriteBackend::generate`]; the
/// text generator is the layer that converts every failure into "return the
/// original text". Availability is determined at construction time and
/// cached for the backend's lifetime — staleness is an accepted trade-off
/// because generation failures are absorbed anyway.
pub trait RewriteBackend: Send + Sync {
    /// Whether the backend was reachable (remote) or initialised (local)
    /// when constructed.
    fn is_available(&self) -> bool;

    /// Generates rewritten text for a prompt.
    ///
    /// `original` is the untouched source text; implementations may consult
    /// it but must never mutate shared state.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] on transport, API, or inference failure.
    fn generate(&self, prompt: &str, original: &str) -> Result<String, EngineError>;

    /// Combined backend/model label, e.g. `remote_http:qwen2.5`.
    fn model_label(&self) -> &str;
}
