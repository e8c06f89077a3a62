//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.redraft.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `REDRAFT_BACKEND`, `REDRAFT_MODEL`, ...
//! 4. **Command-line arguments** – `--backend`/`-b`, `--model`/`-m`, ...
//!
//! # Configuration File
//!
//! Place `.redraft.toml` in the current directory, home directory, or XDG
//! config directory with:
//!
//! ```toml
//! backend = "remote_http"
//! model = "qwen2.5"
//! endpoint = "http://127.0.0.1:11434/v1"
//! timeout_secs = 30
//! style_guide = "house-style.yaml"
//! ```

use std::fs;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::engine::backend::{BackendConfig, BackendKind, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::engine::error::EngineError;
use crate::engine::model::RewriteContext;
use crate::engine::styleguide::StyleGuide;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `REDRAFT_BACKEND` or `--backend`: `remote_http` or `local_pipeline`
/// - `REDRAFT_MODEL` or `--model`: Model identifier
/// - `REDRAFT_ENDPOINT` or `--endpoint`: Remote service base URL
/// - `REDRAFT_TIMEOUT_SECS` or `--timeout-secs`: Remote call timeout
/// - `REDRAFT_STYLE_GUIDE` or `--style-guide`: Style-guide YAML path
/// - `REDRAFT_INPUT` or `--input`: Content file to rewrite
/// - `REDRAFT_ERRORS_FILE` or `--errors-file`: Analyzer errors JSON path
/// - `REDRAFT_CONTEXT` or `--context`: `sentence`, `paragraph`, `document`
/// - `REDRAFT_REFINE` or `--refine`: Run the second pass after the first
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "REDRAFT",
    discovery(
        dotfile_name = ".redraft.toml",
        config_file_name = "redraft.toml",
        app_name = "redraft"
    )
)]
pub struct RedraftConfig {
    /// Generation backend family (`remote_http` or `local_pipeline`).
    #[ortho_config(cli_short = 'b')]
    pub backend: Option<String>,

    /// Model identifier sent to the remote service, or a pipeline label.
    #[ortho_config(cli_short = 'm')]
    pub model: Option<String>,

    /// Base URL of the OpenAI-compatible remote service.
    #[ortho_config(cli_short = 'e')]
    pub endpoint: Option<String>,

    /// Per-call timeout for remote generation, in seconds.
    pub timeout_secs: Option<u64>,

    /// Path to a style-guide YAML file with instruction templates.
    #[ortho_config(cli_short = 's')]
    pub style_guide: Option<Utf8PathBuf>,

    /// Path to the content file to rewrite; stdin is used when absent.
    #[ortho_config(cli_short = 'i')]
    pub input: Option<Utf8PathBuf>,

    /// Path to the analyzer's JSON error list.
    pub errors_file: Option<Utf8PathBuf>,

    /// Rewrite granularity (`sentence`, `paragraph`, or `document`).
    #[ortho_config(cli_short = 'c')]
    pub context: Option<String>,

    /// Whether to run the self-review refinement pass after Pass 1.
    pub refine: Option<bool>,
}

impl RedraftConfig {
    /// Resolves the immutable backend configuration for engine construction.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] when the backend kind or
    /// endpoint URL fails to parse.
    pub fn resolve_backend_config(&self) -> Result<BackendConfig, EngineError> {
        let kind = self
            .backend
            .as_deref()
            .map_or(Ok(BackendKind::RemoteHttp), str::parse)
            .map_err(|error| EngineError::Configuration {
                message: error.to_string(),
            })?;

        let endpoint = self
            .endpoint
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|error| EngineError::Configuration {
                message: format!("endpoint URL is invalid: {error}"),
            })?;

        Ok(BackendConfig {
            kind,
            model_id: self
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            endpoint,
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }

    /// Loads the style guide from the configured YAML file, or the built-in
    /// defaults when no path is set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] when the file cannot be read and
    /// [`EngineError::Template`] when its contents fail validation.
    pub fn load_style_guide(&self) -> Result<StyleGuide, EngineError> {
        self.style_guide.as_ref().map_or_else(
            || Ok(StyleGuide::builtin()),
            |path| {
                let source = fs::read_to_string(path).map_err(|error| EngineError::Io {
                    message: format!("failed to read style guide {path}: {error}"),
                })?;
                StyleGuide::from_yaml_str(&source)
            },
        )
    }

    /// Resolves the rewrite context, defaulting to `paragraph`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] for unrecognised values.
    pub fn resolve_context(&self) -> Result<RewriteContext, EngineError> {
        self.context
            .as_deref()
            .map_or(Ok(RewriteContext::Paragraph), str::parse)
            .map_err(|error| EngineError::Configuration {
                message: error.to_string(),
            })
    }

    /// Whether the refinement pass was requested.
    #[must_use]
    pub fn refine_enabled(&self) -> bool {
        self.refine.unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
