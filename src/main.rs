//! Redraft CLI entrypoint for two-pass style rewriting.

use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use redraft::engine::StderrJsonlProgressSink;
use redraft::{
    EngineError, RedraftConfig, RewriteEngine, RewriteRequest, RewriteResult, StyleError,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), EngineError> {
    let config = load_config()?;

    let backend_config = config.resolve_backend_config()?;
    let style_guide = config.load_style_guide()?;
    let context = config.resolve_context()?;

    let engine = RewriteEngine::from_config(&backend_config, style_guide)?
        .with_progress_sink(Arc::new(StderrJsonlProgressSink));

    let content = read_content(&config)?;
    let errors = read_errors(&config)?;

    let first = engine.run(&RewriteRequest::new(content, errors.clone(), context, 1));
    let result = if config.refine_enabled() && first.can_refine {
        engine.run(&RewriteRequest::new(
            first.rewritten_text.clone(),
            errors,
            context,
            2,
        ))
    } else {
        first
    };

    write_result(&result)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`EngineError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<RedraftConfig, EngineError> {
    RedraftConfig::load().map_err(|error| EngineError::Configuration {
        message: error.to_string(),
    })
}

fn read_content(config: &RedraftConfig) -> Result<String, EngineError> {
    config.input.as_ref().map_or_else(
        || {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .map_err(|error| EngineError::Io {
                    message: format!("failed to read content from stdin: {error}"),
                })?;
            Ok(content)
        },
        |path| {
            std::fs::read_to_string(path).map_err(|error| EngineError::Io {
                message: format!("failed to read {path}: {error}"),
            })
        },
    )
}

fn read_errors(config: &RedraftConfig) -> Result<Vec<StyleError>, EngineError> {
    let Some(path) = config.errors_file.as_ref() else {
        return Ok(Vec::new());
    };

    let source = std::fs::read_to_string(path).map_err(|error| EngineError::Io {
        message: format!("failed to read {path}: {error}"),
    })?;
    serde_json::from_str(&source).map_err(|error| EngineError::Configuration {
        message: format!("analyzer errors JSON is invalid: {error}"),
    })
}

fn write_result(result: &RewriteResult) -> Result<(), EngineError> {
    let serialised = serde_json::to_string_pretty(result).map_err(|error| EngineError::Io {
        message: format!("failed to serialise result: {error}"),
    })?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{serialised}").map_err(|error| EngineError::Io {
        message: error.to_string(),
    })
}
