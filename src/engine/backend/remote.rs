//! OpenAI-compatible HTTP backend for rewrite generation.
//!
//! Targets any service exposing the `/models` and `/chat/completions`
//! surface, such as an Ollama server's `/v1` endpoint. Connectivity is
//! probed once at construction via a list-models call and the result is
//! cached for the backend's lifetime.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Serialize;
use url::Url;

use crate::engine::error::EngineError;

use super::{BackendConfig, BackendKind, DEFAULT_REMOTE_ENDPOINT, RewriteBackend};

const SYSTEM_PROMPT: &str = concat!(
    "You are a precise copy editor. ",
    "Respond with only the rewritten text. ",
    "Do not explain your edits and do not mention being an AI model."
);

/// Remote OpenAI-compatible rewrite backend.
#[derive(Debug)]
pub struct RemoteHttpBackend {
    client: Client,
    base_url: String,
    model: String,
    label: String,
    available: bool,
}

impl RemoteHttpBackend {
    /// Builds the backend and probes the service once for availability.
    ///
    /// An unreachable service is not a construction failure: the backend is
    /// returned with `is_available() == false` and the orchestrator reports
    /// the condition as a soft error.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] when the HTTP client cannot be
    /// built or the default endpoint fails to parse.
    pub fn connect(config: &BackendConfig) -> Result<Self, EngineError> {
        let endpoint = resolve_endpoint(config)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| EngineError::Configuration {
                message: format!("failed to configure HTTP client: {error}"),
            })?;

        let base_url = endpoint.as_str().trim_end_matches('/').to_owned();
        let available = probe_models(&client, &base_url);
        if !available {
            tracing::warn!(%base_url, "remote model service did not answer the list-models probe");
        }

        let label = format!("{}:{}", BackendKind::RemoteHttp.label(), config.model_id);
        Ok(Self {
            client,
            base_url,
            model: config.model_id.clone(),
            label,
            available,
        })
    }
}

impl RewriteBackend for RemoteHttpBackend {
    fn is_available(&self) -> bool {
        self.available
    }

    fn generate(&self, prompt: &str, _original: &str) -> Result<String, EngineError> {
        let endpoint = format!("{}/chat/completions", self.base_url);
        let payload = ChatCompletionsRequest {
            model: self.model.as_str(),
            messages: vec![
                ChatCompletionsMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_owned(),
                },
                ChatCompletionsMessage {
                    role: "user",
                    content: prompt.to_owned(),
                },
            ],
        };

        let response = self
            .client
            .post(endpoint)
            .json(&payload)
            .send()
            .map_err(|error| EngineError::Network {
                message: format!("generation request transport failed: {error}"),
            })?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().map_or_else(
                |_| "(failed to read error response body)".to_owned(),
                |content| truncate_for_message(content.as_str(), 160),
            );
            return Err(EngineError::Api {
                message: format!(
                    "generation request failed with status {}: {body}",
                    status.as_u16()
                ),
            });
        }

        let response_payload: ChatCompletionsResponse =
            response.json().map_err(|error| EngineError::Api {
                message: format!("generation response JSON decoding failed: {error}"),
            })?;

        response_payload
            .choices
            .first()
            .and_then(|choice| parse_content_value(&choice.message.content))
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(ToOwned::to_owned)
            .ok_or_else(|| EngineError::Api {
                message: "generation response did not contain assistant text".to_owned(),
            })
    }

    fn model_label(&self) -> &str {
        self.label.as_str()
    }
}

fn resolve_endpoint(config: &BackendConfig) -> Result<Url, EngineError> {
    config.endpoint.clone().map_or_else(
        || {
            Url::parse(DEFAULT_REMOTE_ENDPOINT).map_err(|error| EngineError::Configuration {
                message: format!("default endpoint is invalid: {error}"),
            })
        },
        Ok,
    )
}

fn probe_models(client: &Client, base_url: &str) -> bool {
    let url = format!("{base_url}/models");
    match client.get(url).send() {
        Ok(response) => response.status().is_success(),
        Err(error) => {
            tracing::debug!(%error, "list-models probe failed");
            false
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionsMessage>,
}

#[derive(Debug, Serialize)]
struct ChatCompletionsMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, serde::Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, serde::Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum ChatContent {
    Text(String),
    Parts(Vec<ChatContentPart>),
}

#[derive(Debug, serde::Deserialize)]
struct ChatContentPart {
    text: Option<String>,
    content: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ChatChoiceMessage {
    content: ChatContent,
}

fn parse_content_value(content: &ChatContent) -> Option<&str> {
    match content {
        ChatContent::Text(text) => Some(text.as_str()),
        ChatContent::Parts(parts) => parts
            .iter()
            .find_map(|part| part.text.as_deref().or(part.content.as_deref())),
    }
}

fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let mut output = String::new();
    let mut chars = message.chars();

    for _ in 0..max_chars {
        let Some(character) = chars.next() else {
            return output;
        };
        output.push(character);
    }

    if chars.next().is_some() {
        output.push_str("...");
    }

    output
}
