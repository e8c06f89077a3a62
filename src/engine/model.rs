//! Shared domain models for the two-pass style-rewrite engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity assigned to a detected style error.
///
/// Ordering is ascending: `Low < Medium < High < Critical`. Prompt assembly
/// and truncation rely on this ordering to keep the most important
/// instructions first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Cosmetic issue.
    Low,
    /// Noticeable but not blocking.
    Medium,
    /// Materially harms readability.
    High,
    /// Must be fixed for the text to be acceptable.
    Critical,
}

/// A style error detected by the external analyzer.
///
/// Consumed read-only; the engine never mutates or re-validates analyzer
/// output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleError {
    /// Error category (e.g. `passive_voice`, `long_sentence`).
    #[serde(rename = "type")]
    pub error_type: String,
    /// Optional refinement of the category, used by generic types such as
    /// `ambiguity`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Analyzer-assigned severity.
    pub severity: Severity,
    /// The offending sentence as found in the source text.
    pub sentence: String,
    /// Analyzer-proposed replacement candidates.
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl StyleError {
    /// Effective grouping key: the `subtype` when the generic `ambiguity`
    /// category carries one, otherwise the `error_type`.
    #[must_use]
    pub fn instruction_key(&self) -> &str {
        if self.error_type == "ambiguity" {
            return self.subtype.as_deref().unwrap_or(self.error_type.as_str());
        }
        self.error_type.as_str()
    }
}

/// Granularity of the text handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteContext {
    /// A single sentence.
    Sentence,
    /// One paragraph.
    #[default]
    Paragraph,
    /// A whole document.
    Document,
}

impl RewriteContext {
    /// Label used when embedding the context in prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for RewriteContext {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Parse error for [`RewriteContext`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported rewrite context '{value}': valid options are 'sentence', 'paragraph', or 'document'")]
pub struct RewriteContextParseError {
    value: String,
}

impl FromStr for RewriteContext {
    type Err = RewriteContextParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sentence" => Ok(Self::Sentence),
            "paragraph" => Ok(Self::Paragraph),
            "document" => Ok(Self::Document),
            _ => Err(RewriteContextParseError {
                value: value.to_owned(),
            }),
        }
    }
}

/// Input payload for one rewrite pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRequest {
    content: String,
    errors: Vec<StyleError>,
    context: RewriteContext,
    pass_number: u8,
}

impl RewriteRequest {
    /// Construct a request from explicit content/errors/context values.
    #[must_use]
    pub fn new(
        content: impl Into<String>,
        errors: Vec<StyleError>,
        context: RewriteContext,
        pass_number: u8,
    ) -> Self {
        Self {
            content: content.into(),
            errors,
            context,
            pass_number,
        }
    }

    /// Text that should be rewritten.
    #[must_use]
    pub const fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Analyzer errors attached to the request.
    #[must_use]
    pub fn errors(&self) -> &[StyleError] {
        self.errors.as_slice()
    }

    /// Granularity of the content.
    #[must_use]
    pub const fn context(&self) -> RewriteContext {
        self.context
    }

    /// Which pass this request belongs to (1 or 2).
    #[must_use]
    pub const fn pass_number(&self) -> u8 {
        self.pass_number
    }
}

/// Outcome of one rewrite pass.
///
/// This is a soft-failure type: a set `error` field means the pass degraded
/// gracefully, not that anything was thrown. `rewritten_text` always holds a
/// usable string; on failure it equals the input content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteResult {
    /// The rewritten text, or the original content when the pass failed.
    pub rewritten_text: String,
    /// Human-readable descriptions of confirmed improvements.
    pub improvements: Vec<String>,
    /// Heuristic quality score, always within `[0.0, 1.0]`.
    pub confidence: f64,
    /// Pass that produced this result (1 or 2).
    pub pass_number: u8,
    /// Whether a refinement pass may follow. Only `true` immediately after
    /// a successful generation in Pass 1.
    pub can_refine: bool,
    /// Backend and model that served the pass, e.g. `remote_http:qwen2.5`.
    pub model_used: String,
    /// Soft-failure description; `None` on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RewriteResult {
    /// Construct a degraded result that preserves the caller's input text.
    #[must_use]
    pub fn degraded(
        original: impl Into<String>,
        pass_number: u8,
        model_used: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rewritten_text: original.into(),
            improvements: Vec::new(),
            confidence: 0.0,
            pass_number,
            can_refine: false,
            model_used: model_used.into(),
            error: Some(message.into()),
        }
    }

    /// Whether the pass degraded instead of producing a rewrite.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}
