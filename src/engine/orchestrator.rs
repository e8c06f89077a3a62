//! Two-pass rewrite orchestration.
//!
//! [`RewriteEngine`] sequences prompt construction, generation,
//! sanitization, and quality evaluation for an initial rewrite (Pass 1) and
//! an optional self-review refinement (Pass 2). Both entry points are total:
//! every failure, including a panic in a sub-component, is converted into a
//! degraded [`RewriteResult`] that preserves the caller's input text.
//!
//! Pass sequencing is the caller's responsibility: `refine_text` should only
//! be invoked with the text of a Pass-1 result whose `can_refine` was true.
//! The engine holds no mutable state, so one instance may be shared across
//! threads and invoked concurrently.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use super::backend::local::LocalPipelineBackend;
use super::backend::remote::RemoteHttpBackend;
use super::backend::{BackendConfig, BackendKind, RewriteBackend};
use super::error::EngineError;
use super::generator::TextGenerator;
use super::model::{RewriteContext, RewriteRequest, RewriteResult, StyleError};
use super::progress::{NoopProgressSink, ProgressEvent, ProgressSink, emit_guarded};
use super::prompt::{PromptBuilder, PromptStyle};
use super::quality;
use super::sanitize::{MIN_CLEANED_CHARS, clean};
use super::styleguide::StyleGuide;

const PASS_ONE: u8 = 1;
const PASS_TWO: u8 = 2;

/// Soft error reported when the input text is empty or whitespace.
pub const ERROR_NO_CONTENT: &str = "No content provided";
/// Soft error reported when no generation backend is available.
pub const ERROR_BACKEND_UNAVAILABLE: &str =
    "AI models are not available. Check the backend configuration and try again.";
/// Soft error reported when Pass 1 produced no meaningful change.
pub const ERROR_NO_MEANINGFUL_CHANGE: &str =
    "AI model failed to make meaningful improvements to the text";
/// Soft error reported when Pass 2 is invoked without first-pass text.
pub const ERROR_NO_FIRST_PASS: &str = "No first-pass text provided";

/// Improvement note used for the empty-error-list short circuit.
const NO_ERRORS_DETECTED: &str = "No errors detected";
/// Improvement note used when refinement made no useful change.
const REFINEMENT_NOOP: &str = "Second pass: No further refinements needed";
/// Improvement note used when refinement changed the text but no tracked
/// error category confirmed.
const REFINEMENT_GENERIC: &str = "Second pass: Polished phrasing and flow";

/// The two-pass rewrite orchestrator.
pub struct RewriteEngine {
    generator: TextGenerator,
    prompts: PromptBuilder,
    kind: BackendKind,
    progress: Arc<dyn ProgressSink>,
}

impl RewriteEngine {
    /// Builds an engine over an explicit backend, for callers that construct
    /// their own (tests, embedders).
    #[must_use]
    pub fn new(backend: Arc<dyn RewriteBackend>, kind: BackendKind, prompts: PromptBuilder) -> Self {
        Self {
            generator: TextGenerator::new(backend),
            prompts,
            kind,
            progress: Arc::new(NoopProgressSink),
        }
    }

    /// Builds an engine from resolved configuration, constructing the
    /// backend variant and its matching prompt framing.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] when the remote HTTP client
    /// cannot be constructed. An unreachable service is not an error here;
    /// it surfaces later as a soft `RewriteResult` failure.
    pub fn from_config(config: &BackendConfig, guide: StyleGuide) -> Result<Self, EngineError> {
        let (backend, style): (Arc<dyn RewriteBackend>, PromptStyle) = match config.kind {
            BackendKind::RemoteHttp => (
                Arc::new(RemoteHttpBackend::connect(config)?),
                PromptStyle::Terse,
            ),
            BackendKind::LocalPipeline => (
                Arc::new(LocalPipelineBackend::new(config)),
                PromptStyle::Directive,
            ),
        };
        Ok(Self::new(
            backend,
            config.kind,
            PromptBuilder::new(guide, style),
        ))
    }

    /// Replaces the progress sink (defaults to the no-op sink).
    #[must_use]
    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Backend/model label attributed to results.
    #[must_use]
    pub fn model_used(&self) -> &str {
        self.generator.model_label()
    }

    /// Runs the pass a [`RewriteRequest`] selects.
    ///
    /// Pass numbers of 2 or higher dispatch to [`Self::refine_text`], where
    /// the request's content is expected to be the Pass-1 rewrite; everything
    /// else runs [`Self::rewrite`].
    #[must_use]
    pub fn run(&self, request: &RewriteRequest) -> RewriteResult {
        if request.pass_number() >= PASS_TWO {
            self.refine_text(request.content(), request.errors(), request.context())
        } else {
            self.rewrite(request.content(), request.errors(), request.context())
        }
    }

    /// Pass 1: error-driven rewrite of `content`.
    ///
    /// Never panics; every failure is reported through the result's `error`
    /// field with `confidence == 0.0` and the original content preserved.
    ///
    /// An empty error list short-circuits to a full-confidence success that
    /// returns the content unchanged with `can_refine == false`: nothing was
    /// generated, so there is no first-pass text for a refinement to review.
    /// Successful generating passes always report `can_refine == true`.
    #[must_use]
    pub fn rewrite(
        &self,
        content: &str,
        errors: &[StyleError],
        context: RewriteContext,
    ) -> RewriteResult {
        let attempt =
            catch_unwind(AssertUnwindSafe(|| self.rewrite_pass(content, errors, context)));
        attempt.unwrap_or_else(|payload| {
            tracing::error!("rewrite pass panicked; returning degraded result");
            RewriteResult::degraded(content, PASS_ONE, self.model_used(), panic_message(&payload))
        })
    }

    /// Pass 2: self-review refinement of a Pass-1 rewrite.
    ///
    /// A refinement that produces nothing useful is not a failure: the
    /// first-pass text is returned with a no-op note.
    #[must_use]
    pub fn refine_text(
        &self,
        first_pass_text: &str,
        original_errors: &[StyleError],
        context: RewriteContext,
    ) -> RewriteResult {
        let attempt = catch_unwind(AssertUnwindSafe(|| {
            self.refine_pass(first_pass_text, original_errors, context)
        }));
        attempt.unwrap_or_else(|payload| {
            tracing::error!("refine pass panicked; returning degraded result");
            RewriteResult::degraded(
                first_pass_text,
                PASS_TWO,
                self.model_used(),
                panic_message(&payload),
            )
        })
    }

    fn rewrite_pass(
        &self,
        content: &str,
        errors: &[StyleError],
        context: RewriteContext,
    ) -> RewriteResult {
        if content.trim().is_empty() {
            return RewriteResult::degraded(content, PASS_ONE, self.model_used(), ERROR_NO_CONTENT);
        }

        if errors.is_empty() {
            return RewriteResult {
                rewritten_text: content.to_owned(),
                improvements: vec![NO_ERRORS_DETECTED.to_owned()],
                confidence: 1.0,
                pass_number: PASS_ONE,
                can_refine: false,
                model_used: self.model_used().to_owned(),
                error: None,
            };
        }

        if !self.generator.is_available() {
            return RewriteResult::degraded(
                content,
                PASS_ONE,
                self.model_used(),
                ERROR_BACKEND_UNAVAILABLE,
            );
        }

        self.emit("rewrite", "started", "Analysing style issues", 10);
        let prompt = self.prompts.build_prompt(content, errors, context);
        self.emit("rewrite", "prompt_ready", "Prompt constructed", 25);
        self.emit("rewrite", "generating", "Generating rewrite", 40);

        let raw = self.generator.generate_text(&prompt, content);
        let cleaned = clean(&raw, content);
        if cleaned == content {
            return RewriteResult::degraded(
                content,
                PASS_ONE,
                self.model_used(),
                ERROR_NO_MEANINGFUL_CHANGE,
            );
        }

        self.emit("rewrite", "evaluating", "Scoring rewrite quality", 80);
        let evaluation = quality::evaluate_rewrite_quality(
            content,
            &cleaned,
            errors,
            self.kind == BackendKind::RemoteHttp,
        );
        self.emit("rewrite", "complete", "Rewrite complete", 100);

        RewriteResult {
            rewritten_text: cleaned,
            improvements: evaluation.improvements,
            confidence: evaluation.confidence,
            pass_number: PASS_ONE,
            can_refine: true,
            model_used: self.model_used().to_owned(),
            error: None,
        }
    }

    fn refine_pass(
        &self,
        first_pass_text: &str,
        original_errors: &[StyleError],
        _context: RewriteContext,
    ) -> RewriteResult {
        if first_pass_text.trim().is_empty() {
            return RewriteResult::degraded(
                first_pass_text,
                PASS_TWO,
                self.model_used(),
                ERROR_NO_FIRST_PASS,
            );
        }

        self.emit("refine", "started", "Reviewing first-pass rewrite", 10);
        let prompt = self
            .prompts
            .build_self_review_prompt(first_pass_text, original_errors);
        self.emit("refine", "generating", "Generating refinement", 40);

        let raw = self.generator.generate_text(&prompt, first_pass_text);
        let cleaned = clean(&raw, first_pass_text);

        let is_noop = cleaned.trim().is_empty()
            || cleaned == first_pass_text
            || cleaned.chars().count() < MIN_CLEANED_CHARS;
        if is_noop {
            self.emit("refine", "complete", "No further refinements needed", 100);
            return RewriteResult {
                rewritten_text: first_pass_text.to_owned(),
                improvements: vec![REFINEMENT_NOOP.to_owned()],
                confidence: quality::calculate_second_pass_confidence(
                    first_pass_text,
                    first_pass_text,
                    original_errors,
                ),
                pass_number: PASS_TWO,
                can_refine: false,
                model_used: self.model_used().to_owned(),
                error: None,
            };
        }

        self.emit("refine", "evaluating", "Scoring refinement quality", 80);
        let mut improvements =
            quality::extract_improvements(first_pass_text, &cleaned, original_errors);
        if improvements.is_empty() {
            improvements.push(REFINEMENT_GENERIC.to_owned());
        }
        let confidence =
            quality::calculate_second_pass_confidence(first_pass_text, &cleaned, original_errors);
        self.emit("refine", "complete", "Refinement complete", 100);

        RewriteResult {
            rewritten_text: cleaned,
            improvements,
            confidence,
            pass_number: PASS_TWO,
            can_refine: false,
            model_used: self.model_used().to_owned(),
            error: None,
        }
    }

    fn emit(&self, step: &str, status: &str, detail: &str, progress: u8) {
        emit_guarded(
            self.progress.as_ref(),
            ProgressEvent::new(step, status, detail, progress),
        );
    }
}

impl std::fmt::Debug for RewriteEngine {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RewriteEngine")
            .field("kind", &self.kind)
            .field("model", &self.model_used())
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload.downcast_ref::<&str>().map_or_else(
        || {
            payload
                .downcast_ref::<String>()
                .cloned()
                .unwrap_or_else(|| "internal error during rewrite".to_owned())
        },
        |message| (*message).to_owned(),
    )
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
