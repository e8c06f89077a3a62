//! Failure-absorbing wrapper around the generation backend.
//!
//! This is the single chokepoint guaranteeing the orchestrator never sees a
//! generation failure: backend errors, empty output, and even panics inside
//! the backend all collapse to "return the original text". Absorbed failures
//! are recorded via `tracing` so they stay visible in logs.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use super::backend::RewriteBackend;

/// Thin delegation layer over a [`RewriteBackend`].
#[derive(Clone)]
pub struct TextGenerator {
    backend: Arc<dyn RewriteBackend>,
}

impl TextGenerator {
    /// Wraps a backend selected at engine construction.
    #[must_use]
    pub fn new(backend: Arc<dyn RewriteBackend>) -> Self {
        Self { backend }
    }

    /// Whether the wrapped backend reported itself available.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Combined backend/model label for result attribution.
    #[must_use]
    pub fn model_label(&self) -> &str {
        self.backend.model_label()
    }

    /// Generates text for a prompt, returning `original` on any failure.
    #[must_use]
    pub fn generate_text(&self, prompt: &str, original: &str) -> String {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.backend.generate(prompt, original)));

        match outcome {
            Ok(Ok(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    tracing::warn!("backend returned empty output; keeping original text");
                    original.to_owned()
                } else {
                    trimmed.to_owned()
                }
            }
            Ok(Err(error)) => {
                tracing::warn!(%error, "generation failed; keeping original text");
                original.to_owned()
            }
            Err(_panic) => {
                tracing::warn!("backend panicked during generation; keeping original text");
                original.to_owned()
            }
        }
    }
}

impl std::fmt::Debug for TextGenerator {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TextGenerator")
            .field("model", &self.backend.model_label())
            .field("available", &self.backend.is_available())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::engine::backend::RewriteBackend;
    use crate::engine::error::EngineError;

    use super::TextGenerator;

    #[derive(Debug)]
    struct PanickingBackend;

    impl RewriteBackend for PanickingBackend {
        fn is_available(&self) -> bool {
            true
        }

        fn generate(&self, _prompt: &str, _original: &str) -> Result<String, EngineError> {
            panic!("inference crashed");
        }

        fn model_label(&self) -> &str {
            "local_pipeline:panicking"
        }
    }

    #[derive(Debug)]
    struct FixedBackend {
        response: Result<String, EngineError>,
    }

    impl RewriteBackend for FixedBackend {
        fn is_available(&self) -> bool {
            true
        }

        fn generate(&self, _prompt: &str, _original: &str) -> Result<String, EngineError> {
            self.response.clone()
        }

        fn model_label(&self) -> &str {
            "local_pipeline:fixed"
        }
    }

    #[test]
    fn successful_generation_is_trimmed_and_returned() {
        let generator = TextGenerator::new(Arc::new(FixedBackend {
            response: Ok("  better text \n".to_owned()),
        }));

        assert_eq!(generator.generate_text("prompt", "original"), "better text");
    }

    #[test]
    fn backend_error_returns_original() {
        let generator = TextGenerator::new(Arc::new(FixedBackend {
            response: Err(EngineError::Network {
                message: "timeout".to_owned(),
            }),
        }));

        assert_eq!(generator.generate_text("prompt", "original"), "original");
    }

    #[test]
    fn empty_output_returns_original() {
        let generator = TextGenerator::new(Arc::new(FixedBackend {
            response: Ok("\n\t ".to_owned()),
        }));

        assert_eq!(generator.generate_text("prompt", "original"), "original");
    }

    #[test]
    fn backend_panic_is_absorbed() {
        let generator = TextGenerator::new(Arc::new(PanickingBackend));

        assert_eq!(generator.generate_text("prompt", "original"), "original");
    }
}
