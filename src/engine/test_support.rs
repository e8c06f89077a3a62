//! Test-support utilities for rewrite engine flows.

use super::backend::RewriteBackend;
use super::error::EngineError;

#[derive(Debug, Clone)]
enum StubBehaviour {
    Fixed(Result<String, EngineError>),
    Echo,
    Panic,
}

/// Deterministic backend stub used by unit and behavioural tests.
#[derive(Debug, Clone)]
pub struct StubBackend {
    behaviour: StubBehaviour,
    available: bool,
    label: String,
}

impl StubBackend {
    /// Creates a stub that always returns the provided rewritten text.
    #[must_use]
    pub fn success(rewritten_text: impl Into<String>) -> Self {
        Self {
            behaviour: StubBehaviour::Fixed(Ok(rewritten_text.into())),
            available: true,
            label: "stub:fixed".to_owned(),
        }
    }

    /// Creates a stub that always returns the provided error.
    #[must_use]
    pub fn failure(error: EngineError) -> Self {
        Self {
            behaviour: StubBehaviour::Fixed(Err(error)),
            available: true,
            label: "stub:failing".to_owned(),
        }
    }

    /// Creates a stub that echoes the original text unchanged.
    #[must_use]
    pub fn echo() -> Self {
        Self {
            behaviour: StubBehaviour::Echo,
            available: true,
            label: "stub:echo".to_owned(),
        }
    }

    /// Creates a stub that panics inside generation.
    #[must_use]
    pub fn panicking() -> Self {
        Self {
            behaviour: StubBehaviour::Panic,
            available: true,
            label: "stub:panicking".to_owned(),
        }
    }

    /// Marks the stub unavailable while keeping its behaviour.
    #[must_use]
    pub const fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

impl RewriteBackend for StubBackend {
    fn is_available(&self) -> bool {
        self.available
    }

    fn generate(&self, _prompt: &str, original: &str) -> Result<String, EngineError> {
        match &self.behaviour {
            StubBehaviour::Fixed(response) => response.clone(),
            StubBehaviour::Echo => Ok(original.to_owned()),
            StubBehaviour::Panic => panic!("stub backend panicked"),
        }
    }

    fn model_label(&self) -> &str {
        self.label.as_str()
    }
}
