//! Progress events emitted at fixed checkpoints during a rewrite pass.
//!
//! Events are fire-and-forget: the engine never retains them, and a failing
//! or panicking sink must not abort a rewrite. Callers typically bridge a
//! sink to a push channel such as a WebSocket; the engine knows nothing
//! about the transport.

use std::io;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::{Deserialize, Serialize};

/// A progress checkpoint reported by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Lifecycle step, e.g. `rewrite` or `refine`.
    pub step: String,
    /// Status within the step, e.g. `started`, `generating`, `complete`.
    pub status: String,
    /// Human-readable detail for display.
    pub detail: String,
    /// Completion percentage in `0..=100`.
    pub progress: u8,
}

impl ProgressEvent {
    /// Construct an event from its parts.
    #[must_use]
    pub fn new(
        step: impl Into<String>,
        status: impl Into<String>,
        detail: impl Into<String>,
        progress: u8,
    ) -> Self {
        Self {
            step: step.into(),
            status: status.into(),
            detail: detail.into(),
            progress: progress.min(100),
        }
    }
}

/// A sink that can receive progress events.
pub trait ProgressSink: Send + Sync {
    /// Records a progress event.
    fn emit(&self, event: ProgressEvent);
}

/// Progress sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Emits progress events to stderr as JSON lines (JSONL).
///
/// Intended for the CLI and local debugging; nothing is transmitted
/// elsewhere.
#[derive(Debug, Default)]
pub struct StderrJsonlProgressSink;

impl ProgressSink for StderrJsonlProgressSink {
    fn emit(&self, event: ProgressEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _write_ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Delivers an event to a sink, swallowing sink panics.
///
/// Sink delivery is best-effort by contract; a misbehaving callback must
/// never abort the rewrite that triggered it.
pub(crate) fn emit_guarded(sink: &dyn ProgressSink, event: ProgressEvent) {
    let delivery = catch_unwind(AssertUnwindSafe(|| sink.emit(event)));
    if delivery.is_err() {
        tracing::warn!("progress sink panicked; event dropped");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::{NoopProgressSink, ProgressEvent, ProgressSink, emit_guarded};

    #[derive(Debug, Default)]
    struct RecordingSink {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl RecordingSink {
        fn take(&self) -> Vec<ProgressEvent> {
            self.events
                .lock()
                .expect("events mutex should be available")
                .drain(..)
                .collect()
        }
    }

    impl ProgressSink for RecordingSink {
        fn emit(&self, event: ProgressEvent) {
            self.events
                .lock()
                .expect("events mutex should be available")
                .push(event);
        }
    }

    struct PanickingSink;

    impl ProgressSink for PanickingSink {
        fn emit(&self, _event: ProgressEvent) {
            panic!("sink exploded");
        }
    }

    #[test]
    fn recording_sink_captures_events() {
        let sink = RecordingSink::default();
        sink.emit(ProgressEvent::new("rewrite", "started", "Pass 1", 10));

        assert_eq!(
            sink.take(),
            vec![ProgressEvent::new("rewrite", "started", "Pass 1", 10)]
        );
    }

    #[test]
    fn progress_is_capped_at_one_hundred() {
        let event = ProgressEvent::new("rewrite", "complete", "done", 250);
        assert_eq!(event.progress, 100);
    }

    #[test]
    fn emit_guarded_swallows_sink_panics() {
        emit_guarded(
            &PanickingSink,
            ProgressEvent::new("rewrite", "started", "Pass 1", 10),
        );
        emit_guarded(
            &NoopProgressSink,
            ProgressEvent::new("rewrite", "complete", "done", 100),
        );
    }
}
