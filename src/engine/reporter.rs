use std::sync::{Arc, Mutex};
use tracing::error;

/// Where the engine sends failures it converts into 500 responses.
///
/// Called exactly once per failure with the fully formatted error (message plus cause
/// chain). Route misses are never reported.
pub trait ErrorReporter: Send + Sync {
    fn error(&self, message: &str);
}

/// Default reporter: one `tracing` error event per failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn error(&self, message: &str) {
        error!(error = %message, "Unhandled dispatch failure");
    }
}

/// Keeps every reported message in memory. Useful in tests and for hosts that forward
/// errors in batches.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or_default()
    }
}

impl ErrorReporter for RecordingReporter {
    fn error(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
