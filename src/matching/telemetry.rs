//! Per-process request telemetry.

use parking_lot::Mutex;
use serde::Serialize;

/// Snapshot of request counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Telemetry {
    pub requests: u64,
    pub fallbacks: u64,
    /// Streaming mean over all recorded requests
    pub average_latency_ms: f64,
}

/// Thread-safe accumulator behind [`Telemetry`].
#[derive(Debug, Default)]
pub struct TelemetryRecorder {
    state: Mutex<Telemetry>,
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, latency_ms: f64, fallback: bool) {
        let latency_ms = if latency_ms.is_finite() { latency_ms.max(0.0) } else { 0.0 };
        let mut state = self.state.lock();
        state.requests += 1;
        if fallback {
            state.fallbacks += 1;
        }
        state.average_latency_ms += (latency_ms - state.average_latency_ms) / state.requests as f64;
    }

    pub fn snapshot(&self) -> Telemetry {
        *self.state.lock()
    }
}
