use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::push::PushResponse;

/// Classes of host events the monitor can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A message was delivered to the host client
    Message,
}

/// A host message event carrying enough information to compute a latency sample
#[derive(Debug, Clone)]
pub struct MessageEvent {
    /// When the message left its origin
    pub origin: DateTime<Utc>,
}

impl MessageEvent {
    pub fn new(origin: DateTime<Utc>) -> Self {
        Self { origin }
    }

    /// Latency in milliseconds between origin and `received`.
    /// A delta too large to measure in microseconds is reported as infinite
    /// so callers filtering on finiteness discard it.
    pub fn latency_ms(&self, received: DateTime<Utc>) -> f64 {
        match (received - self.origin).num_microseconds() {
            Some(micros) => micros as f64 / 1000.0,
            None => f64::INFINITY,
        }
    }
}

/// Notifications emitted back to the host, fire-and-forget
#[derive(Debug, Clone)]
pub enum MonitorNotice {
    /// A push() call completed, whatever the status code and whoever called it
    PushCompleted {
        monitor: String,
        response: PushResponse,
    },
    /// The autopush loop is about to attempt a push
    AutopushStarting { monitor: String },
    /// An autopush iteration completed with a response
    AutopushCompleted {
        monitor: String,
        response: PushResponse,
    },
    /// An autopush iteration failed with an error
    AutopushFailed {
        monitor: String,
        error: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl MonitorNotice {
    /// Name of the monitor that emitted this notice
    pub fn monitor(&self) -> &str {
        match self {
            MonitorNotice::PushCompleted { monitor, .. }
            | MonitorNotice::AutopushStarting { monitor }
            | MonitorNotice::AutopushCompleted { monitor, .. }
            | MonitorNotice::AutopushFailed { monitor, .. } => monitor,
        }
    }
}
