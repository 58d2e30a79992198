use serde::Serialize;

use super::latency::round2;

/// Query parameters for one push request
#[derive(Debug, Clone, Serialize)]
pub struct PushParams {
    pub status: PushStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping: Option<f64>,
}

impl PushParams {
    /// Build parameters from current monitor state.
    ///
    /// An empty or absent message omits the `msg` field. The `ping` field is
    /// present only when latency reporting is requested and at least one
    /// sample exists.
    pub fn new(up: bool, msg: Option<String>, latency_ms: Option<f64>) -> Self {
        Self {
            status: if up { PushStatus::Up } else { PushStatus::Down },
            msg: msg.filter(|m| !m.is_empty()),
            ping: latency_ms.map(round2),
        }
    }
}

/// Wire form of the up/down flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PushStatus {
    Up,
    Down,
}

impl PushStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PushStatus::Up => "up",
            PushStatus::Down => "down",
        }
    }
}

/// Outcome of one completed HTTP push
#[derive(Debug, Clone)]
pub struct PushResponse {
    pub status_code: u16,
    pub body: String,
}

impl PushResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    /// The monitoring endpoint acknowledges a push with exactly 200
    pub fn is_acknowledged(&self) -> bool {
        self.status_code == 200
    }
}
