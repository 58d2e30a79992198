use std::env;
use std::fmt;
use std::sync::Arc;

use crate::application::monitor::{MessageGetter, StatusGetter};
use crate::adapters::HttpTransport;
use crate::ports::PushTransport;

/// Default seconds between autopushes
pub const DEFAULT_INTERVAL_SECS: f64 = 60.0;

/// Constructor-time configuration for one monitor
#[derive(Clone)]
pub struct MonitorConfig {
    pub push_url: String,
    pub interval_secs: f64,
    pub friendly_name: Option<String>,
    pub include_latency: bool,
    pub(crate) status_getter: Option<StatusGetter>,
    pub(crate) msg_getter: Option<MessageGetter>,
    pub(crate) transport: Option<Arc<dyn PushTransport>>,
}

impl MonitorConfig {
    pub fn new(push_url: impl Into<String>) -> Self {
        Self {
            push_url: push_url.into(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            friendly_name: None,
            include_latency: true,
            status_getter: None,
            msg_getter: None,
            transport: None,
        }
    }

    /// Load configuration from `PUSHMON_*` environment variables.
    /// Returns `None` when `PUSHMON_URL` is unset.
    pub fn from_env() -> Option<Self> {
        let push_url = env::var("PUSHMON_URL").ok()?;
        let mut config = Self::new(push_url);

        if let Some(interval) = env::var("PUSHMON_INTERVAL").ok().and_then(|s| s.parse().ok()) {
            config.interval_secs = interval;
        }
        if let Ok(name) = env::var("PUSHMON_FRIENDLY_NAME") {
            config.friendly_name = Some(name);
        }
        if let Some(flag) = env::var("PUSHMON_INCLUDE_LATENCY")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.include_latency = flag;
        }

        Some(config)
    }

    /// Seconds between autopushes
    pub fn with_interval_secs(mut self, interval_secs: f64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    /// Name used in logs and notices; defaults to URL authority + path
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Whether pushes carry the rolling latency average
    pub fn with_include_latency(mut self, include_latency: bool) -> Self {
        self.include_latency = include_latency;
        self
    }

    /// Up/down callback; defaults to always up
    pub fn with_status_getter(mut self, getter: StatusGetter) -> Self {
        self.status_getter = Some(getter);
        self
    }

    /// Message callback; defaults to a constant "OK"
    pub fn with_msg_getter(mut self, getter: MessageGetter) -> Self {
        self.msg_getter = Some(getter);
        self
    }

    /// Custom transport; defaults to a crate-owned reqwest client
    pub fn with_transport(mut self, transport: Arc<dyn PushTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Share an existing reqwest client instead of building a new one
    pub fn with_client(self, client: reqwest::Client) -> Self {
        self.with_transport(Arc::new(HttpTransport::with_client(client)))
    }
}

impl fmt::Debug for MonitorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorConfig")
            .field("push_url", &self.push_url)
            .field("interval_secs", &self.interval_secs)
            .field("friendly_name", &self.friendly_name)
            .field("include_latency", &self.include_latency)
            .field("custom_status_getter", &self.status_getter.is_some())
            .field("custom_msg_getter", &self.msg_getter.is_some())
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}
