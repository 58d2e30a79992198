use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::adapters::HttpTransport;
use crate::config::MonitorConfig;
use crate::domain::{LatencyWindow, MonitorNotice, PushParams, PushResponse};
use crate::ports::{EventBus, PushTransport, SubscriptionId};

use super::autopush::Autopush;
use super::sampler;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Up/down callback, invoked at the start of every push
pub type StatusGetter = Arc<dyn Fn(&Monitor) -> Result<bool, BoxError> + Send + Sync>;

/// Message callback, invoked after the status getter on every push
pub type MessageGetter = Arc<dyn Fn(&Monitor) -> Result<Option<String>, BoxError> + Send + Sync>;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("invalid push URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("interval must be positive, got {0}s")]
    InvalidInterval(f64),

    #[error("failed to build default transport: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("status getter failed: {0}")]
    StatusGetter(#[source] BoxError),

    #[error("message getter failed: {0}")]
    MessageGetter(#[source] BoxError),

    #[error("push transport failed: {0}")]
    Transport(#[source] BoxError),
}

/// A push monitor bound to one remote endpoint.
///
/// Cloning is cheap and clones share all state. The monitor subscribes to
/// the host's message events on construction; call [`Monitor::close`] to
/// release the subscription and stop the autopush loop when done.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

pub(crate) struct MonitorInner {
    name: String,
    push_url: Url,
    interval: Duration,
    include_latency: bool,
    status_getter: StatusGetter,
    msg_getter: MessageGetter,
    transport: Arc<dyn PushTransport>,
    bus: Arc<dyn EventBus>,
    window: Arc<Mutex<LatencyWindow>>,
    last_push: Mutex<Option<f64>>,
    autopush: Autopush,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl Monitor {
    /// Build a monitor, validate its configuration and subscribe its latency
    /// sampler on the host bus.
    pub fn new(config: MonitorConfig, bus: Arc<dyn EventBus>) -> Result<Self, MonitorError> {
        if !config.interval_secs.is_finite() || config.interval_secs <= 0.0 {
            return Err(MonitorError::InvalidInterval(config.interval_secs));
        }

        let push_url = Url::parse(&config.push_url)?;
        let name = config
            .friendly_name
            .unwrap_or_else(|| format!("{}{}", push_url.authority(), push_url.path()));

        let transport = match config.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };

        let window = Arc::new(Mutex::new(LatencyWindow::new()));
        let subscription = sampler::attach(bus.as_ref(), window.clone(), name.clone());

        let inner = MonitorInner {
            name,
            push_url,
            interval: Duration::from_secs_f64(config.interval_secs),
            include_latency: config.include_latency,
            status_getter: config.status_getter.unwrap_or_else(|| Arc::new(|_| Ok(true))),
            msg_getter: config
                .msg_getter
                .unwrap_or_else(|| Arc::new(|_| Ok(Some("OK".to_string())))),
            transport,
            bus,
            window,
            last_push: Mutex::new(None),
            autopush: Autopush::new(),
            subscription: Mutex::new(Some(subscription)),
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Push current status to the endpoint.
    ///
    /// Getter and transport failures propagate to the caller and no notice
    /// is emitted for them. A completed request emits
    /// [`MonitorNotice::PushCompleted`] whatever its status code; only a 200
    /// advances `last_push`.
    pub async fn push(&self) -> Result<PushResponse, PushError> {
        let up = (self.inner.status_getter)(self).map_err(PushError::StatusGetter)?;
        let msg = (self.inner.msg_getter)(self).map_err(PushError::MessageGetter)?;

        let latency = if self.inner.include_latency {
            self.average_latency()
        } else {
            None
        };
        let params = PushParams::new(up, msg, latency);

        debug!(monitor = %self.inner.name, url = %self.inner.push_url, ?params, "pushing");
        let response = self
            .inner
            .transport
            .get(self.inner.push_url.as_str(), &params)
            .await
            .map_err(PushError::Transport)?;

        if response.is_acknowledged() {
            *self.inner.last_push.lock().unwrap() = Some(unix_now());
        }
        debug!(
            monitor = %self.inner.name,
            status_code = response.status_code,
            "push completed"
        );

        self.emit(MonitorNotice::PushCompleted {
            monitor: self.inner.name.clone(),
            response: response.clone(),
        });

        Ok(response)
    }

    /// Start the autopush loop, replacing any loop already running
    pub fn start(&self) {
        self.inner.autopush.start(self);
    }

    /// Stop the autopush loop. Safe to call when already stopped.
    pub fn stop(&self) {
        self.inner.autopush.stop();
    }

    /// Whether an autopush loop is currently running
    pub fn is_running(&self) -> bool {
        self.inner.autopush.is_running()
    }

    /// Stop the loop and release the host event subscription.
    /// The monitor can no longer sample latency afterwards. Idempotent.
    pub fn close(&self) {
        self.stop();
        if let Some(id) = self.inner.subscription.lock().unwrap().take() {
            self.inner.bus.unsubscribe(id);
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn push_url(&self) -> &str {
        self.inner.push_url.as_str()
    }

    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Unix timestamp of the last acknowledged push, if any
    pub fn last_push(&self) -> Option<f64> {
        *self.inner.last_push.lock().unwrap()
    }

    /// Unix timestamp of the next scheduled push, once a push has succeeded
    pub fn next_push(&self) -> Option<f64> {
        self.last_push()
            .map(|last| last + self.inner.interval.as_secs_f64())
    }

    /// Rolling latency average in milliseconds, `None` until a sample exists
    pub fn average_latency(&self) -> Option<f64> {
        self.inner.window.lock().unwrap().average()
    }

    pub(crate) fn emit(&self, notice: MonitorNotice) {
        self.inner.bus.emit(notice);
    }

    pub(crate) fn downgrade(&self) -> Weak<MonitorInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(weak: &Weak<MonitorInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }
}

impl Drop for MonitorInner {
    fn drop(&mut self) {
        // Backstop for callers that never invoked close()
        self.autopush.stop();
        if let Some(id) = self.subscription.lock().unwrap().take() {
            self.bus.unsubscribe(id);
        }
    }
}

fn unix_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1e6
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::adapters::{MemoryBus, ScriptedTransport};
    use crate::domain::{EventKind, MessageEvent, PushStatus};

    fn build(
        config: MonitorConfig,
    ) -> (Monitor, Arc<MemoryBus>, Arc<ScriptedTransport>) {
        let bus = Arc::new(MemoryBus::new());
        let transport = Arc::new(ScriptedTransport::new());
        let monitor = Monitor::new(
            config.with_transport(transport.clone()),
            bus.clone(),
        )
        .unwrap();
        (monitor, bus, transport)
    }

    fn push_config() -> MonitorConfig {
        MonitorConfig::new("https://kuma.example.com/api/push/token")
    }

    #[test]
    fn test_name_derived_from_url() {
        let (monitor, _bus, _transport) = build(push_config());
        assert_eq!(monitor.name(), "kuma.example.com/api/push/token");
    }

    #[test]
    fn test_explicit_friendly_name_wins() {
        let (monitor, _bus, _transport) = build(push_config().with_friendly_name("primary"));
        assert_eq!(monitor.name(), "primary");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let bus = Arc::new(MemoryBus::new());
        let result = Monitor::new(MonitorConfig::new("not a url"), bus);
        assert!(matches!(result, Err(MonitorError::InvalidUrl(_))));
    }

    #[test]
    fn test_non_positive_interval_rejected() {
        let bus = Arc::new(MemoryBus::new());
        let result = Monitor::new(push_config().with_interval_secs(0.0), bus);
        assert!(matches!(result, Err(MonitorError::InvalidInterval(_))));
    }

    #[tokio::test]
    async fn test_acknowledged_push_advances_last_push() {
        let (monitor, _bus, _transport) = build(push_config());
        assert_eq!(monitor.last_push(), None);
        assert_eq!(monitor.next_push(), None);

        let response = monitor.push().await.unwrap();
        assert_eq!(response.status_code, 200);

        let last = monitor.last_push().unwrap();
        assert!(last > 0.0);
        assert_eq!(monitor.next_push(), Some(last + 60.0));
    }

    #[tokio::test]
    async fn test_unacknowledged_push_leaves_last_push() {
        let (monitor, bus, transport) = build(push_config());
        transport.enqueue_response(PushResponse::new(503, "busy"));

        let response = monitor.push().await.unwrap();
        assert_eq!(response.status_code, 503);
        assert_eq!(monitor.last_push(), None);

        // Completed notice is emitted even for a non-200 response
        let notices = bus.notices();
        assert_eq!(notices.len(), 1);
        assert!(matches!(
            notices[0],
            MonitorNotice::PushCompleted { ref response, .. } if response.status_code == 503
        ));
    }

    #[tokio::test]
    async fn test_getter_failure_aborts_push() {
        let failing: StatusGetter = Arc::new(|_| Err("database unreachable".into()));
        let (monitor, bus, transport) = build(push_config().with_status_getter(failing));

        let result = monitor.push().await;
        assert!(matches!(result, Err(PushError::StatusGetter(_))));
        assert_eq!(transport.request_count(), 0);
        assert!(bus.notices().is_empty());
    }

    #[tokio::test]
    async fn test_down_status_and_message_on_the_wire() {
        let status: StatusGetter = Arc::new(|_| Ok(false));
        let msg: MessageGetter = Arc::new(|_| Ok(Some("degraded".to_string())));
        let (monitor, _bus, transport) =
            build(push_config().with_status_getter(status).with_msg_getter(msg));

        monitor.push().await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let (url, params) = &requests[0];
        assert_eq!(url, "https://kuma.example.com/api/push/token");
        assert_eq!(params.status, PushStatus::Down);
        assert_eq!(params.msg.as_deref(), Some("degraded"));
    }

    #[tokio::test]
    async fn test_ping_omitted_until_a_sample_exists() {
        let (monitor, bus, transport) = build(push_config());

        monitor.push().await.unwrap();
        assert_eq!(transport.requests()[0].1.ping, None);

        // A delivered message event feeds the window through the sampler
        let event = MessageEvent::new(Utc::now() - TimeDelta::milliseconds(80));
        bus.deliver(EventKind::Message, &event);
        assert!(monitor.average_latency().is_some());

        monitor.push().await.unwrap();
        let ping = transport.requests()[1].1.ping.unwrap();
        assert!(ping >= 80.0);
    }

    #[tokio::test]
    async fn test_ping_never_sent_when_latency_disabled() {
        let (monitor, bus, transport) = build(push_config().with_include_latency(false));

        let event = MessageEvent::new(Utc::now() - TimeDelta::milliseconds(80));
        bus.deliver(EventKind::Message, &event);

        monitor.push().await.unwrap();
        assert_eq!(transport.requests()[0].1.ping, None);
    }

    #[test]
    fn test_close_releases_subscription() {
        let (monitor, bus, _transport) = build(push_config());
        assert_eq!(bus.handler_count(), 1);

        monitor.close();
        assert_eq!(bus.handler_count(), 0);
        assert!(!monitor.is_running());

        // Idempotent
        monitor.close();
        assert_eq!(bus.handler_count(), 0);
    }

    #[test]
    fn test_drop_releases_subscription() {
        let bus = Arc::new(MemoryBus::new());
        let transport = Arc::new(ScriptedTransport::new());
        let monitor = Monitor::new(
            push_config().with_transport(transport),
            bus.clone(),
        )
        .unwrap();
        assert_eq!(bus.handler_count(), 1);

        drop(monitor);
        assert_eq!(bus.handler_count(), 0);
    }
}
