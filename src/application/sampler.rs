use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::debug;

use crate::domain::{EventKind, LatencyWindow, MessageEvent};
use crate::ports::{EventBus, MessageHandler, SubscriptionId};

/// Subscribe a latency sampler on the host bus.
///
/// The handler runs inline in host event dispatch, so it must never panic
/// or propagate errors: unusable samples are logged and dropped.
pub(crate) fn attach(
    bus: &dyn EventBus,
    window: Arc<Mutex<LatencyWindow>>,
    monitor_name: String,
) -> SubscriptionId {
    let handler: MessageHandler = Arc::new(move |event: &MessageEvent| {
        let latency = event.latency_ms(Utc::now());
        if !latency.is_finite() || latency < 0.0 {
            debug!(monitor = %monitor_name, latency, "discarding unusable latency sample");
            return;
        }
        if let Ok(mut window) = window.lock() {
            window.record(latency);
        }
    });
    bus.subscribe(EventKind::Message, handler)
}
