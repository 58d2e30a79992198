use std::sync::{Mutex, Weak};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::MonitorNotice;

use super::monitor::{Monitor, MonitorInner};

/// Owns the cancellable autopush task for one monitor.
///
/// Idle until `start`, then Running with exactly one task; `start` on a
/// running scheduler aborts the old task before spawning the new one.
pub(crate) struct Autopush {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Autopush {
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap()
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    pub fn start(&self, monitor: &Monitor) {
        // The loop holds a weak handle so an abandoned monitor can be
        // dropped; the iteration in flight keeps it alive until it finishes.
        let task = tokio::spawn(run_loop(monitor.downgrade()));
        if let Some(old) = self.handle.lock().unwrap().replace(task) {
            old.abort();
        }
    }

    pub fn stop(&self) {
        if let Some(task) = self.handle.lock().unwrap().take() {
            task.abort();
        }
    }
}

async fn run_loop(weak: Weak<MonitorInner>) {
    loop {
        let Some(monitor) = Monitor::upgrade(&weak) else {
            debug!("monitor dropped, ending autopush loop");
            break;
        };
        let interval = monitor.interval();

        monitor.emit(MonitorNotice::AutopushStarting {
            monitor: monitor.name().to_string(),
        });
        match monitor.push().await {
            Ok(response) => {
                monitor.emit(MonitorNotice::AutopushCompleted {
                    monitor: monitor.name().to_string(),
                    response,
                });
            }
            Err(error) => {
                warn!(monitor = %monitor.name(), %error, "autopush failed");
                monitor.emit(MonitorNotice::AutopushFailed {
                    monitor: monitor.name().to_string(),
                    error: std::sync::Arc::new(error),
                });
            }
        }

        // Release the strong handle before idling between iterations
        drop(monitor);
        tokio::time::sleep(interval).await;
    }
}
