use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{PushParams, PushResponse};
use crate::ports::PushTransport;

/// Scripted outcome for one push request
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    Respond(PushResponse),
    Fail(String),
}

/// In-memory transport replaying queued outcomes, for tests and dry runs.
///
/// Outcomes are consumed front to back; once the script is exhausted every
/// request is answered with a 200 "ok". All requests are recorded for
/// inspection.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<ScriptedOutcome>>,
    requests: Mutex<Vec<(String, PushParams)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response for the next unanswered request
    pub fn enqueue_response(&self, response: PushResponse) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedOutcome::Respond(response));
    }

    /// Queue a transport failure for the next unanswered request
    pub fn enqueue_error(&self, message: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedOutcome::Fail(message.into()));
    }

    /// All requests seen so far, in order
    pub fn requests(&self) -> Vec<(String, PushParams)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushTransport for ScriptedTransport {
    async fn get(
        &self,
        url: &str,
        params: &PushParams,
    ) -> Result<PushResponse, Box<dyn std::error::Error + Send + Sync>> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), params.clone()));

        let outcome = self.script.lock().unwrap().pop_front();
        match outcome {
            Some(ScriptedOutcome::Respond(response)) => Ok(response),
            Some(ScriptedOutcome::Fail(message)) => Err(message.into()),
            None => Ok(PushResponse::new(200, "ok")),
        }
    }
}
