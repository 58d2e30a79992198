use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::domain::{PushParams, PushResponse};
use crate::ports::PushTransport;

/// Identifies this client to the monitoring endpoint
const DEFAULT_USER_AGENT: &str = concat!("pushmon/", env!("CARGO_PKG_VERSION"));

/// Default transport backed by a reqwest client.
///
/// One `HttpTransport` may be shared across monitors; the underlying client
/// pools connections. TLS content negotiation (ALPN) is handled by the
/// enabled reqwest backend.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport with sane defaults and a recognizable User-Agent
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(DEFAULT_USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Wrap a pre-built client, e.g. one shared with the rest of the host
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PushTransport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        params: &PushParams,
    ) -> Result<PushResponse, Box<dyn std::error::Error + Send + Sync>> {
        let response = self.client.get(url).query(params).send().await?;
        let status_code = response.status().as_u16();
        let body = response.text().await?;
        debug!(url, status_code, "push request completed");
        Ok(PushResponse::new(status_code, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_the_crate() {
        assert!(DEFAULT_USER_AGENT.starts_with("pushmon/"));
    }

    #[test]
    fn test_builds_default_client() {
        assert!(HttpTransport::new().is_ok());
    }
}
