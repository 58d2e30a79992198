use async_trait::async_trait;

use crate::domain::{PushParams, PushResponse};

/// Port for issuing one push request to a monitoring endpoint
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// GET `url` with `params` as query parameters and return the response.
    ///
    /// Any returned response, whatever its status code, counts as a completed
    /// push. Errors are transport-level failures only (connection refused,
    /// timeout, malformed response).
    async fn get(
        &self,
        url: &str,
        params: &PushParams,
    ) -> Result<PushResponse, Box<dyn std::error::Error + Send + Sync>>;
}
