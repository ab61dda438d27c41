//! Native HTTP client.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime. Status codes are never turned into errors
//! here; the verifiers decide what a 4xx/5xx means.

use std::time::Duration;

use async_trait::async_trait;

use super::{HttpClient, HttpResponse};
use crate::error::HttpError;

/// [`HttpClient`] backed by a shared `ureq` agent.
#[derive(Clone)]
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    /// Create a client. `timeout` bounds the whole request; `None` waits
    /// indefinitely, as the browser does.
    pub fn new(timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build();

        UreqClient {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        UreqClient::new(None)
    }
}

#[async_trait]
impl HttpClient for UreqClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let agent = self.agent.clone();
        let url = url.to_string();

        tokio::task::spawn_blocking(move || {
            let response = agent
                .get(&url)
                .header("Accept", "application/json")
                .header("X-Requested-With", "XMLHttpRequest")
                .call()
                .map_err(|e| HttpError::Request {
                    url: url.clone(),
                    message: e.to_string(),
                })?;

            let status = response.status().as_u16();
            let body = response
                .into_body()
                .read_to_string()
                .map_err(|e| HttpError::Request {
                    url: url.clone(),
                    message: format!("failed to read response body: {}", e),
                })?;

            Ok(HttpResponse { status, body })
        })
        .await
        .map_err(|e| HttpError::Task(e.to_string()))?
    }
}
