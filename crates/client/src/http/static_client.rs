//! Static HTTP client: serves canned responses keyed by URL path.
//!
//! Used for offline runs (`podium check-pin --response body.json`) and by
//! tests. Every requested URL is recorded so callers can assert on how
//! many requests were issued and with which query string.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use super::{HttpClient, HttpResponse};
use crate::error::HttpError;

/// [`HttpClient`] returning pre-registered responses.
///
/// Lookup is by URL path only (`/ajax/check_pin_code/`), so the same
/// canned response answers every query string.
#[derive(Debug, Default)]
pub struct StaticClient {
    routes: HashMap<String, HttpResponse>,
    requests: Mutex<Vec<String>>,
}

impl StaticClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response for `path`. A later registration replaces an
    /// earlier one.
    pub fn with_response(mut self, path: &str, response: HttpResponse) -> Self {
        self.routes.insert(normalize_path(path), response);
        self
    }

    /// Register a `200 OK` JSON response for `path`.
    pub fn with_json(self, path: &str, body: &serde_json::Value) -> Self {
        self.with_response(path, HttpResponse::ok_json(body))
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        // Recover data even if mutex was poisoned by a panic in another thread
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

#[async_trait]
impl HttpClient for StaticClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.to_string());

        let parsed = Url::parse(url).map_err(|e| HttpError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        self.routes
            .get(parsed.path())
            .cloned()
            .ok_or_else(|| HttpError::Request {
                url: url.to_string(),
                message: format!("no canned response for path '{}'", parsed.path()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_by_path_and_records_requests() {
        let client = StaticClient::new()
            .with_json("ajax/check_pin_code/", &serde_json::json!({"result": false, "reason": "x"}));

        let response = client
            .get("http://localhost:8000/ajax/check_pin_code/?pin=1111&event_id=1")
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert!(response.body.contains("\"reason\""));

        assert_eq!(client.request_count(), 1);
        assert_eq!(
            client.requests()[0],
            "http://localhost:8000/ajax/check_pin_code/?pin=1111&event_id=1"
        );
    }

    #[tokio::test]
    async fn unknown_path_is_request_error() {
        let client = StaticClient::new();
        let result = client.get("http://localhost/missing/").await;
        assert!(matches!(result, Err(HttpError::Request { .. })));
        assert_eq!(client.request_count(), 1);
    }
}
