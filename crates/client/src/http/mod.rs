//! HTTP client abstraction for the verification endpoints.
//!
//! Verifiers never talk to the network directly; they take an
//! [`HttpClient`] so the request/response cycle can run against:
//! - [`UreqClient`](ureq_client::UreqClient): a real server (feature `native`)
//! - [`StaticClient`](static_client::StaticClient): canned responses keyed by path

#[cfg(feature = "native")]
pub mod ureq_client;
pub mod static_client;

use async_trait::async_trait;

use crate::error::HttpError;

/// A completed HTTP exchange. Any status is a response; only failures to
/// get one at all are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        HttpResponse {
            status,
            body: body.into(),
        }
    }

    /// 200 OK with a JSON body.
    pub fn ok_json(body: &serde_json::Value) -> Self {
        HttpResponse::new(200, body.to_string())
    }

    /// Statuses the page treats as "has a body worth reading": 200..400.
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// Issues a single read-only GET request.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_200_to_399() {
        assert!(!HttpResponse::new(199, "").is_success());
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(302, "").is_success());
        assert!(HttpResponse::new(399, "").is_success());
        assert!(!HttpResponse::new(400, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
        assert!(!HttpResponse::new(0, "").is_success());
    }
}
