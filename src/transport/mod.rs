//! Transport abstraction for portal requests.
//!
//! The submission engine only ever needs one thing from the network: send a
//! body with some headers to a URL and get back a status and a body. Keeping
//! that behind a trait lets the protocol run against a scripted transport in
//! tests.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

pub use http::HttpTransport;

/// An outbound POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl TransportRequest {
    pub fn post(url: Url, body: impl Into<String>) -> Self {
        Self {
            url,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network-level failure: no HTTP status was obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportFailure(pub String);

/// Trait for portal transport backends.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return whatever status the server answered with.
    ///
    /// Non-2xx statuses are not failures at this level.
    async fn post(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(TransportResponse::new(200, "").is_success());
        assert!(TransportResponse::new(204, "").is_success());
        assert!(!TransportResponse::new(302, "").is_success());
        assert!(!TransportResponse::new(500, "").is_success());
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let url = Url::parse("https://portal.edubox.com.br/").unwrap();
        let request = TransportRequest::post(url, "x").header("Content-Type", "text/plain");
        assert_eq!(request.header_value("content-type"), Some("text/plain"));
        assert_eq!(request.header_value("accept"), None);
    }
}
