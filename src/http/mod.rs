//! Minimal HTTP transport abstraction.
//!
//! The completion client talks to providers through [`HttpTransport`] so the
//! exchange logic can be exercised against in-memory responses. The
//! production implementation lives in [`reqwest`](self::reqwest).

pub mod reqwest;

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;

use crate::error::ChatError;

/// A POST request with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    /// Header pairs in insertion order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Builds a POST request carrying `Content-Type: application/json`.
    pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
            timeout: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Value of the first header matching `name`, ignoring case.
    #[cfg(test)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A fully buffered response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Body stream returned by [`HttpTransport::send_stream`].
pub type HttpBodyStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, ChatError>> + Send>>;

/// A response whose body is consumed incrementally.
pub struct HttpStreamResponse {
    pub status: u16,
    pub body: HttpBodyStream,
}

/// Transport used to decouple the completion client from the HTTP library.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and resolves once the whole body has arrived.
    ///
    /// # Errors
    ///
    /// Connection failures and timeouts map to [`ChatError::Transport`].
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ChatError>;

    /// Sends a request and returns as soon as the status line is available.
    ///
    /// # Errors
    ///
    /// Connection failures and timeouts map to [`ChatError::Transport`].
    async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, ChatError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_json_sets_content_type() {
        let request = HttpRequest::post_json("https://example.com", b"{}".to_vec())
            .with_header("Authorization", "Bearer test");
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("authorization"), Some("Bearer test"));
        assert_eq!(request.header("x-title"), None);
    }

    #[test]
    fn test_success_range() {
        let ok = HttpResponse { status: 204, body: Vec::new() };
        let unauthorized = HttpResponse { status: 401, body: b"denied".to_vec() };
        assert!(ok.is_success());
        assert!(!unauthorized.is_success());
        assert_eq!(unauthorized.text(), "denied");
    }
}
