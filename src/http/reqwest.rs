//! [`HttpTransport`] backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Client;

use super::{HttpBodyStream, HttpRequest, HttpResponse, HttpStreamResponse, HttpTransport};
use crate::error::ChatError;

/// Default transport for provider requests.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport whose requests abort after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ChatError> {
        Client::builder()
            .timeout(timeout)
            .build()
            .map(|client| Self { client })
            .map_err(|err| ChatError::transport(format!("failed to create HTTP client: {err}")))
    }

    fn build_request(&self, request: HttpRequest) -> Result<reqwest::RequestBuilder, ChatError> {
        let mut builder = self.client.post(&request.url);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        for (name, value) in request.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| ChatError::transport(format!("invalid header name: {err}")))?;
            let header_value = HeaderValue::from_str(&value).map_err(|err| {
                ChatError::transport(format!("invalid header value for {header_name}: {err}"))
            })?;
            builder = builder.header(header_name, header_value);
        }
        Ok(builder.body(request.body))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ChatError> {
        let response = self
            .build_request(request)?
            .send()
            .await
            .map_err(|err| ChatError::transport(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| ChatError::transport(err.to_string()))?
            .to_vec();

        Ok(HttpResponse { status, body })
    }

    async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, ChatError> {
        let response = self
            .build_request(request)?
            .send()
            .await
            .map_err(|err| ChatError::transport(err.to_string()))?;

        let status = response.status().as_u16();
        let stream = response.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|err| ChatError::transport(err.to_string()))
        });
        let body: HttpBodyStream = Box::pin(stream);

        Ok(HttpStreamResponse { status, body })
    }
}
