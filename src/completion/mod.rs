//! Completion client: one HTTP exchange per user message.
//!
//! [`CompletionClient::send`] builds the request from the session, performs
//! the exchange in blocking or streaming mode, and folds a successful result
//! back into the session as a user turn plus an assistant turn. A failed
//! exchange leaves the session untouched.

mod sse;
mod types;


use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use tracing::{debug, warn};

use crate::error::{ChatError, ChatResult};
use crate::http::{HttpRequest, HttpStreamResponse, HttpTransport};
use crate::message::Role;
use crate::output::Renderer;
use crate::provider::ProviderKind;
use crate::request::{build_messages, ChatPayload};
use crate::session::Session;
use crate::tokens::{estimate_tokens, ReplyStats};

pub use types::Usage;

use sse::{parse_line, LineBuffer, SseEvent};
use types::CompletionResponse;

/// Result of a successful exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Full assistant text.
    pub text: String,
    pub stats: ReplyStats,
    /// The stream broke off after some content had arrived.
    pub interrupted: bool,
}

/// Sends messages to the session's current provider.
pub struct CompletionClient {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl CompletionClient {
    pub fn new(transport: Arc<dyn HttpTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Sends `message` with the session's context and records the exchange.
    ///
    /// In streaming mode each piece of content goes to `renderer` as it
    /// arrives; blocking mode never touches the renderer.
    ///
    /// # Errors
    ///
    /// Configuration, transport, status, and decode failures. None of them
    /// modify the session.
    pub async fn send(
        &self,
        session: &mut Session,
        message: &str,
        stream: bool,
        renderer: &mut dyn Renderer,
    ) -> ChatResult<Reply> {
        let request = self.build_request(session, message, stream)?;
        let start = Instant::now();

        let (text, stats, interrupted) = if stream {
            let (text, interrupted) = self.stream(request, renderer).await?;
            let stats = ReplyStats::Estimated {
                elapsed: start.elapsed(),
                tokens: estimate_tokens(&text),
            };
            (text, stats, interrupted)
        } else {
            let (text, usage) = self.complete(request).await?;
            let stats = ReplyStats::Reported {
                elapsed: start.elapsed(),
                usage,
            };
            (text, stats, false)
        };

        for (role, content) in [(Role::User, message), (Role::Assistant, text.as_str())] {
            if let Err(err) = session.record_turn(role, content) {
                warn!("{err}");
            }
        }

        Ok(Reply {
            text,
            stats,
            interrupted,
        })
    }

    fn build_request(
        &self,
        session: &Session,
        message: &str,
        stream: bool,
    ) -> ChatResult<HttpRequest> {
        let provider = session.active_provider()?;
        let messages = build_messages(session.system_prompt(), session.turns(), message);
        let payload = ChatPayload::new(session.model(), messages, stream);
        let body = serde_json::to_vec(&payload)
            .map_err(|err| ChatError::Decode(format!("failed to encode request: {err}")))?;

        debug!(
            provider = provider.kind.id(),
            model = session.model(),
            messages = payload.messages.len(),
            stream,
            "sending request"
        );

        Ok(authorized_request(
            provider.kind,
            &provider.base_url,
            provider.api_key(),
            body,
        )
        .with_timeout(self.timeout))
    }

    /// Single-shot exchange.
    async fn complete(&self, request: HttpRequest) -> ChatResult<(String, Usage)> {
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ChatError::Status {
                status: response.status,
                body: response.text(),
            });
        }
        let decoded: CompletionResponse = serde_json::from_slice(&response.body)
            .map_err(|err| ChatError::Decode(err.to_string()))?;
        let choice = decoded
            .choices
            .into_iter()
            .next()
            .ok_or(ChatError::EmptyResponse)?;
        Ok((
            choice.message.content.unwrap_or_default(),
            decoded.usage.unwrap_or_default(),
        ))
    }

    /// Event-stream exchange. Returns the accumulated text and whether the
    /// stream was cut short after content arrived.
    async fn stream(
        &self,
        request: HttpRequest,
        renderer: &mut dyn Renderer,
    ) -> ChatResult<(String, bool)> {
        let HttpStreamResponse { status, mut body } = self.transport.send_stream(request).await?;
        if !(200..300).contains(&status) {
            let mut bytes = Vec::new();
            while let Some(chunk) = body.next().await {
                match chunk {
                    Ok(chunk) => bytes.extend_from_slice(&chunk),
                    Err(_) => break,
                }
            }
            return Err(ChatError::Status {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let mut full_response = String::new();
        let mut lines = LineBuffer::default();
        let mut interrupted = false;
        let mut done = false;

        'read: while let Some(chunk) = body.next().await {
            let bytes = match chunk {
                Ok(bytes) => bytes,
                Err(err) if full_response.is_empty() => return Err(err),
                Err(err) => {
                    warn!("stream interrupted: {err}");
                    renderer.render_error(&err.to_string());
                    interrupted = true;
                    break;
                }
            };
            for line in lines.push(&bytes) {
                if accept_line(&line, &mut full_response, renderer) {
                    done = true;
                    break 'read;
                }
            }
        }
        if !done && !interrupted {
            if let Some(line) = lines.finish() {
                accept_line(&line, &mut full_response, renderer);
            }
        }

        renderer.render_done();
        Ok((full_response, interrupted))
    }
}

/// Applies one event line; returns `true` at the stream terminator.
fn accept_line(line: &str, full_response: &mut String, renderer: &mut dyn Renderer) -> bool {
    match parse_line(line) {
        Ok(SseEvent::Content(text)) => {
            renderer.render_token(&text);
            full_response.push_str(&text);
            false
        }
        Ok(SseEvent::Done) => true,
        Ok(SseEvent::Ignore) => false,
        Err(err) => {
            warn!("skipping chunk: {err}");
            false
        }
    }
}

/// POST with bearer auth plus any provider-specific headers.
fn authorized_request(kind: ProviderKind, url: &str, api_key: &str, body: Vec<u8>) -> HttpRequest {
    let mut request = HttpRequest::post_json(url, body)
        .with_header("Authorization", format!("Bearer {api_key}"));
    for (name, value) in kind.extra_headers() {
        request = request.with_header(name, value);
    }
    request
}
