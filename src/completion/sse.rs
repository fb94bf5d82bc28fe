//! Server-sent event decoding for streamed completions.
//!
//! Bytes arrive in arbitrary chunks; [`LineBuffer`] reassembles them into
//! lines and [`parse_line`] turns each line into an [`SseEvent`].

use crate::constants::{SSE_DATA_PREFIX, SSE_DONE};
use crate::error::ChatError;

use super::types::StreamChunk;

/// Meaning of a single event-stream line.
#[derive(Debug, PartialEq, Eq)]
pub enum SseEvent {
    /// Incremental assistant text.
    Content(String),
    /// The stream terminator.
    Done,
    /// Anything without content: comments, blank lines, role-only deltas.
    Ignore,
}

/// Reassembles newline-delimited lines from a byte stream.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    /// Appends bytes and returns every line completed by them, without
    /// the trailing `\n` or `\r\n`.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Returns the unterminated tail once the body has ended.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.buffer).trim_end_matches('\r').to_string();
        self.buffer.clear();
        Some(line)
    }
}

/// Interprets one event-stream line.
///
/// # Errors
///
/// Returns [`ChatError::Decode`] when a data payload is not valid chunk JSON.
pub fn parse_line(line: &str) -> Result<SseEvent, ChatError> {
    let Some(data) = line.strip_prefix(SSE_DATA_PREFIX) else {
        return Ok(SseEvent::Ignore);
    };
    let data = data.strip_prefix(' ').unwrap_or(data).trim();
    if data.is_empty() {
        return Ok(SseEvent::Ignore);
    }
    if data == SSE_DONE {
        return Ok(SseEvent::Done);
    }
    let chunk: StreamChunk = serde_json::from_str(data)
        .map_err(|err| ChatError::Decode(format!("failed to parse stream chunk: {err}")))?;
    Ok(chunk
        .first_content()
        .map(|text| SseEvent::Content(text.to_string()))
        .unwrap_or(SseEvent::Ignore))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_and_done() {
        assert_eq!(
            parse_line(r#"data: {"choices":[{"delta":{"content":"Hi"}}]}"#).unwrap(),
            SseEvent::Content("Hi".into())
        );
        assert_eq!(parse_line("data: [DONE]").unwrap(), SseEvent::Done);
        assert_eq!(parse_line("data:[DONE]").unwrap(), SseEvent::Done);
    }

    #[test]
    fn test_parse_ignores_non_data_lines() {
        assert_eq!(parse_line("").unwrap(), SseEvent::Ignore);
        assert_eq!(parse_line(": OPENROUTER PROCESSING").unwrap(), SseEvent::Ignore);
        assert_eq!(parse_line("event: message").unwrap(), SseEvent::Ignore);
    }

    #[test]
    fn test_parse_ignores_empty_deltas() {
        assert_eq!(
            parse_line(r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#).unwrap(),
            SseEvent::Ignore
        );
        assert_eq!(
            parse_line(r#"data: {"choices":[{"delta":{"content":""}}]}"#).unwrap(),
            SseEvent::Ignore
        );
        assert_eq!(
            parse_line(r#"data: {"choices":[],"usage":{"total_tokens":3}}"#).unwrap(),
            SseEvent::Ignore
        );
        assert_eq!(
            parse_line(r#"data: {"choices":[{"delta":{"content":null}}]}"#).unwrap(),
            SseEvent::Ignore
        );
    }

    #[test]
    fn test_parse_malformed_chunk() {
        assert!(matches!(parse_line("data: {oops"), Err(ChatError::Decode(_))));
    }

    #[test]
    fn test_line_buffer_reassembles_split_lines() {
        let mut buffer = LineBuffer::default();
        assert!(buffer.push(b"data: {\"cho").is_empty());
        let lines = buffer.push(b"ices\":[]}\r\ndata: [DO");
        assert_eq!(lines, vec!["data: {\"choices\":[]}".to_string()]);
        assert_eq!(buffer.push(b"NE]\n\n"), vec!["data: [DONE]".to_string(), String::new()]);
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn test_line_buffer_finish_returns_tail() {
        let mut buffer = LineBuffer::default();
        buffer.push(b"data: [DONE]");
        assert_eq!(buffer.finish().as_deref(), Some("data: [DONE]"));
        assert_eq!(buffer.finish(), None);
    }
}
