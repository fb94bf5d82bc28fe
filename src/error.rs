//! Error type for the provider and session core.
//!
//! Every variant is recoverable: the REPL prints it and keeps going.

use std::io;

use thiserror::Error;

/// Failures surfaced by the session, registry, and completion client.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The provider identifier is not in the catalog.
    #[error("provider '{0}' not found. Use /providers to see available.")]
    UnknownProvider(String),
    /// The provider exists but has no credential.
    #[error("provider '{provider}' is not enabled (no API key in {key_file})")]
    ProviderDisabled {
        provider: String,
        key_file: &'static str,
    },
    /// No provider is currently selected.
    #[error("no provider is enabled. Use /key <provider> <api_key> to add one.")]
    NoProvider,
    /// No model of the current provider matches the query.
    #[error("model '{0}' not found. Use /models to see available.")]
    ModelNotFound(String),
    /// An empty secret was supplied.
    #[error("API key cannot be empty")]
    EmptyCredential,
    /// A local file could not be read, written, or removed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    /// Connection failure or timeout.
    #[error("request failed: {0}")]
    Transport(String),
    /// The provider answered with a non-2xx status.
    #[error("error {status}: {body}")]
    Status { status: u16, body: String },
    /// The provider answered with a body that could not be decoded.
    #[error("response parsing failed: {0}")]
    Decode(String),
    /// The provider answered without any choice.
    #[error("no response from AI")]
    EmptyResponse,
}

impl ChatError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
