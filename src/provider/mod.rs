//! Chat-completion provider catalog and registry for yuzu.
//!
//! Every provider speaks the same OpenAI-style chat-completions contract, so
//! a provider is just an endpoint, a credential file, and a model list. See
//! [`ProviderKind`] for the catalog and [`ProviderRegistry`] for credential
//! state.

mod kind;
mod registry;

pub use kind::ProviderKind;
pub use registry::{Provider, ProviderRegistry};
