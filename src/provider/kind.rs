//! Provider kind enumeration and the compiled-in provider catalog.
//!
//! Defines [`ProviderKind`] which identifies which chat-completion endpoint to
//! use, and the static [`ProviderSpec`] table each kind resolves to.

use std::str::FromStr;

use crate::error::ChatError;

/// Identifies which chat-completion provider to use.
///
/// Declaration order is registry order, which decides failover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderKind {
    /// Chutes AI.
    Chutes,
    /// OpenRouter (multi-provider gateway).
    OpenRouter,
    /// Cerebras inference cloud.
    Cerebras,
}

/// Immutable catalog entry for a provider.
#[derive(Debug)]
pub struct ProviderSpec {
    pub name: &'static str,
    pub base_url: &'static str,
    pub key_file: &'static str,
    pub models: &'static [&'static str],
}

static CHUTES: ProviderSpec = ProviderSpec {
    name: "Chutes AI",
    base_url: "https://llm.chutes.ai/v1/chat/completions",
    key_file: "cu.key",
    models: &[
        "deepseek-ai/DeepSeek-V3-0324",
        "deepseek-ai/DeepSeek-V3.1-Terminus",
        "tngtech/DeepSeek-R1T-Chimera",
        "tngtech/DeepSeek-R1T2-Chimera",
        "Qwen/Qwen3-235B-A22B-Instruct",
        "Qwen/Qwen3-VL-235B-A22B-Thinking",
        "Qwen/Qwen3-Coder-480B-A35B-Instruct-FP8",
        "zai-org/GLM-4.5-FP8",
        "zai-org/GLM-4.6-FP8",
        "deepseek-ai/DeepSeek-R1",
    ],
};

static OPENROUTER: ProviderSpec = ProviderSpec {
    name: "OpenRouter",
    base_url: "https://openrouter.ai/api/v1/chat/completions",
    key_file: "or.key",
    models: &[
        "tngtech/deepseek-r1t2-chimera:free",
        "z_ai/glm-4.5-air:free",
        "tngtech/deepseek-r1t-chimera:free",
        "deepseek/deepseek-v3:free",
        "deepseek/r1:free",
        "qwen/qwen3-235b-a22b:free",
        "meituan/longcat-flash-chat:free",
    ],
};

static CEREBRAS: ProviderSpec = ProviderSpec {
    name: "Cerebras",
    base_url: "https://api.cerebras.ai/v1/chat/completions",
    key_file: "ce.key",
    models: &[
        "qwen-3-235b-a22b-instruct-2507",
        "qwen-3-235b-a22b-thinking-2507",
        "qwen-3-coder-480b",
        "qwen-3-32b",
        "gpt-oss-120b",
        "llama-3.3-70b",
        "llama-4-scout-17b-16e-instruct",
        "llama3.1-8b",
    ],
};

impl ProviderKind {
    /// Every provider, in registry order.
    pub const ALL: [ProviderKind; 3] = [Self::Chutes, Self::OpenRouter, Self::Cerebras];

    /// Stable identifier used in commands and persisted files.
    pub fn id(self) -> &'static str {
        match self {
            Self::Chutes => "chutes",
            Self::OpenRouter => "openrouter",
            Self::Cerebras => "cerebras",
        }
    }

    /// Catalog entry for this provider.
    pub fn spec(self) -> &'static ProviderSpec {
        match self {
            Self::Chutes => &CHUTES,
            Self::OpenRouter => &OPENROUTER,
            Self::Cerebras => &CEREBRAS,
        }
    }

    /// Extra request headers this provider expects.
    pub fn extra_headers(self) -> Vec<(&'static str, &'static str)> {
        match self {
            Self::OpenRouter => vec![
                ("HTTP-Referer", crate::constants::OPENROUTER_REFERER),
                ("X-Title", crate::constants::OPENROUTER_TITLE),
            ],
            _ => Vec::new(),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ChatError;

    /// Matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChatError::UnknownProvider(s.to_string()))
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
