//! Centralized constants for yuzu.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "yuzu";

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Readline history filename (cache dir).
pub const READLINE_HISTORY_FILENAME: &str = "readline_history.txt";

// --- Persisted session files (data dir) ---

/// Conversation history document.
pub const HISTORY_FILENAME: &str = "chat_history.json";

/// Profile document holding the current provider and model.
pub const PROFILE_FILENAME: &str = "profile.json";

/// Plain-text system prompt.
pub const SYSTEM_PROMPT_FILENAME: &str = "system.txt";

/// Maximum number of turns kept in the conversation log.
pub const HISTORY_LIMIT: usize = 20;

// --- Session defaults ---

/// Provider selected when no profile exists.
pub const DEFAULT_PROVIDER: &str = "chutes";

/// Model selected when no profile exists.
pub const DEFAULT_MODEL: &str = "deepseek-ai/DeepSeek-V3-0324";

// --- Request payload ---

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f32 = 0.7;

/// Maximum output tokens sent with every request.
pub const MAX_TOKENS: u32 = 2048;

/// Default request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

// --- Streaming ---

/// Prefix marking a server-sent event data line.
pub const SSE_DATA_PREFIX: &str = "data:";

/// Payload terminating an event stream.
pub const SSE_DONE: &str = "[DONE]";

/// Characters per token used for the streaming throughput estimate.
pub const CHARS_PER_TOKEN: usize = 4;

// --- Provider-specific headers ---

/// `HTTP-Referer` sent to OpenRouter.
pub const OPENROUTER_REFERER: &str = "https://github.com/icedeyes12/hkkm-yuzu";

/// `X-Title` sent to OpenRouter.
pub const OPENROUTER_TITLE: &str = "Yuzu-Prototype";
