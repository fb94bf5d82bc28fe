//! Request payload construction.
//!
//! The provider must see context strictly in chronological order with the
//! system directive first: system prompt (if any), then every stored turn,
//! then the new user message.

use serde::Serialize;

use crate::constants::{MAX_TOKENS, TEMPERATURE};
use crate::message::{ChatMessage, Turn};

/// JSON body of a chat-completions request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatPayload {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

/// Ordered message list for a new user message.
pub fn build_messages(system_prompt: &str, history: &[Turn], user_message: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    if !system_prompt.is_empty() {
        messages.push(ChatMessage::system(system_prompt));
    }
    messages.extend(history.iter().map(ChatMessage::from));
    messages.push(ChatMessage::user(user_message));
    messages
}

impl ChatPayload {
    pub fn new(model: &str, messages: Vec<ChatMessage>, stream: bool) -> Self {
        Self {
            model: model.to_string(),
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    fn turn(role: Role, content: &str) -> Turn {
        Turn {
            role,
            content: content.into(),
            timestamp: String::new(),
            model: String::new(),
            provider: String::new(),
        }
    }

    #[test]
    fn test_order_system_history_user() {
        let history = vec![turn(Role::User, "q1"), turn(Role::Assistant, "a1")];
        let messages = build_messages("be brief", &history, "q2");
        let pairs: Vec<(Role, &str)> = messages
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (Role::System, "be brief"),
                (Role::User, "q1"),
                (Role::Assistant, "a1"),
                (Role::User, "q2"),
            ]
        );
    }

    #[test]
    fn test_empty_system_prompt_is_omitted() {
        let messages = build_messages("", &[], "hello");
        assert_eq!(messages, vec![ChatMessage::user("hello")]);
    }

    #[test]
    fn test_payload_json_shape() {
        let payload = ChatPayload::new("llama-3.3-70b", build_messages("", &[], "hi"), true);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["model"], "llama-3.3-70b");
        assert_eq!(value["max_tokens"], 2048);
        assert_eq!(value["stream"], true);
        assert!((value["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hi");
    }
}
