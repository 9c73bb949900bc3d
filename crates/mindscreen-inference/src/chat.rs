//! Chat-completion wire types and per-model sampling profiles.

use serde::{Deserialize, Serialize};

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A candidate model and the sampling parameters it is called with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Model identifier as the endpoint expects it, e.g. `openai/gpt-4o`.
    pub id: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl ModelProfile {
    pub fn new(id: impl Into<String>, temperature: f32, top_p: f32, max_tokens: u32) -> Self {
        Self {
            id: id.into(),
            temperature,
            top_p,
            max_tokens,
        }
    }

    /// Default analysis models in priority order.
    pub fn analysis_defaults() -> Vec<ModelProfile> {
        vec![
            ModelProfile::new("openai/gpt-4o", 0.7, 0.9, 2048),
            ModelProfile::new("deepseek/DeepSeek-V3-0324", 0.8, 0.1, 2048),
        ]
    }

    /// Default model for location resource lookups. Low temperature for
    /// factual listings.
    pub fn location_default() -> ModelProfile {
        ModelProfile::new("deepseek/DeepSeek-V3-0324", 0.3, 0.1, 2048)
    }
}

/// Request body for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(profile: &ModelProfile, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: profile.id.clone(),
            messages,
            temperature: profile.temperature,
            top_p: profile.top_p,
            max_tokens: profile.max_tokens,
        }
    }
}

/// The subset of the completion response we read.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatResponseRaw {
    #[serde(default)]
    pub choices: Vec<ChatChoiceRaw>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatChoiceRaw {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponseRaw {
    /// Text of the first choice, if present and non-blank.
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let profile = ModelProfile::new("openai/gpt-4o", 0.7, 0.9, 2048);
        let req = ChatRequest::new(
            &profile,
            vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
        );
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "openai/gpt-4o");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["max_tokens"], 2048);
    }

    #[test]
    fn first_content_skips_blank() {
        let raw: ChatResponseRaw =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert!(raw.first_content().is_none());

        let raw: ChatResponseRaw =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"{}"}}]}"#).unwrap();
        assert_eq!(raw.first_content().as_deref(), Some("{}"));

        let raw: ChatResponseRaw = serde_json::from_str(r#"{}"#).unwrap();
        assert!(raw.first_content().is_none());
    }
}
