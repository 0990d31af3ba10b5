//! Wire types for the OpenAI-style `chat/completions` endpoint.

use bragi_types::ModelConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ApiError;

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl ChatCompletionRequest {
    /// A single user prompt with JSON-object output enforced.
    pub fn json_prompt(prompt: &str, config: &ModelConfig) -> Self {
        Self {
            messages: vec![ChatMessage::user(prompt)],
            model: config.model.clone(),
            temperature: Some(config.temperature),
            max_tokens: config.max_tokens,
            top_p: config.top_p,
            response_format: Some(ResponseFormat::json_object()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
        }
    }
}

/// Requested output format, e.g. `{"type": "json_object"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            kind: "json_object".to_string(),
        }
    }
}

/// The subset of the provider response the client reads.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if the provider returned one.
    ///
    /// A choice with no content yields an empty string rather than `None`.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_deref().unwrap_or(""))
    }
}

/// Parse model output as a JSON object.
///
/// Empty output is treated as `{}` so every field falls back to its default
/// downstream. Anything other than an object is rejected.
pub fn parse_json_content(content: &str) -> Result<Value, ApiError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    match serde_json::from_str::<Value>(trimmed).map_err(ApiError::InvalidJson)? {
        value @ Value::Object(_) => Ok(value),
        _ => Err(ApiError::NotAnObject),
    }
}
