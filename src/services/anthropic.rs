// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Anthropic Messages API client for the chat assistant.
//!
//! One call per chat turn: system prompt + serialized workout context in,
//! the model's text reply out. No retry, no streaming; a slow or failed
//! call propagates as a slow or failed HTTP response. A closure-based mock
//! backend keeps the chat pipeline testable without network access.

use crate::error::AppError;
use serde::Deserialize;
use std::sync::Arc;

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

type MockFn = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

#[derive(Clone)]
enum ModelBackend {
    Api {
        http: reqwest::Client,
        base_url: String,
        api_key: String,
        model: String,
    },
    Mock {
        responder: MockFn,
    },
}

/// Language-model client.
#[derive(Clone)]
pub struct AnthropicClient {
    backend: ModelBackend,
}

impl AnthropicClient {
    /// Create a client against the real Anthropic API.
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            backend: ModelBackend::Api {
                http: reqwest::Client::new(),
                base_url: ANTHROPIC_BASE_URL.to_string(),
                api_key,
                model,
            },
        }
    }

    /// Create a mock client whose reply is produced by `responder(system, user)`.
    pub fn new_mock_fn(responder: impl Fn(&str, &str) -> String + Send + Sync + 'static) -> Self {
        Self {
            backend: ModelBackend::Mock {
                responder: Arc::new(responder),
            },
        }
    }

    /// Run one completion and return the model's text output.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, AppError> {
        match &self.backend {
            ModelBackend::Api {
                http,
                base_url,
                api_key,
                model,
            } => {
                let url = format!("{}/v1/messages", base_url);
                let body = serde_json::json!({
                    "model": model,
                    "max_tokens": MAX_TOKENS,
                    "system": system,
                    "messages": [{"role": "user", "content": user}],
                });

                let response = http
                    .post(&url)
                    .header("x-api-key", api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| AppError::ModelApi(e.to_string()))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::ModelApi(format!("HTTP {}: {}", status, body)));
                }

                let reply: MessagesResponse = response
                    .json()
                    .await
                    .map_err(|e| AppError::ModelApi(format!("JSON parse error: {}", e)))?;

                reply
                    .content
                    .into_iter()
                    .find_map(|block| match block {
                        ContentBlock::Text { text } => Some(text),
                        ContentBlock::Other => None,
                    })
                    .ok_or_else(|| {
                        AppError::ModelApi("No text content in model response".to_string())
                    })
            }
            ModelBackend::Mock { responder } => Ok(responder(system, user)),
        }
    }
}

/// Messages API response body (only the fields we read).
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend_round_trip() {
        let client = AnthropicClient::new_mock_fn(|system, user| {
            format!("system_len={} user_len={}", system.len(), user.len())
        });

        let reply = client.complete("abc", "defg").await.unwrap();
        assert_eq!(reply, "system_len=3 user_len=4");
    }

    #[test]
    fn test_messages_response_takes_first_text_block() {
        let raw = r#"{
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "hello"},
                {"type": "text", "text": "ignored"}
            ]
        }"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        let text = parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .unwrap();
        assert_eq!(text, "hello");
    }
}
