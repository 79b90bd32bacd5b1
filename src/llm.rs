//! Chat-completion client for the analysis request.
//!
//! Issues exactly one POST per invocation with a fixed two-message payload.
//! No retry, no streaming.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Serialize;

const SYSTEM_PROMPT: &str =
    "You are a helpful, concise assistant for security-minded command analysis.";

const MAX_TOKENS: u32 = 800;

/// Client for a chat-completion endpoint.
pub struct LlmClient {
    api_url: String,
    api_key: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

impl LlmClient {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            api_url,
            api_key,
            client: Client::new(),
        }
    }

    /// Send the prompt and return the model's answer text.
    ///
    /// Non-2xx responses are hard errors carrying the status and body.
    pub async fn analyze(
        &self,
        model: &str,
        prompt: &str,
        timeout: Duration,
        temperature: f32,
    ) -> Result<String> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .timeout(timeout)
            .send()
            .await
            .context("Failed to reach LLM endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("LLM request failed with status {}: {}", status, body));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse LLM response body")?;

        Ok(extract_answer(&body))
    }
}

/// Pull the answer text out of a chat-completion response.
///
/// Falls back through older response shapes before dumping the raw body:
/// `choices[0].message.content`, then `choices[0].text`, then a top-level
/// `text` field, then the pretty-printed body itself.
pub fn extract_answer(body: &serde_json::Value) -> String {
    if let Some(choice) = body
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
    {
        if let Some(content) = choice
            .pointer("/message/content")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
        {
            return content.to_string();
        }
        if let Some(text) = choice.get("text").and_then(|v| v.as_str()) {
            return text.to_string();
        }
    }

    if let Some(text) = body.get("text").and_then(|v| v.as_str()) {
        return text.to_string();
    }

    serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
}
