//! Chat completion client with structured output.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint and asks for
//! a response matching a JSON schema, which is then parsed into a typed
//! model.

use crate::models::StructuredOutput;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Configuration for the LLM client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: String,
    pub model_name: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model_name: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            timeout_seconds: 120,
        }
    }
}

/// Message in the chat history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completions request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    strict: bool,
    schema: Value,
}

/// Chat completions response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

/// Client for structured chat completions.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http_client: reqwest::Client,
}

impl LlmClient {
    /// Create a new client.
    pub fn new(config: LlmConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Name of the model requests are sent to.
    pub fn model_name(&self) -> &str {
        &self.config.model_name
    }

    /// Send the messages and parse the reply into `T`.
    pub async fn complete<T: StructuredOutput>(&self, messages: &[ChatMessage]) -> Result<T> {
        let url = format!(
            "{}/chat/completions",
            self.config.api_url.trim_end_matches('/')
        );

        let request = ChatRequest {
            model: &self.config.model_name,
            messages,
            temperature: self.config.temperature,
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: T::SCHEMA_NAME,
                    strict: true,
                    schema: T::json_schema(),
                },
            },
        };

        debug!(
            "Requesting {} from {} ({} messages)",
            T::SCHEMA_NAME,
            self.config.model_name,
            messages.len()
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow::anyhow!("Request timed out after {}s", self.config.timeout_seconds)
                } else if e.is_connect() {
                    anyhow::anyhow!("Cannot connect to LLM API at {}", self.config.api_url)
                } else {
                    anyhow::anyhow!("Failed to send request: {}", e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("LLM API error {}: {}", status, body));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        parse_structured(chat_response)
    }
}

/// Extract and parse the structured content of the first choice.
fn parse_structured<T: StructuredOutput>(response: ChatResponse) -> Result<T> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("LLM returned no choices for {}", T::SCHEMA_NAME))?;

    if let Some(refusal) = choice.message.refusal {
        return Err(anyhow::anyhow!(
            "LLM refused to produce {}: {}",
            T::SCHEMA_NAME,
            refusal
        ));
    }

    let content = choice.message.content.ok_or_else(|| {
        anyhow::anyhow!(
            "LLM returned no content for {} (finish reason: {})",
            T::SCHEMA_NAME,
            choice.finish_reason.as_deref().unwrap_or("unknown")
        )
    })?;

    serde_json::from_str(&content)
        .with_context(|| format!("LLM output did not match the {} schema", T::SCHEMA_NAME))
}
