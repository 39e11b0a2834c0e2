//! Chat-completion client for OpenAI-compatible services (OpenRouter by default).

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::error::ChatError;
use crate::config::AiSettings;

/// A single-turn prompt and its sampling temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub prompt: String,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            temperature,
        }
    }
}

/// Something that turns a prompt into the model's first text segment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String, ChatError>;
}

/// Credential for the chat service. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Reads the key from `var`, treating an unset or blank variable as absent.
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Self)
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Client bound to one endpoint, model and key.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: ApiKey,
}

impl OpenRouterClient {
    pub fn new(settings: &AiSettings, api_key: ApiKey) -> Result<Self, ChatError> {
        if api_key.expose().trim().is_empty() {
            return Err(ChatError::MissingApiKey);
        }

        let base_url = settings.endpoint.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ChatError::InvalidEndpoint {
            endpoint: settings.endpoint.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| ChatError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            model: settings.model.clone(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatBackend for OpenRouterClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, ChatError> {
        let api_request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![CompletionMessage {
                role: "user".to_string(),
                content: Some(request.prompt),
            }],
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose())
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ChatError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| ChatError::RequestFailed(e.to_string()))?;
            return Err(ChatError::Status {
                status,
                body: service_message(&body),
            });
        }

        let api_response: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

        first_text(api_response)
    }
}

fn first_text(response: CompletionResponse) -> Result<String, ChatError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ChatError::InvalidResponse("no choices in response".to_string()))?;

    choice.message.content.ok_or(ChatError::EmptyResponse)
}

/// OpenAI-style error bodies carry `{"error": {"message": ...}}`; anything
/// else is passed through as is.
fn service_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<CompletionMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct CompletionMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}
