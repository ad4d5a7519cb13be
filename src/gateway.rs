//! Client for the hosted AI completion gateway.
//!
//! Speaks the OpenAI-compatible `chat/completions` protocol: one request per
//! call, no retries, first choice wins.

use crate::error::{BiopubsError, OptionExt, Result};
use crate::prompts::{system_prompt, RequestType};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

/// Default gateway base URL
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1";

/// Default model name
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable holding the gateway credential
pub const API_KEY_VAR: &str = "AI_GATEWAY_API_KEY";

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    /// Missing keys are reported per request, not at startup
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Speaker of a caller-supplied turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single caller-supplied conversational turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Speaker of a turn sent upstream. Only the framing turn is `System`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamRole {
    System,
    User,
    Assistant,
}

/// A conversational turn as submitted to the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpstreamMessage {
    pub role: UpstreamRole,
    pub content: String,
}

impl UpstreamMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: UpstreamRole::System, content: content.into() }
    }
}

impl From<&ChatMessage> for UpstreamMessage {
    fn from(message: &ChatMessage) -> Self {
        let role = match message.role {
            Role::User => UpstreamRole::User,
            Role::Assistant => UpstreamRole::Assistant,
        };
        Self { role, content: message.content.clone() }
    }
}

/// Request body sent upstream
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [UpstreamMessage],
}

/// OpenAI-compatible API response structures
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Prepend the system instruction for `request_type` to the caller's turns.
pub fn build_messages(
    request_type: RequestType,
    language: Option<&str>,
    messages: &[ChatMessage],
) -> Vec<UpstreamMessage> {
    let mut combined = Vec::with_capacity(messages.len() + 1);
    combined.push(UpstreamMessage::system(system_prompt(request_type, language)));
    combined.extend(messages.iter().map(UpstreamMessage::from));
    combined
}

/// Translate a non-2xx upstream status into an error.
fn upstream_failure(status: u16, body: String) -> BiopubsError {
    match status {
        429 => BiopubsError::RateLimited,
        402 => BiopubsError::CreditsDepleted,
        _ => BiopubsError::Gateway { status, body },
    }
}

/// Completion gateway client
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl GatewayClient {
    /// Create a new GatewayClient
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BiopubsError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Frame the conversation for `request_type` and ask for a completion.
    pub async fn respond(
        &self,
        request_type: RequestType,
        language: Option<&str>,
        messages: &[ChatMessage],
    ) -> Result<String> {
        let combined = build_messages(request_type, language, messages);
        debug!(
            request_type = ?request_type,
            language = language.unwrap_or_default(),
            turns = messages.len(),
            "Relaying conversation"
        );
        self.complete(&combined).await
    }

    /// Submit `messages` as-is and return the first completion's text.
    pub async fn complete(&self, messages: &[UpstreamMessage]) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| BiopubsError::Config(format!("{} is not configured", API_KEY_VAR)))?;

        let api_url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let request_body = ChatCompletionRequest {
            model: &self.config.model,
            messages,
        };

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(BiopubsError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = match status.as_u16() {
                429 | 402 => String::new(),
                _ => response.text().await.unwrap_or_default(),
            };
            let failure = upstream_failure(status.as_u16(), error_text);
            if let BiopubsError::Gateway { status, body } = &failure {
                error!(status = *status, body = %body, "AI Gateway error");
            } else {
                info!(status = status.as_u16(), "AI Gateway refused request");
            }
            return Err(failure);
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BiopubsError::Parse(format!("Failed to parse gateway response: {}", e)))?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_parse("Gateway response contained no completion")
    }
}
