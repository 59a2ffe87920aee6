use std::time::Duration;

use logos_core::{LlmConfig, LogosError};
use serde::{Deserialize, Serialize};

use crate::prompt::CompletionRequest;

/// A message in a chat conversation with the LLM.
///
/// # Examples
///
/// ```
/// use logos_pm::llm::{ChatMessage, Role};
///
/// let msg = ChatMessage {
///     role: Role::User,
///     content: "Draft a plan".into(),
/// };
/// assert!(matches!(msg.role, Role::User));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: Role,
    /// Text content of the message.
    pub content: String,
}

/// Role in the chat conversation.
///
/// # Examples
///
/// ```
/// use logos_pm::llm::Role;
///
/// let role = Role::System;
/// assert_eq!(serde_json::to_string(&role).unwrap(), "\"system\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Persona and standing instructions.
    System,
    /// Task input.
    User,
    /// Model response.
    Assistant,
}

/// OpenAI-compatible chat completions client.
///
/// Works with any provider that exposes the `/v1/chat/completions` endpoint:
/// OpenAI, Ollama, vLLM, LiteLLM, etc. One request per agent run; there is
/// no retry, so a failure here fails the run.
///
/// # Examples
///
/// ```
/// use logos_core::LlmConfig;
/// use logos_pm::llm::LlmClient;
///
/// let config = LlmConfig {
///     api_key: Some("test-key".into()),
///     ..LlmConfig::default()
/// };
/// let client = LlmClient::new(&config).unwrap();
/// assert_eq!(client.model(), "gpt-4o");
/// ```
pub struct LlmClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new LLM client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LogosError::Llm`] if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, LogosError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| LogosError::Llm(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Return the model name from the configuration.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send one completion request and return the text response.
    ///
    /// Posts to `{base_url}/v1/chat/completions` with the request's persona
    /// as the system message, its instruction as the user message, and its
    /// generation parameters. The credential is checked before anything is
    /// sent; a run that cannot authenticate never reaches the network.
    ///
    /// # Errors
    ///
    /// Returns [`LogosError::Config`] when no credential is available,
    /// [`LogosError::Llm`] on HTTP errors or response parsing failures.
    pub async fn chat(&self, request: &CompletionRequest) -> Result<String, LogosError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(LogosError::Config(format!(
                "{} is not set and the config file has no api_key",
                self.config.credential_env_var()
            )));
        };

        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com");
        let url = format!("{base_url}/v1/chat/completions");

        let body = build_body(&self.config.model, request);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LogosError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(LogosError::Llm(format!(
                "LLM API error {status}: {body_text}"
            )));
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LogosError::Llm(format!("failed to parse response: {e}")))?;

        let content = response_body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                LogosError::Llm(format!("unexpected response structure: {response_body}"))
            })?;

        Ok(content.to_string())
    }
}

fn build_body(model: &str, request: &CompletionRequest) -> serde_json::Value {
    let messages = vec![
        ChatMessage {
            role: Role::System,
            content: request.system.clone(),
        },
        ChatMessage {
            role: Role::User,
            content: request.user.clone(),
        },
    ];

    let mut body = serde_json::json!({
        "model": model,
        "messages": messages,
        "temperature": request.params.temperature,
        "max_tokens": request.params.max_tokens,
    });
    if request.params.json_mode {
        body["response_format"] = serde_json::json!({ "type": "json_object" });
    }
    body
}
