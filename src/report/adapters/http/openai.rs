//! Chat-completions client for report text generation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::GenerationConfig;
use crate::report::ports::{GenerationError, GenerationRequest, ReportTextGenerator};

/// Generator backed by an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiChatGenerator {
    http: Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiChatGenerator {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Unconfigured`] when no usable API key is
    /// set, or [`GenerationError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let api_key = config
            .usable_api_key()
            .ok_or(GenerationError::Unconfigured)?
            .to_owned();
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.instruction },
                { "role": "user", "content": request.context },
                { "role": "user", "content": request.prompt },
            ],
            "temperature": self.temperature,
        })
    }
}

#[async_trait]
impl ReportTextGenerator for OpenAiChatGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<String>, GenerationError> {
        debug!(model = %self.model, url = %self.api_url, "requesting report text");

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "generation service rejected request");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.canonical_reason().unwrap_or_default().to_owned()
                } else {
                    body
                },
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| GenerationError::InvalidResponse(err.to_string()))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}
