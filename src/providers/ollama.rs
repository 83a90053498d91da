//! Ollama provider implementation for Formchat
//!
//! This module implements `CompletionProvider` for Ollama, connecting to a
//! local or remote Ollama server through its `/api/generate` endpoint. No
//! credential is needed.

use crate::config::OllamaConfig;
use crate::error::{FormchatError, Result};
use crate::providers::{CompletionProvider, CompletionResponse, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama API provider
///
/// # Examples
///
/// ```
/// use formchat::config::OllamaConfig;
/// use formchat::providers::OllamaProvider;
///
/// let config = OllamaConfig {
///     host: "http://localhost:11434".to_string(),
///     model: "llama3.2:latest".to_string(),
///     temperature: 0.7,
/// };
/// let provider = OllamaProvider::new(config);
/// assert!(provider.is_ok());
/// ```
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

/// Request structure for Ollama's /api/generate
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response structure from Ollama's /api/generate
#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent(concat!("formchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FormchatError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Ollama provider: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.config.host
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse> {
        let url = format!("{}/api/generate", self.config.host.trim_end_matches('/'));
        let request = OllamaGenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
            },
        };

        tracing::debug!(
            "Sending Ollama request: model={}, prompt_chars={}",
            self.config.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                FormchatError::Provider(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(FormchatError::Provider(format!(
                "Ollama returned error {}: {}",
                status,
                error_text.trim()
            ))
            .into());
        }

        let body: OllamaGenerateResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            FormchatError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        tracing::debug!(
            "Ollama response: done={}, prompt_tokens={}, completion_tokens={}",
            body.done,
            body.prompt_eval_count,
            body.eval_count
        );

        if body.response.trim().is_empty() {
            return Err(
                FormchatError::Provider("Ollama returned an empty response".to_string()).into(),
            );
        }

        let response = if body.prompt_eval_count > 0 || body.eval_count > 0 {
            CompletionResponse::with_usage(
                body.response,
                TokenUsage::new(body.prompt_eval_count, body.eval_count),
            )
        } else {
            CompletionResponse::new(body.response)
        };

        Ok(response)
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}
