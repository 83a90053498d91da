//! Google Gemini provider implementation for Formchat
//!
//! Submits a rendered prompt as a single user turn to the Gemini
//! `generateContent` endpoint and returns the first candidate's text.

use crate::config::GeminiConfig;
use crate::error::{FormchatError, Result};
use crate::providers::{CompletionProvider, CompletionResponse, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public Gemini API base
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API provider
///
/// # Examples
///
/// ```no_run
/// use formchat::config::GeminiConfig;
/// use formchat::providers::{CompletionProvider, GeminiProvider};
///
/// # async fn example() -> formchat::error::Result<()> {
/// let provider = GeminiProvider::new(GeminiConfig::default(), "api-key")?;
/// let response = provider.complete("Say hello").await?;
/// println!("{}", response.text);
/// # Ok(())
/// # }
/// ```
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

/// Error body returned by Google APIs
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// # Errors
    ///
    /// Returns error if the API key is blank or the HTTP client cannot be built
    pub fn new(config: GeminiConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FormchatError::MissingCredentials(
                crate::config::COMPLETION_API_KEY_VAR.to_string(),
            )
            .into());
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .user_agent(concat!("formchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FormchatError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Gemini provider: model={}, temperature={}",
            config.model,
            config.temperature
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(GEMINI_API_BASE)
            .trim_end_matches('/');
        format!("{}/models/{}:generateContent", base, self.config.model)
    }

    fn build_request<'a>(&self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        }
    }
}

/// Turn a non-success body into a readable description
fn describe_error_body(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.error.message.is_empty() => match parsed.error.status {
            Some(code) => format!(
                "Gemini returned error {} ({}): {}",
                status, code, parsed.error.message
            ),
            None => format!("Gemini returned error {}: {}", status, parsed.error.message),
        },
        _ => format!("Gemini returned error {}: {}", status, body.trim()),
    }
}

/// Extract the text of the first candidate
fn extract_text(response: GenerateResponse) -> Result<CompletionResponse> {
    let usage = response
        .usage_metadata
        .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count));

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("Gemini blocked the prompt: {}", r))
            .unwrap_or_else(|| "Gemini returned no candidates".to_string());
        return Err(FormchatError::Provider(reason).into());
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let detail = candidate
            .finish_reason
            .map(|r| format!(" (finish reason: {})", r))
            .unwrap_or_default();
        return Err(FormchatError::Provider(format!(
            "Gemini returned an empty response{}",
            detail
        ))
        .into());
    }

    Ok(match usage {
        Some(usage) => CompletionResponse::with_usage(text, usage),
        None => CompletionResponse::new(text),
    })
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse> {
        let url = self.endpoint();
        let request = self.build_request(prompt);

        tracing::debug!(
            "Sending Gemini request: model={}, prompt_chars={}",
            self.config.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                FormchatError::Provider(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let description = describe_error_body(status, &error_text);
            tracing::error!("{}", description);
            return Err(FormchatError::Provider(description).into());
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            FormchatError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        let completion = extract_text(body)?;
        if let Some(usage) = completion.usage {
            tracing::debug!(
                "Gemini response: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        Ok(completion)
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}
