//! Base provider trait and common types for Formchat
//!
//! This module defines the `CompletionProvider` trait that every hosted model
//! client implements, along with the response and token usage types.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Token usage information from a completion
///
/// Tracks the number of tokens used in prompts and completions,
/// as reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use formchat::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Completion response with text and optional token usage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Full response text as returned by the provider (untrimmed)
    pub text: String,
    /// Optional token usage information
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a new CompletionResponse without usage data
    ///
    /// # Examples
    ///
    /// ```
    /// use formchat::providers::CompletionResponse;
    ///
    /// let response = CompletionResponse::new("Paris.");
    /// assert_eq!(response.text, "Paris.");
    /// assert!(response.usage.is_none());
    /// ```
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    /// Create a new CompletionResponse with token usage
    pub fn with_usage(text: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            text: text.into(),
            usage: Some(usage),
        }
    }
}

/// Provider trait for hosted completion models
///
/// A provider is a black box from prompt text to response text. Each call is
/// a single round trip: no streaming, no retries, no caching.
///
/// # Examples
///
/// ```no_run
/// use async_trait::async_trait;
/// use formchat::error::Result;
/// use formchat::providers::{CompletionProvider, CompletionResponse};
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl CompletionProvider for EchoProvider {
///     async fn complete(&self, prompt: &str) -> Result<CompletionResponse> {
///         Ok(CompletionResponse::new(prompt))
///     }
///
///     fn model(&self) -> String {
///         "echo".to_string()
///     }
/// }
/// ```
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Submit a rendered prompt and return the full response
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success HTTP status,
    /// a malformed body, or a provider-declared error.
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse>;

    /// Identifier of the model this provider submits to
    fn model(&self) -> String;
}
