//! Provider module for Formchat
//!
//! This module contains the completion provider abstraction and the
//! Gemini and Ollama implementations.

pub mod base;
pub mod gemini;
pub mod ollama;

pub use base::{CompletionProvider, CompletionResponse, TokenUsage};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

use crate::config::{CompletionConfig, Credentials};
use crate::error::{FormchatError, Result};

/// Create a provider instance based on configuration
///
/// # Errors
///
/// Returns error if the provider type is unknown, the Gemini key is missing,
/// or client initialization fails
pub fn create_provider(
    config: &CompletionConfig,
    credentials: &Credentials,
) -> Result<Box<dyn CompletionProvider>> {
    create_provider_with_override(config, credentials, None, None)
}

/// Create a provider instance with optional provider and model overrides
///
/// # Arguments
///
/// * `config` - Completion configuration
/// * `credentials` - Keys read from the environment
/// * `provider_override` - Optional provider type override ("gemini" or "ollama")
/// * `model_override` - Optional model name override
///
/// # Examples
///
/// ```
/// use formchat::config::{CompletionConfig, Credentials};
/// use formchat::providers::create_provider_with_override;
///
/// let config = CompletionConfig::default();
/// let creds = Credentials::new(Some("key".to_string()), None);
///
/// let gemini = create_provider_with_override(&config, &creds, None, None).unwrap();
/// assert_eq!(gemini.model(), "gemini-1.5-flash");
///
/// let ollama = create_provider_with_override(&config, &creds, Some("ollama"), Some("phi3")).unwrap();
/// assert_eq!(ollama.model(), "phi3");
/// ```
pub fn create_provider_with_override(
    config: &CompletionConfig,
    credentials: &Credentials,
    provider_override: Option<&str>,
    model_override: Option<&str>,
) -> Result<Box<dyn CompletionProvider>> {
    let provider_type = provider_override.unwrap_or(&config.provider_type);

    match provider_type {
        "gemini" => {
            let mut gemini_config = config.gemini.clone();
            if let Some(model) = model_override {
                gemini_config.model = model.to_string();
            }
            let api_key = credentials.completion_api_key.clone().ok_or_else(|| {
                FormchatError::MissingCredentials(crate::config::COMPLETION_API_KEY_VAR.to_string())
            })?;

            Ok(Box::new(GeminiProvider::new(gemini_config, api_key)?))
        }
        "ollama" => {
            let mut ollama_config = config.ollama.clone();
            if let Some(model) = model_override {
                ollama_config.model = model.to_string();
            }

            Ok(Box::new(OllamaProvider::new(ollama_config)?))
        }
        _ => Err(FormchatError::Provider(format!(
            "Unknown provider type: {}",
            provider_type
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new(Some("test-key".to_string()), None)
    }

    #[test]
    fn test_create_provider_default_is_gemini() {
        let provider = create_provider(&CompletionConfig::default(), &creds()).unwrap();
        assert_eq!(provider.model(), "gemini-1.5-flash");
    }

    #[test]
    fn test_create_provider_gemini_without_key_fails() {
        let result = create_provider(&CompletionConfig::default(), &Credentials::default());
        let err = result.err().unwrap();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_create_provider_ollama_without_key_succeeds() {
        let config = CompletionConfig {
            provider_type: "ollama".to_string(),
            ..CompletionConfig::default()
        };
        let provider = create_provider(&config, &Credentials::default()).unwrap();
        assert_eq!(provider.model(), "llama3.2:latest");
    }

    #[test]
    fn test_create_provider_invalid_type() {
        let config = CompletionConfig {
            provider_type: "invalid".to_string(),
            ..CompletionConfig::default()
        };
        assert!(create_provider(&config, &creds()).is_err());
    }

    #[test]
    fn test_create_provider_with_model_override() {
        let provider = create_provider_with_override(
            &CompletionConfig::default(),
            &creds(),
            None,
            Some("gemini-1.5-pro"),
        )
        .unwrap();
        assert_eq!(provider.model(), "gemini-1.5-pro");
    }

    #[test]
    fn test_create_provider_with_invalid_override() {
        let result =
            create_provider_with_override(&CompletionConfig::default(), &creds(), Some("x"), None);
        assert!(result.is_err());
    }
}
