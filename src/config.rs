//! Configuration management for Formchat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//!
//! API keys are never read from the configuration file. They come from the
//! process environment (optionally seeded from a `.env` file) and are checked
//! once at startup through [`Credentials::require`].

use crate::assistant::AssistantKind;
use crate::error::{FormchatError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Environment variable holding the Gemini API key
pub const COMPLETION_API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Environment variable holding the OpenWeatherMap API key
pub const WEATHER_API_KEY_VAR: &str = "OPENWEATHERMAP_API_KEY";

/// Provider types accepted in `completion.type`
pub const PROVIDER_TYPES: [&str; 2] = ["gemini", "ollama"];

/// Main configuration structure for Formchat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Completion provider configuration
    pub completion: CompletionConfig,
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Interactive chat settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Completion provider configuration
///
/// Specifies which hosted model to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Type of provider to use ("gemini" or "ollama")
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Google Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

fn default_provider_type() -> String {
    "gemini".to_string()
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            gemini: GeminiConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

/// Google Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model identifier
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Optional API base URL (useful for tests and proxies)
    ///
    /// When unset, the public `generativelanguage.googleapis.com/v1beta` base is used.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Optional cap on generated tokens
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_base: None,
            temperature: default_temperature(),
            max_output_tokens: None,
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
            temperature: default_temperature(),
        }
    }
}

/// Weather provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Optional API base URL; defaults to `api.openweathermap.org/data/2.5`
    #[serde(default)]
    pub api_base: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u64,
}

fn default_weather_timeout() -> u64 {
    30
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            timeout_seconds: default_weather_timeout(),
        }
    }
}

/// Interactive chat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Assistant used when `--assistant` is not given
    #[serde(default = "default_assistant")]
    pub default_assistant: String,
}

fn default_assistant() -> String {
    "passage".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_assistant: default_assistant(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            completion: CompletionConfig::default(),
            weather: WeatherConfig::default(),
            chat: ChatConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FormchatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| FormchatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("FORMCHAT_PROVIDER") {
            self.completion.provider_type = provider_type;
        }

        if let Ok(model) = std::env::var("FORMCHAT_GEMINI_MODEL") {
            self.completion.gemini.model = model;
        }

        if let Ok(api_base) = std::env::var("FORMCHAT_GEMINI_API_BASE") {
            self.completion.gemini.api_base = Some(api_base);
        }

        if let Ok(host) = std::env::var("FORMCHAT_OLLAMA_HOST") {
            self.completion.ollama.host = host;
        }

        if let Ok(model) = std::env::var("FORMCHAT_OLLAMA_MODEL") {
            self.completion.ollama.model = model;
        }

        if let Ok(temperature) = std::env::var("FORMCHAT_TEMPERATURE") {
            match temperature.parse::<f32>() {
                Ok(value) => {
                    self.completion.gemini.temperature = value;
                    self.completion.ollama.temperature = value;
                }
                Err(_) => {
                    tracing::warn!("Ignoring invalid FORMCHAT_TEMPERATURE: {}", temperature);
                }
            }
        }

        if let Ok(api_base) = std::env::var("FORMCHAT_WEATHER_API_BASE") {
            self.weather.api_base = Some(api_base);
        }

        if let Ok(assistant) = std::env::var("FORMCHAT_ASSISTANT") {
            self.chat.default_assistant = assistant;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        let (provider, model) = cli.command.provider_overrides();
        if let Some(provider) = provider {
            tracing::debug!("Using provider override: {}", provider);
            self.completion.provider_type = provider.to_string();
        }
        if let Some(model) = model {
            tracing::debug!("Using model override: {}", model);
            match self.completion.provider_type.as_str() {
                "ollama" => self.completion.ollama.model = model.to_string(),
                _ => self.completion.gemini.model = model.to_string(),
            }
        }
    }

    /// Resolve the assistant to use, preferring an explicit choice
    ///
    /// # Errors
    ///
    /// Returns error if the chosen or configured assistant name is unknown
    pub fn resolve_assistant(&self, requested: Option<&str>) -> Result<AssistantKind> {
        let name = requested.unwrap_or(&self.chat.default_assistant);
        AssistantKind::parse_str(name).map_err(|e| FormchatError::Config(e).into())
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.completion.provider_type.is_empty() {
            return Err(FormchatError::Config("Provider type cannot be empty".to_string()).into());
        }

        if !PROVIDER_TYPES.contains(&self.completion.provider_type.as_str()) {
            return Err(FormchatError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.completion.provider_type,
                PROVIDER_TYPES.join(", ")
            ))
            .into());
        }

        if self.completion.gemini.model.trim().is_empty() {
            return Err(
                FormchatError::Config("completion.gemini.model cannot be empty".to_string()).into(),
            );
        }

        if let Some(base) = &self.completion.gemini.api_base {
            if base.trim().is_empty() {
                return Err(FormchatError::Config(
                    "completion.gemini.api_base cannot be empty when set".to_string(),
                )
                .into());
            }
        }

        if self.completion.gemini.max_output_tokens == Some(0) {
            return Err(FormchatError::Config(
                "completion.gemini.max_output_tokens must be greater than 0".to_string(),
            )
            .into());
        }

        if self.completion.ollama.host.trim().is_empty()
            || self.completion.ollama.model.trim().is_empty()
        {
            return Err(FormchatError::Config(
                "completion.ollama.host and completion.ollama.model cannot be empty".to_string(),
            )
            .into());
        }

        for (name, temperature) in [
            ("completion.gemini.temperature", self.completion.gemini.temperature),
            ("completion.ollama.temperature", self.completion.ollama.temperature),
        ] {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(FormchatError::Config(format!(
                    "{} must be between 0.0 and 2.0",
                    name
                ))
                .into());
            }
        }

        if let Some(base) = &self.weather.api_base {
            if base.trim().is_empty() {
                return Err(FormchatError::Config(
                    "weather.api_base cannot be empty when set".to_string(),
                )
                .into());
            }
        }

        if self.weather.timeout_seconds == 0 {
            return Err(FormchatError::Config(
                "weather.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        self.resolve_assistant(None)?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

/// API keys supplied out-of-band through the environment
#[derive(Clone, Default)]
pub struct Credentials {
    /// Key for the completion provider (Gemini)
    pub completion_api_key: Option<String>,
    /// Key for the weather provider (OpenWeatherMap)
    pub weather_api_key: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Credentials")
            .field("completion_api_key", &redact(&self.completion_api_key))
            .field("weather_api_key", &redact(&self.weather_api_key))
            .finish()
    }
}

impl Credentials {
    /// Build credentials from explicit values; blank values count as absent
    pub fn new(completion_api_key: Option<String>, weather_api_key: Option<String>) -> Self {
        let non_blank = |key: Option<String>| key.filter(|k| !k.trim().is_empty());
        Self {
            completion_api_key: non_blank(completion_api_key),
            weather_api_key: non_blank(weather_api_key),
        }
    }

    /// Read credentials from the process environment
    pub fn from_env() -> Self {
        Self::new(
            std::env::var(COMPLETION_API_KEY_VAR).ok(),
            std::env::var(WEATHER_API_KEY_VAR).ok(),
        )
    }

    /// Check that every key needed by this provider and assistant is present
    ///
    /// Gemini needs `GOOGLE_API_KEY`; Ollama needs none. The weather assistant
    /// also needs `OPENWEATHERMAP_API_KEY`. All missing variables are named in
    /// a single error so the problem is reported once.
    ///
    /// # Examples
    ///
    /// ```
    /// use formchat::assistant::AssistantKind;
    /// use formchat::config::Credentials;
    ///
    /// let creds = Credentials::new(Some("key".into()), None);
    /// assert!(creds.require("gemini", AssistantKind::Sales).is_ok());
    /// assert!(creds.require("gemini", AssistantKind::Weather).is_err());
    /// ```
    pub fn require(&self, provider_type: &str, kind: AssistantKind) -> Result<()> {
        let mut missing = Vec::new();
        if provider_type == "gemini" && self.completion_api_key.is_none() {
            missing.push(COMPLETION_API_KEY_VAR);
        }
        if kind.uses_weather() && self.weather_api_key.is_none() {
            missing.push(WEATHER_API_KEY_VAR);
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(FormchatError::MissingCredentials(format!(
                "please set {} in your environment or .env file",
                missing.join(" and ")
            ))
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_VARS: [&str; 8] = [
        "FORMCHAT_PROVIDER",
        "FORMCHAT_GEMINI_MODEL",
        "FORMCHAT_GEMINI_API_BASE",
        "FORMCHAT_OLLAMA_HOST",
        "FORMCHAT_OLLAMA_MODEL",
        "FORMCHAT_TEMPERATURE",
        "FORMCHAT_WEATHER_API_BASE",
        "FORMCHAT_ASSISTANT",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.completion.provider_type, "gemini");
        assert_eq!(config.completion.gemini.model, "gemini-1.5-flash");
        assert!((config.completion.gemini.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.weather.timeout_seconds, 30);
        assert_eq!(config.chat.default_assistant, "passage");
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_provider() {
        let mut config = Config::default();
        config.completion.provider_type = "openai".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid provider type: openai"));
    }

    #[test]
    fn test_config_validation_empty_provider() {
        let mut config = Config::default();
        config.completion.provider_type = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_temperature_range() {
        let mut config = Config::default();
        config.completion.gemini.temperature = 2.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.completion.ollama.temperature = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_max_output_tokens() {
        let mut config = Config::default();
        config.completion.gemini.max_output_tokens = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_weather_timeout() {
        let mut config = Config::default();
        config.weather.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_unknown_assistant() {
        let mut config = Config::default();
        config.chat.default_assistant = "poetry".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
completion:
  type: ollama
  gemini:
    model: gemini-1.5-pro
    temperature: 0.2
  ollama:
    host: http://ollama.internal:11434
    model: mistral:latest
weather:
  api_base: http://localhost:9000
  timeout_seconds: 5
chat:
  default_assistant: sales
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.completion.provider_type, "ollama");
        assert_eq!(config.completion.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.completion.ollama.model, "mistral:latest");
        assert!((config.completion.ollama.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(
            config.weather.api_base.as_deref(),
            Some("http://localhost:9000")
        );
        assert_eq!(config.chat.default_assistant, "sales");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("completion: {}\n").unwrap();
        assert_eq!(config.completion.provider_type, "gemini");
        assert_eq!(config.weather.timeout_seconds, 30);
    }

    #[test]
    fn test_resolve_assistant_prefers_request() {
        let config = Config::default();
        assert_eq!(
            config.resolve_assistant(Some("weather")).unwrap(),
            AssistantKind::Weather
        );
        assert_eq!(
            config.resolve_assistant(None).unwrap(),
            AssistantKind::PassageQa
        );
        assert!(config.resolve_assistant(Some("nope")).is_err());
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        clear_env();
        let cli = crate::cli::Cli::default();
        let config = Config::load("/nonexistent/formchat.yaml", &cli).unwrap();
        assert_eq!(config.completion.provider_type, "gemini");
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_overrides_fields() {
        clear_env();
        std::env::set_var("FORMCHAT_PROVIDER", "ollama");
        std::env::set_var("FORMCHAT_OLLAMA_MODEL", "phi3:mini");
        std::env::set_var("FORMCHAT_TEMPERATURE", "0.3");
        std::env::set_var("FORMCHAT_WEATHER_API_BASE", "http://weather.test");
        std::env::set_var("FORMCHAT_ASSISTANT", "support");

        let mut config = Config::default();
        config.apply_env_vars();
        clear_env();

        assert_eq!(config.completion.provider_type, "ollama");
        assert_eq!(config.completion.ollama.model, "phi3:mini");
        assert!((config.completion.gemini.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(
            config.weather.api_base.as_deref(),
            Some("http://weather.test")
        );
        assert_eq!(config.chat.default_assistant, "support");
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_ignores_invalid_temperature() {
        clear_env();
        std::env::set_var("FORMCHAT_TEMPERATURE", "warm");

        let mut config = Config::default();
        config.apply_env_vars();
        clear_env();

        assert!((config.completion.gemini.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cli_provider_and_model_overrides() {
        use clap::Parser;

        let cli = crate::cli::Cli::try_parse_from([
            "formchat",
            "chat",
            "--provider",
            "ollama",
            "--model",
            "gemma2:2b",
        ])
        .unwrap();
        let mut config = Config::default();
        config.apply_cli_overrides(&cli);
        assert_eq!(config.completion.provider_type, "ollama");
        assert_eq!(config.completion.ollama.model, "gemma2:2b");
        assert_eq!(config.completion.gemini.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_credentials_require_gemini_key() {
        let creds = Credentials::new(None, None);
        let err = creds.require("gemini", AssistantKind::PassageQa).unwrap_err();
        assert!(err.to_string().contains(COMPLETION_API_KEY_VAR));
    }

    #[test]
    fn test_credentials_ollama_needs_no_key() {
        let creds = Credentials::new(None, None);
        assert!(creds.require("ollama", AssistantKind::Sales).is_ok());
    }

    #[test]
    fn test_credentials_weather_names_all_missing_keys() {
        let creds = Credentials::new(None, None);
        let err = creds.require("gemini", AssistantKind::Weather).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(COMPLETION_API_KEY_VAR));
        assert!(message.contains(WEATHER_API_KEY_VAR));
    }

    #[test]
    fn test_credentials_blank_counts_as_missing() {
        let creds = Credentials::new(Some("   ".to_string()), Some("w".to_string()));
        assert!(creds.completion_api_key.is_none());
        assert!(creds.require("gemini", AssistantKind::Weather).is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_keys() {
        let creds = Credentials::new(Some("secret-1".to_string()), Some("secret-2".to_string()));
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("secret-1"));
        assert!(!debug.contains("secret-2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
