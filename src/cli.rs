//! Command-line interface definition for Formchat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions, and
//! weather lookups.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Formchat - conversational assistants over hosted language models
///
/// Chat with a passage QA bot, a weather-based event planner, a customer
/// care agent, or a sales agent.
#[derive(Parser, Debug, Clone)]
#[command(name = "formchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Formchat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Assistant to talk to (passage, weather, support, sales)
        #[arg(short, long)]
        assistant: Option<String>,

        /// Override the provider from config (gemini, ollama)
        #[arg(short, long)]
        provider: Option<String>,

        /// Override the model from config
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Ask a single question and print the answer
    Ask {
        /// Assistant to ask (passage, weather, support, sales)
        #[arg(short, long)]
        assistant: String,

        /// Passage or problem description to use as context
        #[arg(long, conflicts_with = "context_file")]
        context: Option<String>,

        /// Read the context from a file
        #[arg(long)]
        context_file: Option<PathBuf>,

        /// Product to sell (sales assistant)
        #[arg(long)]
        subject: Option<String>,

        /// Place to look up weather for (weather assistant)
        #[arg(long)]
        place: Option<String>,

        /// Override the provider from config (gemini, ollama)
        #[arg(short, long)]
        provider: Option<String>,

        /// Override the model from config
        #[arg(short, long)]
        model: Option<String>,

        /// The question to ask
        question: String,
    },

    /// Show current weather conditions for a place
    Weather {
        /// Place name, e.g. "Goa" or "London,GB"
        place: String,
    },
}

impl Commands {
    /// Provider and model overrides given on the command line
    pub fn provider_overrides(&self) -> (Option<&str>, Option<&str>) {
        match self {
            Self::Chat {
                provider, model, ..
            }
            | Self::Ask {
                provider, model, ..
            } => (provider.as_deref(), model.as_deref()),
            Self::Weather { .. } => (None, None),
        }
    }

    /// Assistant requested on the command line, if the command takes one
    pub fn requested_assistant(&self) -> Option<&str> {
        match self {
            Self::Chat { assistant, .. } => assistant.as_deref(),
            Self::Ask { assistant, .. } => Some(assistant.as_str()),
            Self::Weather { .. } => Some("weather"),
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Chat {
                assistant: None,
                provider: None,
                model: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert_eq!(cli.command.provider_overrides(), (None, None));
    }

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["formchat", "chat"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Chat {
                assistant: None,
                ..
            }
        ));
        assert_eq!(cli.command.requested_assistant(), None);
    }

    #[test]
    fn test_cli_parse_chat_with_all_flags() {
        let cli = Cli::try_parse_from([
            "formchat",
            "chat",
            "-a",
            "sales",
            "--provider",
            "ollama",
            "-m",
            "phi3",
        ])
        .unwrap();
        assert_eq!(cli.command.requested_assistant(), Some("sales"));
        assert_eq!(
            cli.command.provider_overrides(),
            (Some("ollama"), Some("phi3"))
        );
    }

    #[test]
    fn test_cli_parse_ask() {
        let cli = Cli::try_parse_from([
            "formchat",
            "ask",
            "--assistant",
            "passage",
            "--context",
            "The Eiffel Tower is in Paris.",
            "Where is the Eiffel Tower?",
        ])
        .unwrap();

        match cli.command {
            Commands::Ask {
                assistant,
                context,
                question,
                ..
            } => {
                assert_eq!(assistant, "passage");
                assert_eq!(context.as_deref(), Some("The Eiffel Tower is in Paris."));
                assert_eq!(question, "Where is the Eiffel Tower?");
            }
            _ => panic!("Expected Ask command"),
        }
    }

    #[test]
    fn test_cli_parse_ask_requires_assistant() {
        assert!(Cli::try_parse_from(["formchat", "ask", "hello"]).is_err());
    }

    #[test]
    fn test_cli_parse_ask_context_conflicts_with_file() {
        let result = Cli::try_parse_from([
            "formchat",
            "ask",
            "-a",
            "passage",
            "--context",
            "x",
            "--context-file",
            "passage.txt",
            "q",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_weather() {
        let cli = Cli::try_parse_from(["formchat", "weather", "Goa"]).unwrap();
        match &cli.command {
            Commands::Weather { place } => assert_eq!(place, "Goa"),
            _ => panic!("Expected Weather command"),
        }
        assert_eq!(cli.command.requested_assistant(), Some("weather"));
        assert_eq!(cli.command.provider_overrides(), (None, None));
    }

    #[test]
    fn test_cli_parse_with_config_and_verbose() {
        let cli =
            Cli::try_parse_from(["formchat", "-v", "--config", "custom.yaml", "chat"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
    }

    #[test]
    fn test_cli_parse_missing_command() {
        assert!(Cli::try_parse_from(["formchat"]).is_err());
    }

    #[test]
    fn test_cli_parse_invalid_command() {
        assert!(Cli::try_parse_from(["formchat", "run"]).is_err());
    }
}
