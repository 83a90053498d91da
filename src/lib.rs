//! Formchat - conversational assistants over hosted language models
//!
//! This library provides the session component behind four terminal
//! assistants: a passage QA bot, a weather-based event planner, a customer
//! care agent, and a sales agent. Each one is the same [`Session`] configured
//! with a different prompt template and setup step.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: The conversational session, its turns and replies
//! - `assistant`: The four assistant kinds and their user-facing texts
//! - `prompts`: Named-placeholder templates, one per assistant
//! - `providers`: Completion provider abstraction and implementations (Gemini, Ollama)
//! - `weather`: Weather provider abstraction and the OpenWeatherMap client
//! - `config`: Configuration management, validation and credentials
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: Handlers for the CLI commands
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use formchat::{AssistantKind, Config, Credentials, Session};
//! use formchat::providers::create_provider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let credentials = Credentials::from_env();
//!     credentials.require(&config.completion.provider_type, AssistantKind::Sales)?;
//!
//!     let provider = create_provider(&config.completion, &credentials)?;
//!     let mut session = Session::new(AssistantKind::Sales, Arc::from(provider))?;
//!     session.set_subject("Espresso Machine X")?;
//!     let reply = session.send_message("Why should I buy it?").await?;
//!     println!("{}", reply.text());
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod session;
pub mod weather;

// Re-export commonly used types
pub use assistant::AssistantKind;
pub use config::{Config, Credentials};
pub use error::{FormchatError, Result, SessionError};
pub use session::{Reply, Session, Turn};

#[cfg(test)]
pub mod test_utils;
