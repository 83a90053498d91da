//! Formchat - conversational assistants over hosted language models
//!
#![doc = "Formchat - conversational assistants over hosted language models"]
#![doc = "Main entry point for the Formchat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use formchat::cli::{Cli, Commands};
use formchat::commands;
use formchat::commands::ask::AskRequest;
use formchat::config::{Config, Credentials};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the variables may come from the shell
    let dotenv_path = dotenvy::dotenv().ok();

    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);
    if let Some(path) = dotenv_path {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Credentials are checked once, before any action is accepted
    let credentials = Credentials::from_env();
    match &cli.command {
        Commands::Weather { .. } => {
            if credentials.weather_api_key.is_none() {
                anyhow::bail!(formchat::FormchatError::MissingCredentials(format!(
                    "please set {} in your environment or .env file",
                    formchat::config::WEATHER_API_KEY_VAR
                )));
            }
        }
        command => {
            let kind = config.resolve_assistant(command.requested_assistant())?;
            credentials.require(&config.completion.provider_type, kind)?;
        }
    }
    tracing::debug!("Credentials: {:?}", credentials);

    // Execute command
    match cli.command {
        Commands::Chat { assistant, .. } => {
            commands::chat::run_chat(config, credentials, assistant).await?;
            Ok(())
        }
        Commands::Ask {
            assistant,
            context,
            context_file,
            subject,
            place,
            question,
            ..
        } => {
            tracing::info!("Asking the {} assistant", assistant);
            let request = AskRequest {
                context,
                context_file,
                subject,
                place,
                question,
            };
            commands::ask::run_ask(config, credentials, assistant, request).await?;
            Ok(())
        }
        Commands::Weather { place } => {
            tracing::info!("Looking up weather for {}", place);
            commands::weather::run_weather(config, credentials, place).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "formchat=debug"
    } else {
        "formchat=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
