/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`: Interactive chat with one assistant
- `ask`: One setup step plus one question, answer printed to stdout
- `weather`: Current weather summary for a place

Every handler builds a [`Session`] (or a weather provider) from the loaded
configuration and the credentials checked at startup.
*/

use crate::assistant::{AssistantKind, SetupField};
use crate::config::{Config, Credentials};
use crate::error::{FormchatError, Result, SessionError, SessionResult};
use crate::providers::create_provider;
use crate::session::Session;
use crate::weather::{create_weather_provider, format_conditions};
use colored::Colorize;
use std::sync::Arc;

// Special commands parser for the interactive loop
pub mod special_commands;

/// Build a session for `kind` with the configured providers
///
/// The weather provider is attached only for the weather assistant.
///
/// # Errors
///
/// Returns error if a provider cannot be created
pub fn build_session(
    config: &Config,
    credentials: &Credentials,
    kind: AssistantKind,
) -> Result<Session> {
    let provider = create_provider(&config.completion, credentials)?;
    let mut session = Session::new(kind, Arc::from(provider))?;
    if kind.uses_weather() {
        let weather = create_weather_provider(&config.weather, credentials)?;
        session = session.with_weather(Arc::from(weather));
    }
    Ok(session)
}

/// Run the setup step for the session's assistant with `value`
///
/// Returns the confirmation text to display.
async fn submit_setup(session: &mut Session, value: &str) -> SessionResult<String> {
    let kind = session.kind();
    if kind.uses_weather() {
        let summary = session.fetch_conditions(value).await?.to_string();
        let place = session.place().unwrap_or(value);
        return Ok(format!("{}\n{}", kind.setup_success(place), summary));
    }

    let stored = match kind.setup_field() {
        SetupField::FixedContext => session.set_fixed_context(value)?,
        SetupField::Subject => session.set_subject(value)?,
    };
    Ok(kind.setup_success(stored))
}

fn print_session_error(error: &SessionError) {
    if error.is_warning() {
        println!("{}\n", format!("Warning: {}", error).yellow());
    } else {
        eprintln!("{}\n", format!("Error: {}", error).red());
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Builds a session for the chosen assistant and runs a readline-based
    //! loop. Until the assistant's setup is done, a plain line is taken as the
    //! setup value; after that, plain lines are chat messages.

    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use super::*;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// What the loop should do after handling one line
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum LoopControl {
        Continue,
        Stop,
    }

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `credentials` - Keys checked at startup
    /// * `assistant` - Optional override for the configured default assistant
    pub async fn run_chat(
        config: Config,
        credentials: Credentials,
        assistant: Option<String>,
    ) -> Result<()> {
        let kind = config.resolve_assistant(assistant.as_deref())?;
        tracing::info!("Starting interactive chat with the {} assistant", kind.as_str());

        let mut session = build_session(&config, &credentials, kind)?;
        let model = match config.completion.provider_type.as_str() {
            "ollama" => config.completion.ollama.model.clone(),
            _ => config.completion.gemini.model.clone(),
        };

        let mut rl = DefaultEditor::new()
            .map_err(|e| FormchatError::Config(format!("Failed to start line editor: {}", e)))?;

        print_welcome_banner(kind);
        print_setup_prompt(&session);

        loop {
            let prompt = format!("{} >> ", kind.colored_tag());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        let _ = rl.add_history_entry(trimmed);
                    }

                    if handle_line(&mut session, &model, trimmed).await == LoopControl::Stop {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        tracing::info!("Chat ended after {} turns", session.history().len());
        Ok(())
    }

    /// Handle one input line against the session
    pub(crate) async fn handle_line(session: &mut Session, model: &str, line: &str) -> LoopControl {
        let command = match parse_special_command(line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}\n", e.to_string().red());
                return LoopControl::Continue;
            }
        };

        match command {
            SpecialCommand::SetContext(text) => {
                let kind = session.kind();
                report(session.set_fixed_context(&text).map(|v| kind.setup_success(v)));
            }
            SpecialCommand::SetSubject(text) => {
                let kind = session.kind();
                report(session.set_subject(&text).map(|v| kind.setup_success(v)));
            }
            SpecialCommand::FetchWeather(place) => {
                let outcome = if session.kind().uses_weather() {
                    submit_setup(session, &place).await
                } else {
                    session.fetch_conditions(&place).await.map(str::to_string)
                };
                report(outcome);
            }
            SpecialCommand::ShowHistory => print_history(session),
            SpecialCommand::Reset => {
                session.reset();
                println!("{}\n", "Session cleared.".green());
                print_setup_prompt(session);
            }
            SpecialCommand::ShowStatus => print_status_display(session, model),
            SpecialCommand::Help => print_help(),
            SpecialCommand::Exit => return LoopControl::Stop,
            SpecialCommand::None => return handle_plain_line(session, line).await,
        }

        LoopControl::Continue
    }

    async fn handle_plain_line(session: &mut Session, line: &str) -> LoopControl {
        let is_quit = line.trim().eq_ignore_ascii_case("quit");
        if !session.is_ready() && !is_quit {
            let outcome = submit_setup(session, line).await;
            let ready = outcome.is_ok();
            report(outcome);
            if ready {
                println!("You can now start chatting. Type 'quit' to end the conversation.\n");
            }
            return LoopControl::Continue;
        }

        match session.send_message(line).await {
            Ok(reply) => {
                println!("\n{} {}\n", "Agent:".bold(), reply.text());
                if reply.ends_conversation() {
                    println!("{}\n", session.kind().farewell_banner().green());
                    return LoopControl::Stop;
                }
            }
            Err(e) => print_session_error(&e),
        }
        LoopControl::Continue
    }

    fn report(outcome: SessionResult<String>) {
        match outcome {
            Ok(message) => println!("{}\n", message.green()),
            Err(e) => print_session_error(&e),
        }
    }

    fn print_setup_prompt(session: &Session) {
        if !session.is_ready() {
            println!("{}\n", session.kind().setup_prompt().cyan());
        }
    }

    /// Display welcome banner at the start of interactive chat mode
    fn print_welcome_banner(kind: AssistantKind) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║              Formchat Interactive Chat - Welcome!            ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Assistant: {} {}", kind.colored_tag(), kind.title().bold());
        println!("           {}\n", kind.description());
        if let Some(disclaimer) = kind.disclaimer() {
            println!("{}\n", disclaimer.italic());
        }
        println!("Type '/help' for available commands, 'quit' to end the conversation\n");
    }

    /// Display the turn history
    fn print_history(session: &Session) {
        if session.history().is_empty() {
            println!("No messages yet.\n");
            return;
        }

        println!();
        for turn in session.history() {
            println!("{} {}", "User:".bold(), turn.user_text);
            println!("{} {}\n", "Agent:".bold(), turn.agent_text);
        }
    }

    /// Display detailed status information about the current session
    fn print_status_display(session: &Session, model: &str) {
        let kind = session.kind();
        let setup = match kind.setup_field() {
            SetupField::FixedContext if kind.uses_weather() => session.place(),
            SetupField::FixedContext => session.fixed_context(),
            SetupField::Subject => session.subject(),
        };

        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Formchat Session Status                   ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Assistant:    {} ({})", kind.colored_tag(), kind.title());
        println!("Model:        {}", model);
        println!(
            "Setup:        {}",
            match setup {
                Some(value) => format!("{} = {}", kind.setup_label(), preview(value)),
                None => format!("{} not set", kind.setup_label()).yellow().to_string(),
            }
        );
        println!("Conversation: {} turns", session.history().len());
        println!();
    }

    fn preview(value: &str) -> String {
        const MAX_CHARS: usize = 60;
        let first_line = value.lines().next().unwrap_or_default();
        if first_line.chars().count() > MAX_CHARS || value.lines().nth(1).is_some() {
            let cut: String = first_line.chars().take(MAX_CHARS).collect();
            format!("{}...", cut)
        } else {
            first_line.to_string()
        }
    }

}

/// One-shot question command
pub mod ask {
    use super::*;
    use std::path::PathBuf;

    /// Setup values and question for a one-shot `ask`
    #[derive(Debug, Clone, Default)]
    pub struct AskRequest {
        /// Passage or problem description
        pub context: Option<String>,
        /// File to read the context from
        pub context_file: Option<PathBuf>,
        /// Product name
        pub subject: Option<String>,
        /// Place to look up weather for
        pub place: Option<String>,
        /// The question
        pub question: String,
    }

    /// Perform setup, ask one question, and print the answer
    ///
    /// # Errors
    ///
    /// Returns error if the assistant is unknown, a provider cannot be built,
    /// the context file cannot be read, or any session operation fails
    pub async fn run_ask(
        config: Config,
        credentials: Credentials,
        assistant: String,
        request: AskRequest,
    ) -> Result<()> {
        let kind = config.resolve_assistant(Some(&assistant))?;
        let mut session = build_session(&config, &credentials, kind)?;
        let answer = ask_once(&mut session, request).await?;
        println!("{}", answer);
        Ok(())
    }

    /// Apply the request to a fresh session and return the answer text
    pub async fn ask_once(session: &mut Session, request: AskRequest) -> Result<String> {
        let context = match (request.context, request.context_file) {
            (Some(text), _) => Some(text),
            (None, Some(path)) => {
                tracing::debug!("Reading context from {}", path.display());
                Some(std::fs::read_to_string(&path).map_err(|e| {
                    FormchatError::Config(format!(
                        "Failed to read context file {}: {}",
                        path.display(),
                        e
                    ))
                })?)
            }
            (None, None) => None,
        };

        if let Some(context) = context {
            session.set_fixed_context(&context)?;
        }
        if let Some(subject) = request.subject {
            session.set_subject(&subject)?;
        }
        if let Some(place) = request.place {
            session.fetch_conditions(&place).await?;
        }

        let reply = session.send_message(&request.question).await?;
        Ok(reply.text().to_string())
    }

}

/// Weather lookup command
pub mod weather {
    use super::*;

    /// Print the current conditions summary for `place`
    ///
    /// # Errors
    ///
    /// Returns error if the place is blank, the key is missing, or the lookup fails
    pub async fn run_weather(config: Config, credentials: Credentials, place: String) -> Result<()> {
        let place = place.trim();
        if place.is_empty() {
            return Err(FormchatError::Weather(
                AssistantKind::Weather.empty_setup_warning().to_string(),
            )
            .into());
        }

        let provider = create_weather_provider(&config.weather, &credentials)?;
        let record = provider.current_conditions(place).await?;
        print!("{}", format_conditions(place, &record));
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_run_weather_rejects_blank_place() {
            let creds = Credentials::new(None, Some("key".to_string()));
            let err = run_weather(Config::default(), creds, "  ".to_string())
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "Please enter a place.");
        }

        #[tokio::test]
        async fn test_run_weather_requires_key() {
            let err = run_weather(Config::default(), Credentials::default(), "Goa".to_string())
                .await
                .unwrap_err();
            assert!(err.to_string().contains("OPENWEATHERMAP_API_KEY"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{goa_conditions, StubCompletionProvider, StubWeatherProvider};

    #[test]
    fn test_build_session_attaches_weather_only_for_weather_kind() {
        let config = Config::default();
        let creds = Credentials::new(Some("g".to_string()), Some("w".to_string()));
        assert!(build_session(&config, &creds, AssistantKind::Weather).is_ok());
        assert!(build_session(&config, &creds, AssistantKind::Sales).is_ok());

        let no_weather_key = Credentials::new(Some("g".to_string()), None);
        assert!(build_session(&config, &no_weather_key, AssistantKind::Weather).is_err());
        assert!(build_session(&config, &no_weather_key, AssistantKind::PassageQa).is_ok());
    }

    #[tokio::test]
    async fn test_submit_setup_messages() {
        let stub = Arc::new(StubCompletionProvider::default());

        let mut sales = Session::new(AssistantKind::Sales, stub.clone()).unwrap();
        assert_eq!(
            submit_setup(&mut sales, " kettle ").await.unwrap(),
            "Product set to: kettle"
        );

        let mut weather = Session::new(AssistantKind::Weather, stub.clone())
            .unwrap()
            .with_weather(Arc::new(StubWeatherProvider::returning(goa_conditions())));
        let message = submit_setup(&mut weather, "Goa").await.unwrap();
        assert!(message.starts_with("Weather details loaded for Goa\nIn Goa, IN,"));

        let mut passage = Session::new(AssistantKind::PassageQa, stub).unwrap();
        assert_eq!(
            submit_setup(&mut passage, "  ").await,
            Err(SessionError::ValidationFailed(
                "Please enter a passage.".to_string()
            ))
        );
    }
}
