//! Special commands parser for interactive chat mode
//!
//! This module parses special commands that can be entered during
//! interactive chat sessions. Special commands allow users to:
//! - Set the passage, problem description or product explicitly
//! - Look up the weather for a place
//! - View the turn history and session status
//! - Reset the session or leave it
//!
//! Command names are prefixed with `/` and are case-insensitive. Arguments
//! keep their original case. Typing `quit` is not a special command: it is
//! sent to the session, which answers with a farewell.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an argument it does not take
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands act on the session directly rather than being sent to
/// the assistant as chat messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Store the fixed context (passage or problem description)
    SetContext(String),

    /// Store the subject (product name)
    SetSubject(String),

    /// Look up current weather for a place and use it as context
    FetchWeather(String),

    /// Print the turn history
    ShowHistory,

    /// Clear context, subject and history
    Reset,

    /// Display assistant, model and setup status
    ShowStatus,

    /// Display help information
    Help,

    /// Leave the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input is a setup value or a chat message.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is not a valid command,
/// `CommandError::MissingArgument` if a command needs text and none was given, and
/// `CommandError::UnsupportedArgument` if an argument-free command was given one.
///
/// # Examples
///
/// ```
/// use formchat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/subject Espresso Machine X").unwrap();
/// assert_eq!(cmd, SpecialCommand::SetSubject("Espresso Machine X".to_string()));
///
/// let cmd = parse_special_command("/WEATHER Goa").unwrap();
/// assert_eq!(cmd, SpecialCommand::FetchWeather("Goa".to_string()));
///
/// let cmd = parse_special_command("hello agent").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();

    if trimmed.eq_ignore_ascii_case("exit") {
        return Ok(SpecialCommand::Exit);
    }
    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name.to_lowercase(), rest.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let with_arg = |usage: &str, build: fn(String) -> SpecialCommand| {
        if arg.is_empty() {
            Err(CommandError::MissingArgument {
                command: name.clone(),
                usage: usage.to_string(),
            })
        } else {
            Ok(build(arg.to_string()))
        }
    };
    let without_arg = |command: SpecialCommand| {
        if arg.is_empty() {
            Ok(command)
        } else {
            Err(CommandError::UnsupportedArgument {
                command: name.clone(),
                arg: arg.to_string(),
            })
        }
    };

    match name.as_str() {
        "/context" | "/passage" | "/problem" => {
            with_arg("/context <text>", SpecialCommand::SetContext)
        }
        "/subject" | "/product" => with_arg("/subject <product>", SpecialCommand::SetSubject),
        "/weather" | "/place" => with_arg("/weather <place>", SpecialCommand::FetchWeather),
        "/history" => without_arg(SpecialCommand::ShowHistory),
        "/reset" | "/clear" => without_arg(SpecialCommand::Reset),
        "/status" => without_arg(SpecialCommand::ShowStatus),
        "/help" | "/?" => without_arg(SpecialCommand::Help),
        "/exit" => without_arg(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(name.clone())),
    }
}

/// Display help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

SETUP:
  /context <text>   - Set the passage (passage) or problem description (support)
  /passage <text>   - Same as /context
  /problem <text>   - Same as /context
  /subject <name>   - Set the product to sell (sales)
  /product <name>   - Same as /subject
  /weather <place>  - Look up current weather for a place (weather)
  /place <place>    - Same as /weather

SESSION INFORMATION:
  /history          - Show the conversation so far
  /status           - Show assistant, model and setup status
  /help             - Show this help message
  /?                - Same as /help

SESSION CONTROL:
  /reset            - Clear the setup and the conversation
  /clear            - Same as /reset
  quit              - Say goodbye to the assistant and end the conversation
  exit              - Leave immediately

NOTES:
  - Command names are case-insensitive; arguments are kept as typed
  - Until setup is done, a plain line is used as the setup value
  - After setup, regular text (not starting with /) is sent to the assistant
  - Passage, problem and product are set once; use /reset to change them
  - The weather lookup can be repeated to switch places
"#
    );
}
