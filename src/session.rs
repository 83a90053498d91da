//! Conversational form session
//!
//! A [`Session`] owns everything one user builds up while talking to an
//! assistant: the fixed context or subject set during setup, the place of the
//! last weather lookup, and the ordered turn history. Each action runs to
//! completion before the next one is accepted, so the session is a plain
//! value passed by `&mut` to whoever drives it.

use crate::assistant::{AssistantKind, SetupField};
use crate::error::{Result, SessionError, SessionResult};
use crate::prompts::{self, PromptTemplate, CONTEXT_KEY, HISTORY_KEY, INPUT_KEY, SUBJECT_KEY};
use crate::providers::CompletionProvider;
use crate::weather::{format_conditions, WeatherProvider};

use std::collections::HashMap;
use std::sync::Arc;

/// Agent text of the closing turn appended on `quit`
pub const FAREWELL_TEXT: &str = "Goodbye!";

/// Warning for an empty chat message
pub const EMPTY_MESSAGE_WARNING: &str = "Please enter a message.";

/// Input that ends the conversation without calling the provider
const QUIT_COMMAND: &str = "quit";

/// One user message and the agent's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// The user's message, trimmed
    pub user_text: String,
    /// The agent's answer, trimmed
    pub agent_text: String,
}

impl Turn {
    fn new(user_text: impl Into<String>, agent_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            agent_text: agent_text.into(),
        }
    }
}

/// Outcome of a successful `send_message`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The provider's trimmed answer
    Answer(String),
    /// The canned farewell; the conversation is over
    Farewell(String),
}

impl Reply {
    /// Text to display
    pub fn text(&self) -> &str {
        match self {
            Self::Answer(text) | Self::Farewell(text) => text,
        }
    }

    /// Whether the caller should stop accepting messages
    pub fn ends_conversation(&self) -> bool {
        matches!(self, Self::Farewell(_))
    }
}

/// State of one user's conversation with one assistant
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use formchat::assistant::AssistantKind;
/// use formchat::config::Config;
/// use formchat::providers::create_provider;
/// use formchat::session::Session;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::default();
/// let creds = formchat::config::Credentials::from_env();
/// let provider = create_provider(&config.completion, &creds)?;
///
/// let mut session = Session::new(AssistantKind::PassageQa, Arc::from(provider))?;
/// session.set_fixed_context("The Eiffel Tower is in Paris.")?;
/// let reply = session.send_message("Where is the Eiffel Tower?").await?;
/// println!("{}", reply.text());
/// # Ok(())
/// # }
/// ```
pub struct Session {
    kind: AssistantKind,
    template: PromptTemplate,
    completion: Arc<dyn CompletionProvider>,
    weather: Option<Arc<dyn WeatherProvider>>,
    fixed_context: Option<String>,
    subject: Option<String>,
    place: Option<String>,
    history: Vec<Turn>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("kind", &self.kind)
            .field("model", &self.completion.model())
            .field("fixed_context", &self.fixed_context)
            .field("subject", &self.subject)
            .field("place", &self.place)
            .field("turns", &self.history.len())
            .finish()
    }
}

impl Session {
    /// Create an empty session for an assistant kind
    ///
    /// # Errors
    ///
    /// Returns error if the kind's prompt template fails to parse
    pub fn new(kind: AssistantKind, completion: Arc<dyn CompletionProvider>) -> Result<Self> {
        let template = prompts::build_template(kind)?;
        tracing::debug!(
            "Created {} session with template {} on model {}",
            kind,
            template.name(),
            completion.model()
        );

        Ok(Self {
            kind,
            template,
            completion,
            weather: None,
            fixed_context: None,
            subject: None,
            place: None,
            history: Vec::new(),
        })
    }

    /// Attach the weather provider used by `fetch_conditions`
    pub fn with_weather(mut self, weather: Arc<dyn WeatherProvider>) -> Self {
        self.weather = Some(weather);
        self
    }

    /// Assistant kind of this session
    pub fn kind(&self) -> AssistantKind {
        self.kind
    }

    /// Stored fixed context, if any
    pub fn fixed_context(&self) -> Option<&str> {
        self.fixed_context.as_deref()
    }

    /// Stored subject, if any
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Place of the last successful weather lookup
    pub fn place(&self) -> Option<&str> {
        self.place.as_deref()
    }

    /// Turns in chronological order
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Whether the setup this kind needs has been done
    pub fn is_ready(&self) -> bool {
        if self.kind.uses_weather() {
            return self.place.is_some() && self.fixed_context.is_some();
        }
        match self.kind.setup_field() {
            SetupField::FixedContext => self.fixed_context.is_some(),
            SetupField::Subject => self.subject.is_some(),
        }
    }

    /// History as alternating `User:`/`Agent:` lines
    pub fn render_history(&self) -> String {
        self.history
            .iter()
            .map(|turn| format!("User: {}\nAgent: {}", turn.user_text, turn.agent_text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Store the fixed context (passage or problem description)
    ///
    /// The weather summary only comes from [`Session::fetch_conditions`].
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if `text` is blank, this kind takes no typed context,
    ///   or a fixed context is already stored
    pub fn set_fixed_context(&mut self, text: &str) -> SessionResult<&str> {
        self.set_field(SetupField::FixedContext, text)
    }

    /// Store the subject (product name)
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if `text` is blank, this kind has no subject,
    ///   or a subject is already stored
    pub fn set_subject(&mut self, text: &str) -> SessionResult<&str> {
        self.set_field(SetupField::Subject, text)
    }

    fn set_field(&mut self, field: SetupField, text: &str) -> SessionResult<&str> {
        let value = text.trim();
        if value.is_empty() {
            return Err(SessionError::ValidationFailed(
                self.kind.empty_setup_warning().to_string(),
            ));
        }

        let name = match field {
            SetupField::FixedContext => "context",
            SetupField::Subject => "subject",
        };
        if self.kind.uses_weather() {
            return Err(SessionError::ValidationFailed(
                "The weather assistant takes its context from a weather lookup; use /weather <place>"
                    .to_string(),
            ));
        }
        if self.kind.setup_field() != field {
            return Err(SessionError::ValidationFailed(format!(
                "The {} assistant does not take a {}",
                self.kind.as_str(),
                name
            )));
        }

        let slot = match field {
            SetupField::FixedContext => &mut self.fixed_context,
            SetupField::Subject => &mut self.subject,
        };
        if slot.is_some() {
            return Err(SessionError::ValidationFailed(format!(
                "A {} is already set; reset the session to change it",
                self.kind.setup_label()
            )));
        }

        tracing::info!("{} session {} set ({} chars)", self.kind, name, value.len());
        Ok(slot.insert(value.to_string()).as_str())
    }

    /// Send one chat message and record the exchange
    ///
    /// `quit` in any letter case ends the conversation with a canned farewell
    /// and never reaches the provider.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if `text` is blank
    /// - `PreconditionNotMet` if setup has not been done
    /// - `ProviderCallFailed` if rendering, the provider call, or the response fails;
    ///   history is left unchanged
    pub async fn send_message(&mut self, text: &str) -> SessionResult<Reply> {
        let user_text = text.trim();
        if user_text.is_empty() {
            return Err(SessionError::ValidationFailed(
                EMPTY_MESSAGE_WARNING.to_string(),
            ));
        }

        if user_text.eq_ignore_ascii_case(QUIT_COMMAND) {
            tracing::info!("{} session ended by user", self.kind);
            self.history.push(Turn::new(user_text, FAREWELL_TEXT));
            return Ok(Reply::Farewell(FAREWELL_TEXT.to_string()));
        }

        if !self.is_ready() {
            return Err(SessionError::PreconditionNotMet(
                self.kind.missing_setup_warning().to_string(),
            ));
        }

        let prompt = self
            .render_prompt(user_text)
            .map_err(|e| SessionError::ProviderCallFailed(e.to_string()))?;
        tracing::debug!(
            "Sending {} prompt ({} chars, {} prior turns)",
            self.kind,
            prompt.len(),
            self.history.len()
        );

        let response = self.completion.complete(&prompt).await.map_err(|e| {
            tracing::warn!("Completion failed: {}", e);
            SessionError::ProviderCallFailed(e.to_string())
        })?;

        let agent_text = response.text.trim();
        if agent_text.is_empty() {
            tracing::warn!("Completion returned only whitespace");
            return Err(SessionError::ProviderCallFailed(
                "The model returned an empty response".to_string(),
            ));
        }

        self.history.push(Turn::new(user_text, agent_text));
        tracing::info!("{} session now has {} turns", self.kind, self.history.len());
        Ok(Reply::Answer(agent_text.to_string()))
    }

    fn render_prompt(&self, user_text: &str) -> Result<String> {
        let history = self.render_history();
        let mut values: HashMap<&str, &str> = HashMap::new();
        values.insert(HISTORY_KEY, &history);
        values.insert(INPUT_KEY, user_text);
        if self.template.uses(CONTEXT_KEY) {
            values.insert(CONTEXT_KEY, self.fixed_context.as_deref().unwrap_or_default());
        }
        if self.template.uses(SUBJECT_KEY) {
            values.insert(SUBJECT_KEY, self.subject.as_deref().unwrap_or_default());
        }
        self.template.render(&values)
    }

    /// Look up current weather for `place` and store the summary as fixed context
    ///
    /// Unlike the other setup fields, the weather summary can be refreshed:
    /// a successful lookup replaces any previous one.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if `place` is blank
    /// - `PreconditionNotMet` if this is not a weather session or no weather provider is attached
    /// - `ProviderCallFailed` if the lookup fails; the previous summary is kept
    pub async fn fetch_conditions(&mut self, place: &str) -> SessionResult<&str> {
        if !self.kind.uses_weather() {
            return Err(SessionError::PreconditionNotMet(format!(
                "The {} assistant does not use weather lookups",
                self.kind.as_str()
            )));
        }

        let place = place.trim();
        if place.is_empty() {
            return Err(SessionError::ValidationFailed(
                self.kind.empty_setup_warning().to_string(),
            ));
        }

        let Some(weather) = self.weather.as_ref() else {
            return Err(SessionError::PreconditionNotMet(
                "No weather provider is configured".to_string(),
            ));
        };

        let record = weather.current_conditions(place).await.map_err(|e| {
            tracing::warn!("Weather lookup for {} failed: {}", place, e);
            SessionError::ProviderCallFailed(e.to_string())
        })?;

        let summary = format_conditions(place, &record);
        tracing::info!("Loaded weather for {}, {}", place, record.country);
        self.place = Some(place.to_string());
        Ok(self.fixed_context.insert(summary).as_str())
    }

    /// Clear context, subject, place and history
    pub fn reset(&mut self) {
        self.fixed_context = None;
        self.subject = None;
        self.place = None;
        self.history.clear();
        tracing::info!("{} session reset", self.kind);
    }
}
