//! Prompt templates for the assistant variants
//!
//! Each assistant kind has one static template. Templates share a small
//! vocabulary of placeholder names so the session can fill them uniformly.

pub mod passage_prompt;
pub mod sales_prompt;
pub mod support_prompt;
pub mod template;
pub mod weather_prompt;

pub use template::PromptTemplate;

use crate::assistant::AssistantKind;
use crate::error::Result;

/// Placeholder for the session's fixed context (passage, weather summary, problem)
pub const CONTEXT_KEY: &str = "context";
/// Placeholder for the session's subject (product name)
pub const SUBJECT_KEY: &str = "subject";
/// Placeholder for prior turns rendered as `User:`/`Agent:` lines
pub const HISTORY_KEY: &str = "chat_history";
/// Placeholder for the current user message
pub const INPUT_KEY: &str = "user_input";

/// Builds the prompt template for an assistant kind
///
/// # Examples
///
/// ```
/// use formchat::assistant::AssistantKind;
/// use formchat::prompts::build_template;
///
/// let template = build_template(AssistantKind::Sales).unwrap();
/// assert!(template.uses("subject"));
/// ```
pub fn build_template(kind: AssistantKind) -> Result<PromptTemplate> {
    match kind {
        AssistantKind::PassageQa => passage_prompt::passage_template(),
        AssistantKind::Weather => weather_prompt::weather_template(),
        AssistantKind::CustomerCare => support_prompt::support_template(),
        AssistantKind::Sales => sales_prompt::sales_template(),
    }
}
