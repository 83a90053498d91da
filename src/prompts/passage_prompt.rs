//! Passage question-answering prompt
//!
//! The assistant answers strictly from a passage the user supplied at the
//! start of the session. Questions unrelated to the passage get a fixed
//! refusal sentence.

use super::{PromptTemplate, CONTEXT_KEY, HISTORY_KEY, INPUT_KEY};
use crate::error::Result;

/// Sentence the model is told to use for questions the passage cannot answer
pub const NO_INFORMATION_REPLY: &str = "I have no information regarding this.";

const TEMPLATE: &str = "You are a helpful assistant that answers strictly based on the given passage. \
If the question is not related to the passage, respond with: \
'I have no information regarding this.'\n\n\
Passage:\n{context}\n\n\
Chat History:\n{chat_history}\n\n\
Question:\n{user_input}\n\n\
Answer:";

/// Build the passage QA template
///
/// # Examples
///
/// ```
/// use formchat::prompts::passage_prompt::passage_template;
///
/// let template = passage_template().unwrap();
/// assert!(template.uses("context"));
/// ```
pub fn passage_template() -> Result<PromptTemplate> {
    PromptTemplate::new(
        "passage_qa",
        &[CONTEXT_KEY, HISTORY_KEY, INPUT_KEY],
        TEMPLATE,
    )
}
