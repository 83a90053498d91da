//! Call-center sales agent prompt

use super::{PromptTemplate, HISTORY_KEY, INPUT_KEY, SUBJECT_KEY};
use crate::error::Result;

const TEMPLATE: &str = "You are a call center agent tasked with selling the following product: {subject}. \
Invent details such as specifications, price, package tiers, colors, and other relevant features if the user asks. \
Engage with the user in a conversational style to provide information, answer questions, and persuade them to buy the product. \
If the user seems convinced, conclude the chat appropriately. If the user says 'quit', end the conversation.\n\n\
Chat History:\n{chat_history}\n\n\
User: {user_input}\n\n\
Agent:";

/// Build the sales agent template
pub fn sales_template() -> Result<PromptTemplate> {
    PromptTemplate::new(
        "sales_agent",
        &[SUBJECT_KEY, HISTORY_KEY, INPUT_KEY],
        TEMPLATE,
    )
}
