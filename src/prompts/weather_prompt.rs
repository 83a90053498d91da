//! Weather-based event and activity planner prompt

use super::{PromptTemplate, CONTEXT_KEY, HISTORY_KEY, INPUT_KEY};
use crate::error::Result;

const TEMPLATE: &str = "You are an expert event and outdoor activity planner. \
Based on the following weather details for a specific location:\n\n\
{context}\n\n\
Chat History:\n{chat_history}\n\n\
Answer the user's question: \"{user_input}\"\n\n\
Your response should include:\n\
* Suggestions for indoor or outdoor venues based on the weather.\n\
* Weather-based recommendations for outdoor activities (hiking, biking, camping).\n\
* Consider factors like temperature, humidity, wind, rain, and cloud cover.\n\
* Provide concise and informative answers.\n\
* Include names of local places, timings of local places and the name of 3 to 4 local food items.";

/// Build the weather planner template
///
/// The `context` placeholder receives the formatted conditions summary
/// produced by [`crate::weather::format_conditions`].
pub fn weather_template() -> Result<PromptTemplate> {
    PromptTemplate::new(
        "weather_planner",
        &[CONTEXT_KEY, HISTORY_KEY, INPUT_KEY],
        TEMPLATE,
    )
}
