//! Assistant kinds and their user-facing texts
//!
//! Formchat ships one session component configured four ways:
//! - Passage QA: answers questions about a passage the user supplies
//! - Weather: plans events and activities around a place's current weather
//! - Customer care: helps with a product problem the user describes
//! - Sales: plays a call-center agent selling a product the user names
//!
//! Each kind needs one setup step before it accepts chat messages.

use colored::Colorize;
use std::fmt;

/// Which session field a kind needs before chatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    /// The fixed context (passage, weather summary or problem description)
    FixedContext,
    /// The subject (product name)
    Subject,
}

/// Assistant variant for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssistantKind {
    /// Answers strictly from a supplied passage
    PassageQa,
    /// Plans events around current weather conditions
    Weather,
    /// Resolves a described product problem
    CustomerCare,
    /// Sells a named product
    Sales,
}

impl fmt::Display for AssistantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PassageQa => write!(f, "PASSAGE"),
            Self::Weather => write!(f, "WEATHER"),
            Self::CustomerCare => write!(f, "SUPPORT"),
            Self::Sales => write!(f, "SALES"),
        }
    }
}

impl AssistantKind {
    /// All kinds in display order
    pub fn all() -> [Self; 4] {
        [Self::PassageQa, Self::Weather, Self::CustomerCare, Self::Sales]
    }

    /// Parse an assistant kind from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use formchat::assistant::AssistantKind;
    ///
    /// assert_eq!(AssistantKind::parse_str("sales").unwrap(), AssistantKind::Sales);
    /// assert_eq!(AssistantKind::parse_str("QA").unwrap(), AssistantKind::PassageQa);
    /// assert!(AssistantKind::parse_str("poetry").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "passage" | "qa" | "passage-qa" => Ok(Self::PassageQa),
            "weather" | "planner" => Ok(Self::Weather),
            "support" | "care" | "customer-care" => Ok(Self::CustomerCare),
            "sales" | "sell" => Ok(Self::Sales),
            other => Err(format!(
                "Unknown assistant: {}. Must be one of: passage, weather, support, sales",
                other
            )),
        }
    }

    /// Canonical lowercase name, as accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PassageQa => "passage",
            Self::Weather => "weather",
            Self::CustomerCare => "support",
            Self::Sales => "sales",
        }
    }

    /// Title shown in the welcome banner
    pub fn title(&self) -> &'static str {
        match self {
            Self::PassageQa => "Passage QA Chatbot",
            Self::Weather => "Weather-Based Event & Activity Planner",
            Self::CustomerCare => "Customer Care Chatbot",
            Self::Sales => "Sales Chatbot",
        }
    }

    /// One-line description of what the assistant does
    pub fn description(&self) -> &'static str {
        match self {
            Self::PassageQa => "Answers questions strictly from a passage you provide",
            Self::Weather => "Suggests venues and activities based on current weather",
            Self::CustomerCare => "Helps resolve a problem with your product",
            Self::Sales => "Call center agent simulation selling your product",
        }
    }

    /// Optional notice printed under the banner
    pub fn disclaimer(&self) -> Option<&'static str> {
        match self {
            Self::CustomerCare => Some(
                "We appreciate your engagement! This bot is designed to assist with \
                 product-related issues.",
            ),
            _ => None,
        }
    }

    /// The field that must be set before chatting
    pub fn setup_field(&self) -> SetupField {
        match self {
            Self::Sales => SetupField::Subject,
            _ => SetupField::FixedContext,
        }
    }

    /// Whether the setup value comes from a weather lookup
    pub fn uses_weather(&self) -> bool {
        matches!(self, Self::Weather)
    }

    /// Short name of the setup value
    pub fn setup_label(&self) -> &'static str {
        match self {
            Self::PassageQa => "passage",
            Self::Weather => "place",
            Self::CustomerCare => "problem",
            Self::Sales => "product",
        }
    }

    /// Question asked while setup is missing
    pub fn setup_prompt(&self) -> &'static str {
        match self {
            Self::PassageQa => "Enter your passage:",
            Self::Weather => "Enter the place:",
            Self::CustomerCare => "What issue are you facing with your product?",
            Self::Sales => "What product do you want to sell?",
        }
    }

    /// Warning for an empty setup value
    pub fn empty_setup_warning(&self) -> &'static str {
        match self {
            Self::PassageQa => "Please enter a passage.",
            Self::Weather => "Please enter a place.",
            Self::CustomerCare => "Please describe your problem.",
            Self::Sales => "Please enter a product.",
        }
    }

    /// Warning for a chat message sent before setup
    pub fn missing_setup_warning(&self) -> &'static str {
        match self {
            Self::PassageQa => "Please enter and submit a passage first!",
            Self::Weather => "Please look up the weather for a place first!",
            Self::CustomerCare => "Please describe your problem first!",
            Self::Sales => "Please enter the product to sell first!",
        }
    }

    /// Confirmation shown after a successful setup
    pub fn setup_success(&self, value: &str) -> String {
        match self {
            Self::PassageQa => "Passage stored in memory!".to_string(),
            Self::Weather => format!("Weather details loaded for {}", value),
            Self::CustomerCare => format!("Problem noted: {}", value),
            Self::Sales => format!("Product set to: {}", value),
        }
    }

    /// Banner shown when the user ends the conversation
    pub fn farewell_banner(&self) -> &'static str {
        match self {
            Self::CustomerCare => "Conversation ended. Thank you for reaching out!",
            Self::Sales => "Conversation ended. Thank you!",
            _ => "Conversation ended.",
        }
    }

    /// Colored tag for the interactive prompt
    pub fn colored_tag(&self) -> String {
        let label = self.to_string();
        match self {
            Self::PassageQa => format!("[{}]", label.purple()),
            Self::Weather => format!("[{}]", label.cyan()),
            Self::CustomerCare => format!("[{}]", label.green()),
            Self::Sales => format!("[{}]", label.yellow()),
        }
    }
}

impl std::str::FromStr for AssistantKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}
