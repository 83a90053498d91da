//! Error types for Formchat
//!
//! This module defines the error types used throughout the application,
//! using `thiserror` for ergonomic error handling.
//!
//! Two enums live here:
//!
//! - [`FormchatError`] covers application plumbing: configuration, credentials,
//!   provider transport, template construction, IO and parsing.
//! - [`SessionError`] is what session operations return. It has exactly three
//!   kinds so front ends can decide between a warning and an error banner.

use thiserror::Error;

/// Main error type for Formchat operations
#[derive(Error, Debug)]
pub enum FormchatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required credentials were not found in the environment
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Completion provider errors (transport, HTTP status, malformed body)
    #[error("{0}")]
    Provider(String),

    /// Weather provider errors (transport, HTTP status, malformed body)
    #[error("{0}")]
    Weather(String),

    /// Prompt template construction or rendering errors
    #[error("Template error: {0}")]
    Template(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors returned by [`crate::session::Session`] operations
///
/// Every variant is local to one action. The session is left exactly as it
/// was before the action, so the caller may retry immediately.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Required input was empty or not accepted by this session
    #[error("{0}")]
    ValidationFailed(String),

    /// The action needs setup that has not happened yet
    #[error("{0}")]
    PreconditionNotMet(String),

    /// The completion or weather provider failed or returned an unusable response
    #[error("{0}")]
    ProviderCallFailed(String),
}

impl SessionError {
    /// Whether the front end should show this as a warning rather than an error
    pub fn is_warning(&self) -> bool {
        !matches!(self, Self::ProviderCallFailed(_))
    }
}

/// Result type alias for Formchat operations
///
/// Uses `anyhow::Error` so provider and configuration failures carry context.
pub type Result<T> = anyhow::Result<T>;

/// Result type for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;
