use slack_morphism::errors::SlackClientError;
use thiserror::Error;

/// Message returned whenever a tool is called before `setup` has stored a token.
pub const NOT_CONFIGURED_MESSAGE: &str =
    "Slack not configured. Please ask me to setup slack and provide your user token.";

#[derive(Debug, Error)]
pub enum SlackError {
    #[error("{}", NOT_CONFIGURED_MESSAGE)]
    NotConfigured,

    #[error("User '{0}' not found in config")]
    UserNotFound(String),

    #[error("Channel '{0}' not found in config")]
    ChannelNotFound(String),

    /// Slack answered with `ok: false`; holds the error code verbatim.
    #[error("Slack API error: {0}")]
    ApiError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to access config file: {0}")]
    ConfigError(String),

    #[error("Failed to parse Slack response: {0}")]
    ParseError(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    GeneralError(String),
}

/// Coarse failure classes reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotConfigured,
    NotFound,
    RemoteRejection,
    Unexpected,
}

impl SlackError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SlackError::NotConfigured => ErrorKind::NotConfigured,
            SlackError::UserNotFound(_) | SlackError::ChannelNotFound(_) => ErrorKind::NotFound,
            SlackError::ApiError(_) => ErrorKind::RemoteRejection,
            SlackError::HttpError(_)
            | SlackError::ConfigError(_)
            | SlackError::ParseError(_)
            | SlackError::InvalidInput(_)
            | SlackError::GeneralError(_) => ErrorKind::Unexpected,
        }
    }
}

impl From<SlackClientError> for SlackError {
    fn from(error: SlackClientError) -> Self {
        match error {
            SlackClientError::ApiError(api) => SlackError::ApiError(api.code),
            other => SlackError::HttpError(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for SlackError {
    fn from(error: reqwest::Error) -> Self {
        SlackError::HttpError(error.to_string())
    }
}

impl From<std::io::Error> for SlackError {
    fn from(error: std::io::Error) -> Self {
        SlackError::ConfigError(error.to_string())
    }
}

impl From<serde_yaml::Error> for SlackError {
    fn from(error: serde_yaml::Error) -> Self {
        SlackError::ConfigError(error.to_string())
    }
}

impl From<serde_json::Error> for SlackError {
    fn from(error: serde_json::Error) -> Self {
        SlackError::ParseError(error.to_string())
    }
}

impl From<anyhow::Error> for SlackError {
    fn from(error: anyhow::Error) -> Self {
        SlackError::GeneralError(error.to_string())
    }
}
