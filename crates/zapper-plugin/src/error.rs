//! Error Types for the Zapper Plugin

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ZapperError>;

#[derive(Error, Debug)]
pub enum ZapperError {
    /// Missing or invalid API key
    #[error("Zapper configuration error: {0}")]
    Config(String),

    /// The GraphQL envelope carried an `errors` array
    #[error("Zapper API returned errors: {0}")]
    Upstream(String),

    /// Language-model extraction yielded nothing usable
    #[error("{0}")]
    NoAddressesFound(String),

    /// An otherwise successful response is missing required fields
    #[error("Malformed Zapper response: {0}")]
    MalformedResponse(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<ZapperError> for AgentError {
    fn from(err: ZapperError) -> Self {
        match err {
            ZapperError::Config(msg) => AgentError::Config(msg),
            other => AgentError::ActionExecution(other.to_string()),
        }
    }
}
