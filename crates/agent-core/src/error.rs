//! Error Types

use thiserror::Error;

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent runtime error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Action not found in registry
    #[error("Action not found: {0}")]
    ActionNotFound(String),

    /// Action validation failed
    #[error("Action validation error: {0}")]
    ActionValidation(String),

    /// Action handler failed
    #[error("Action execution error: {0}")]
    ActionExecution(String),

    /// Memory store error
    #[error("Memory error: {0}")]
    Memory(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Provider(msg) => format!("The AI service encountered an error: {}", msg),
            AgentError::ProviderUnavailable(_) => {
                "The AI service is currently unavailable. Please try again.".into()
            }
            AgentError::ActionNotFound(name) => format!("The action '{}' is not available.", name),
            AgentError::ActionValidation(msg) => format!("Invalid request: {}", msg),
            AgentError::ActionExecution(msg) => format!("Action error: {}", msg),
            AgentError::Config(msg) => format!("Configuration problem: {}", msg),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Other(err.to_string())
    }
}
