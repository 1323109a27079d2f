use thiserror::Error;

/// Errors that can occur during agent pool operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AgentError {
    #[error("Agent not found: {0}")]
    NotFound(String),

    #[error("Invalid agent: {0}")]
    InvalidAgent(String),

    #[error("Store communication error: {0}")]
    StoreCommunicationError(String),
}

impl From<String> for AgentError {
    fn from(msg: String) -> Self {
        AgentError::StoreCommunicationError(msg)
    }
}
