//! Domain errors

use thiserror::Error;

/// Domain result type
pub type Result<T> = std::result::Result<T, DomainError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Caller sent a body that is not JSON or does not match the request schema
    #[error("Invalid request: {0}")]
    MalformedRequest(String),

    /// Prompt template or process configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Action already registered: {0}")]
    DuplicateAction(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The call engine could not initiate the call
    #[error("Call could not be started: {0}")]
    CallStart(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Short machine-readable label, used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::MalformedRequest(_) => "malformed_request",
            DomainError::Configuration(_) => "configuration",
            DomainError::DuplicateAction(_) => "duplicate_action",
            DomainError::UnknownAction(_) => "unknown_action",
            DomainError::ValidationError(_) => "validation",
            DomainError::CallStart(_) => "call_start",
            DomainError::Internal(_) => "internal",
        }
    }
}
