//! Error types for the CodeDeploy provider

use thiserror::Error;

/// Main error type for the provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Error creating deployment: {0}")]
    SubmitError(String),

    #[error("Error reading deployment: {0}")]
    FetchError(String),

    #[error("Error stopping deployment: {0}")]
    StopError(String),

    #[error("Timed out waiting for deployment: {0}")]
    Timeout(String),

    #[error("Wait for deployment cancelled: {0}")]
    Cancelled(String),

    #[error("Deployment did not succeed: {0}")]
    DeploymentFailed(String),

    #[error("Invalid transition: {0}")]
    TransitionError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
