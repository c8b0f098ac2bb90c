//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Upload limit must be greater than zero")]
    InvalidUploadLimit,

    #[error("Invalid assistant service endpoint")]
    InvalidEndpoint,

    #[error("Assistant service endpoint must use HTTPS in production")]
    EndpointMustBeHttps,

    #[error("Template prefix cannot be empty")]
    EmptyTemplatePrefix,

    #[error("Assistant id for '{0}' cannot be blank")]
    BlankAssistantId(&'static str),

    #[error("Poll interval must be greater than zero")]
    InvalidPollInterval,

    #[error("Maximum wait must be at least one poll interval")]
    InvalidMaxWait,

    #[error("Invalid export timeout")]
    InvalidExportTimeout,
}
