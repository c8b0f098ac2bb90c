//! Remote assistant service configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Connection settings for the hosted assistants API.
///
/// The API key is only ever read by the HTTP adapter. It is redacted from
/// `Debug` output and never serialized.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantServiceConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,

    /// Versioned API parameter sent with every call
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Static credential for the `api-key` header
    pub api_key: Secret<String>,

    /// Per-call HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AssistantServiceConfig {
    /// Get the per-call timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoint without a trailing slash
    pub fn base_endpoint(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// Validate the assistant service configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.endpoint.trim().is_empty() {
            return Err(ValidationError::MissingRequired("ASSISTANT_SERVICE__ENDPOINT"));
        }
        if !self.endpoint.starts_with("https://") && !self.endpoint.starts_with("http://") {
            return Err(ValidationError::InvalidEndpoint);
        }
        if *environment == Environment::Production && !self.endpoint.starts_with("https://") {
            return Err(ValidationError::EndpointMustBeHttps);
        }
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("ASSISTANT_SERVICE__API_KEY"));
        }
        if self.api_version.trim().is_empty() {
            return Err(ValidationError::MissingRequired("ASSISTANT_SERVICE__API_VERSION"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_api_version() -> String {
    "2024-05-01-preview".to_string()
}

fn default_timeout() -> u64 {
    60
}
