//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CLINICAL_SYNTH` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use clinical_synth::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod assistant_service;
mod error;
mod export;
mod orchestration;
mod registry;
mod server;

pub use assistant_service::AssistantServiceConfig;
pub use error::{ConfigError, ValidationError};
pub use export::ExportConfig;
pub use orchestration::OrchestrationConfig;
pub use registry::RegistryConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;
use std::time::Duration;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, limits)
    #[serde(default)]
    pub server: ServerConfig,

    /// Hosted assistant service connection (endpoint, API version, key)
    pub assistant_service: AssistantServiceConfig,

    /// Use-case assignments and template discovery
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Run polling behaviour
    #[serde(default)]
    pub orchestration: OrchestrationConfig,

    /// Export renderers
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CLINICAL_SYNTH` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CLINICAL_SYNTH__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CLINICAL_SYNTH__ASSISTANT_SERVICE__ENDPOINT=...` -> `assistant_service.endpoint = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CLINICAL_SYNTH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.assistant_service.validate(&self.server.environment)?;
        self.registry.validate()?;
        self.orchestration.validate()?;
        if self.run_deadline() < self.orchestration.poll_interval() {
            return Err(ValidationError::InvalidMaxWait);
        }
        self.export.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Ceiling on polling one run. Falls back to the request timeout so an
    /// unset `max_wait_secs` never leaves a run unbounded.
    pub fn run_deadline(&self) -> Duration {
        self.orchestration
            .max_wait()
            .unwrap_or_else(|| self.server.request_timeout())
    }
}
