//! Assistant service adapters.
//!
//! - `AzureAssistantsClient` - REST client for the hosted assistants API
//! - `MockAssistantService` - scripted in-memory service for tests

mod azure_client;
mod mock_service;

pub use azure_client::{AzureAssistantsClient, AzureAssistantsConfig};
pub use mock_service::{MockAssistantService, MockCall, MockOperation};
