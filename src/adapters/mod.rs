//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `assistants` - hosted assistants REST client and a scripted mock
//! - `document` - DOCX reading, PDF/DOCX rendering
//! - `http` - axum server boundary

pub mod assistants;
pub mod document;
pub mod http;

pub use assistants::{AzureAssistantsClient, AzureAssistantsConfig, MockAssistantService};
pub use document::{DocxConverter, PandocExportService};
pub use http::{app_router, AppState};
