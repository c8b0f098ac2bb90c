//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AssistantService` - hosted assistant threads, runs and listings
//! - `DocumentConverter` - binary document to content model
//! - `DocumentExportService` - PDF and DOCX renderers

mod assistant_service;
mod document_converter;
mod document_export_service;

pub use assistant_service::{
    AssistantService, AssistantServiceError, AssistantSummary, MessageContent, MessageRole,
    RunSnapshot, ThreadMessage,
};
pub use document_converter::{Conversion, ConversionError, DocumentConverter};
pub use document_export_service::{
    DocumentExportService, ExportError, ExportFormat, ExportedDocument,
};
