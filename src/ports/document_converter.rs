//! Document Converter Port - binary document to content model.
//!
//! Converters are synchronous and CPU-bound; async callers should run them
//! on a blocking thread.

use thiserror::Error;

use crate::domain::ingestion::Document;

/// Port for converting a word-processor document into the content model.
///
/// # Contract
///
/// Implementations must:
/// - Never panic across the boundary (malformed input is an `Err`)
/// - Report elements they could not represent as warnings, not errors
pub trait DocumentConverter: Send + Sync {
    /// Converts raw document bytes.
    fn convert(&self, bytes: &[u8]) -> Result<Conversion, ConversionError>;
}

/// A successful conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    pub document: Document,
    /// Messages about content that was dropped or approximated.
    pub warnings: Vec<String>,
}

impl Conversion {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Errors that can occur during document conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The bytes are not a readable document of the expected format.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The converter crashed on this input.
    #[error("Converter failed: {0}")]
    ConverterPanicked(String),
}

impl ConversionError {
    pub fn invalid_document(reason: impl Into<String>) -> Self {
        Self::InvalidDocument(reason.into())
    }
}
