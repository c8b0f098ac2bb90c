//! Document Export Service Port - renderers for binary export formats.
//!
//! Text and markdown exports are plain byte encodings handled by the domain
//! serializer. PDF and DOCX need a renderer, which this port abstracts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Port for rendering result text into binary document formats.
///
/// # Contract
///
/// Implementations must:
/// - Lay out the full text without reinterpreting it as markup
/// - Report renderer faults as `ExportError`, never panic
#[async_trait]
pub trait DocumentExportService: Send + Sync {
    /// Render the text as an auto-flowing PDF.
    async fn to_pdf(&self, text: &str) -> Result<Vec<u8>, ExportError>;

    /// Render the text as a DOCX package holding a single paragraph.
    async fn to_docx(&self, text: &str) -> Result<Vec<u8>, ExportError>;

    /// Check whether the external renderer (Pandoc) can be reached.
    async fn is_available(&self) -> bool;
}

/// Export formats offered for a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    PlainText,
    Markdown,
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn all() -> [ExportFormat; 4] {
        [
            ExportFormat::PlainText,
            ExportFormat::Markdown,
            ExportFormat::Pdf,
            ExportFormat::Docx,
        ]
    }

    /// Get the MIME content type for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::PlainText => "text/plain;charset=utf-8",
            ExportFormat::Markdown => "text/markdown;charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::PlainText => "txt",
            ExportFormat::Markdown => "md",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    /// Download filename, always `result.<ext>`.
    pub fn filename(&self) -> String {
        format!("result.{}", self.extension())
    }

    /// True for formats that need a renderer behind `DocumentExportService`.
    pub fn is_rendered(&self) -> bool {
        matches!(self, ExportFormat::Pdf | ExportFormat::Docx)
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::PlainText => write!(f, "text"),
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Pdf => write!(f, "pdf"),
            ExportFormat::Docx => write!(f, "docx"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "plain_text" => Ok(ExportFormat::PlainText),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" | "word" => Ok(ExportFormat::Docx),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Exported document with content and download metadata.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub content: Vec<u8>,
    pub content_type: String,
    pub filename: String,
    pub format: ExportFormat,
}

impl ExportedDocument {
    pub fn new(content: Vec<u8>, format: ExportFormat) -> Self {
        Self {
            content,
            content_type: format.content_type().to_string(),
            filename: format.filename(),
            format,
        }
    }

    /// `Content-Disposition` header value for a download.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Errors that can occur during document export.
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// External converter (Pandoc) is not available.
    #[error("Export service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("PDF conversion failed: {0}")]
    PdfConversionFailed(String),

    #[error("DOCX generation failed: {0}")]
    DocxGenerationFailed(String),

    #[error("Conversion timed out after {0} seconds")]
    Timeout(u64),

    #[error("I/O error during export: {0}")]
    IoError(String),
}

impl ExportError {
    pub fn service_unavailable(reason: impl Into<String>) -> Self {
        Self::ServiceUnavailable(reason.into())
    }

    pub fn pdf_failed(reason: impl Into<String>) -> Self {
        Self::PdfConversionFailed(reason.into())
    }

    pub fn docx_failed(reason: impl Into<String>) -> Self {
        Self::DocxGenerationFailed(reason.into())
    }

    pub fn io_error(reason: impl Into<String>) -> Self {
        Self::IoError(reason.into())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    // ───────────────────────────────────────────────────────────────
    // ExportFormat tests
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn filenames_follow_result_convention() {
        assert_eq!(ExportFormat::PlainText.filename(), "result.txt");
        assert_eq!(ExportFormat::Markdown.filename(), "result.md");
        assert_eq!(ExportFormat::Pdf.filename(), "result.pdf");
        assert_eq!(ExportFormat::Docx.filename(), "result.docx");
    }

    #[test]
    fn content_types_are_correct() {
        assert_eq!(ExportFormat::PlainText.content_type(), "text/plain;charset=utf-8");
        assert_eq!(ExportFormat::Markdown.content_type(), "text/markdown;charset=utf-8");
        assert_eq!(ExportFormat::Pdf.content_type(), "application/pdf");
        assert!(ExportFormat::Docx.content_type().contains("wordprocessingml"));
    }

    #[test]
    fn parses_extensions_and_names() {
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::PlainText);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::PlainText);
        assert_eq!("MD".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("docx".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
    }

    #[test]
    fn parse_rejects_unknown_format() {
        let result = "html".parse::<ExportFormat>();
        assert!(matches!(result, Err(ExportError::UnsupportedFormat(_))));
    }

    #[test]
    fn only_pdf_and_docx_need_a_renderer() {
        let rendered: Vec<_> = ExportFormat::all()
            .into_iter()
            .filter(ExportFormat::is_rendered)
            .collect();
        assert_eq!(rendered, vec![ExportFormat::Pdf, ExportFormat::Docx]);
    }

    // ───────────────────────────────────────────────────────────────
    // ExportedDocument tests
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn exported_document_carries_descriptor() {
        let doc = ExportedDocument::new(b"%PDF".to_vec(), ExportFormat::Pdf);
        assert_eq!(doc.filename, "result.pdf");
        assert_eq!(doc.content_type, "application/pdf");
        assert_eq!(doc.content_disposition(), "attachment; filename=\"result.pdf\"");
    }

    #[test]
    fn export_error_displays_messages() {
        let err = ExportError::service_unavailable("Pandoc not found");
        assert!(err.to_string().contains("Pandoc not found"));
        assert_eq!(ExportError::Timeout(30).to_string(), "Conversion timed out after 30 seconds");
    }

    #[test]
    fn document_export_service_is_object_safe() {
        fn check<T: DocumentExportService + ?Sized>() {}
        check::<dyn DocumentExportService>();
    }
}
