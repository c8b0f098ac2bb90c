//! DocumentIngestor - turns uploads into input text or a read-only preview.
//!
//! Ingestion never fails. Conversion problems degrade to a placeholder text
//! so the user can carry on with the rest of the workflow.

use std::sync::Arc;

use super::content::{IngestedContent, IngestionDegraded, IngestionOutcome, UploadedDocument};
use super::html::{data_url, render_html, render_text, StyleMap};
use crate::ports::DocumentConverter;

/// Characters of the data URL kept in the binary fallback placeholder.
const PREVIEW_CHARS: usize = 100;

/// Placeholder when raw text could not be extracted.
pub const RAW_TEXT_FAILURE: &str = "[Could not extract text from file]";

/// Dispatches uploads by format.
///
/// In priority order: `.docx` files are converted, `text/*` content is
/// decoded, anything else becomes a short data-URL preview placeholder.
pub struct DocumentIngestor {
    converter: Arc<dyn DocumentConverter>,
    styles: StyleMap,
}

impl DocumentIngestor {
    pub fn new(converter: Arc<dyn DocumentConverter>) -> Self {
        Self {
            converter,
            styles: StyleMap::default(),
        }
    }

    /// Replaces the element → class mapping used for HTML output.
    pub fn with_style_map(mut self, styles: StyleMap) -> Self {
        self.styles = styles;
        self
    }

    /// Ingests a document, keeping only the content.
    pub fn ingest(&self, document: &UploadedDocument) -> IngestedContent {
        self.ingest_with_report(document).content
    }

    /// Ingests a document; `.docx` becomes structured HTML.
    pub fn ingest_with_report(&self, document: &UploadedDocument) -> IngestionOutcome {
        if document.is_docx() {
            return self.convert_docx(document, DocxOutput::Html);
        }
        self.ingest_non_docx(document)
    }

    /// Ingests a document; `.docx` becomes raw paragraph text.
    pub fn ingest_raw_text(&self, document: &UploadedDocument) -> IngestionOutcome {
        if document.is_docx() {
            return self.convert_docx(document, DocxOutput::RawText);
        }
        self.ingest_non_docx(document)
    }

    fn ingest_non_docx(&self, document: &UploadedDocument) -> IngestionOutcome {
        if document.is_text() {
            decode_text(document)
        } else {
            binary_preview(document)
        }
    }

    fn convert_docx(&self, document: &UploadedDocument, output: DocxOutput) -> IngestionOutcome {
        match self.converter.convert(&document.bytes) {
            Ok(conversion) => {
                for warning in &conversion.warnings {
                    tracing::warn!(filename = %document.filename, warning = %warning, "Document conversion message");
                }
                let content = match output {
                    DocxOutput::Html => {
                        IngestedContent::StructuredHtml(render_html(&conversion.document, &self.styles))
                    }
                    DocxOutput::RawText => IngestedContent::PlainText(render_text(&conversion.document)),
                };
                tracing::debug!(
                    filename = %document.filename,
                    blocks = conversion.document.blocks.len(),
                    images = conversion.document.image_count(),
                    "Document converted"
                );
                IngestionOutcome::converted(content, conversion.warnings)
            }
            Err(err) => {
                tracing::error!(filename = %document.filename, error = %err, "Document conversion failed");
                let placeholder = match output {
                    DocxOutput::Html => format!(
                        "[Error: Could not extract content from {}. Please try again or use a plain text file.]",
                        document.filename
                    ),
                    DocxOutput::RawText => RAW_TEXT_FAILURE.to_string(),
                };
                IngestionOutcome::placeholder(placeholder, IngestionDegraded::new(err.to_string()))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum DocxOutput {
    Html,
    RawText,
}

fn decode_text(document: &UploadedDocument) -> IngestionOutcome {
    let text = String::from_utf8_lossy(&document.bytes);
    let mut warnings = Vec::new();
    if text.contains('\u{FFFD}') && std::str::from_utf8(&document.bytes).is_err() {
        tracing::warn!(filename = %document.filename, "Text upload is not valid UTF-8, invalid bytes replaced");
        warnings.push("Invalid UTF-8 sequences were replaced".to_string());
    }
    IngestionOutcome::converted(IngestedContent::PlainText(text.into_owned()), warnings)
}

fn binary_preview(document: &UploadedDocument) -> IngestionOutcome {
    let content_type = document.effective_content_type();
    let url = data_url(&content_type, &document.bytes);
    let preview: String = url.chars().take(PREVIEW_CHARS).collect();

    tracing::info!(
        filename = %document.filename,
        content_type = %content_type,
        "Unsupported upload type, using preview placeholder"
    );

    IngestionOutcome::placeholder(
        format!("[File Uploaded: {}, Base64: {}...]", document.filename, preview),
        IngestionDegraded::new(format!("unsupported content type {}", content_type)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingestion::model::{Block, Document, Inline};
    use crate::ports::{Conversion, ConversionError};

    // ─────────────────────────────────────────────────────────────────────
    // Stub converters
    // ─────────────────────────────────────────────────────────────────────

    struct FixedConverter(Conversion);

    impl DocumentConverter for FixedConverter {
        fn convert(&self, _bytes: &[u8]) -> Result<Conversion, ConversionError> {
            Ok(self.0.clone())
        }
    }

    struct FailingConverter;

    impl DocumentConverter for FailingConverter {
        fn convert(&self, _bytes: &[u8]) -> Result<Conversion, ConversionError> {
            Err(ConversionError::invalid_document("not a zip archive"))
        }
    }

    fn two_paragraphs() -> Conversion {
        Conversion::new(Document::new(vec![
            Block::Paragraph(vec![Inline::text("First")]),
            Block::Paragraph(vec![Inline::text("Second")]),
        ]))
    }

    fn ingestor(converter: impl DocumentConverter + 'static) -> DocumentIngestor {
        DocumentIngestor::new(Arc::new(converter))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn docx_becomes_structured_html() {
        let outcome = ingestor(FixedConverter(two_paragraphs()))
            .ingest_with_report(&UploadedDocument::new("letter.docx", vec![1]));

        assert_eq!(
            outcome.content,
            IngestedContent::StructuredHtml(
                "<p class=\"mb-2\">First</p><p class=\"mb-2\">Second</p>".to_string()
            )
        );
        assert!(outcome.degraded.is_none());
    }

    #[test]
    fn docx_suffix_wins_over_declared_text_type() {
        let document = UploadedDocument::new("letter.docx", vec![1]).with_content_type("text/plain");
        assert!(ingestor(FixedConverter(two_paragraphs())).ingest(&document).is_html());
    }

    #[test]
    fn failed_docx_conversion_degrades_to_named_placeholder() {
        let outcome = ingestor(FailingConverter)
            .ingest_with_report(&UploadedDocument::new("broken.docx", b"garbage".to_vec()));

        assert_eq!(
            outcome.content,
            IngestedContent::PlainText(
                "[Error: Could not extract content from broken.docx. Please try again or use a plain text file.]"
                    .to_string()
            )
        );
        assert!(outcome.degraded.unwrap().reason.contains("not a zip archive"));
    }

    #[test]
    fn text_uploads_are_decoded() {
        let document = UploadedDocument::new("notes.txt", "Pt stable.\nFor review.".as_bytes().to_vec());
        assert_eq!(
            ingestor(FailingConverter).ingest(&document),
            IngestedContent::PlainText("Pt stable.\nFor review.".to_string())
        );
    }

    #[test]
    fn invalid_utf8_is_replaced_with_warning() {
        let document = UploadedDocument::new("notes.txt", vec![b'o', b'k', 0xff]);
        let outcome = ingestor(FailingConverter).ingest_with_report(&document);

        assert_eq!(outcome.content.as_str(), "ok\u{FFFD}");
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn binary_uploads_become_truncated_preview() {
        let document = UploadedDocument::new("scan.png", vec![0u8; 300]).with_content_type("image/png");
        let outcome = ingestor(FailingConverter).ingest_with_report(&document);

        let text = outcome.content.as_str();
        assert!(text.starts_with("[File Uploaded: scan.png, Base64: data:image/png;base64,AAAA"));
        assert!(text.ends_with("...]"));
        let preview = text
            .trim_start_matches("[File Uploaded: scan.png, Base64: ")
            .trim_end_matches("...]");
        assert_eq!(preview.chars().count(), PREVIEW_CHARS);
        assert!(outcome.degraded.is_some());
    }

    #[test]
    fn converter_warnings_are_reported() {
        let conversion = two_paragraphs().with_warning("Unsupported element: chart");
        let outcome = ingestor(FixedConverter(conversion))
            .ingest_with_report(&UploadedDocument::new("letter.docx", vec![1]));

        assert_eq!(outcome.warnings, vec!["Unsupported element: chart".to_string()]);
        assert!(outcome.degraded.is_none());
    }

    // ─────────────────────────────────────────────────────────────────────
    // Raw text mode
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn raw_text_mode_extracts_paragraph_text() {
        let outcome = ingestor(FixedConverter(two_paragraphs()))
            .ingest_raw_text(&UploadedDocument::new("letter.docx", vec![1]));

        assert_eq!(outcome.content, IngestedContent::PlainText("First\n\nSecond".to_string()));
    }

    #[test]
    fn raw_text_mode_failure_uses_generic_placeholder() {
        let outcome = ingestor(FailingConverter)
            .ingest_raw_text(&UploadedDocument::new("broken.docx", vec![]));

        assert_eq!(outcome.content.as_str(), RAW_TEXT_FAILURE);
        assert!(outcome.degraded.is_some());
    }
}
