//! Result serialization into downloadable documents.

use std::sync::Arc;

use thiserror::Error;

use crate::ports::{DocumentExportService, ExportError, ExportFormat, ExportedDocument};

/// A requested export could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    #[error("Could not produce {format} export: {reason}")]
    SerializationFailed { format: ExportFormat, reason: String },

    /// The renderer for this format is not installed or reachable.
    #[error("{format} export is currently unavailable: {reason}")]
    RendererUnavailable { format: ExportFormat, reason: String },
}

impl SerializationError {
    pub fn code(&self) -> &'static str {
        match self {
            SerializationError::SerializationFailed { .. } => "SERIALIZATION_FAILED",
            SerializationError::RendererUnavailable { .. } => "EXPORT_UNAVAILABLE",
        }
    }

    pub fn format(&self) -> ExportFormat {
        match self {
            SerializationError::SerializationFailed { format, .. }
            | SerializationError::RendererUnavailable { format, .. } => *format,
        }
    }

    fn from_export(format: ExportFormat, err: ExportError) -> Self {
        match err {
            ExportError::ServiceUnavailable(reason) => {
                SerializationError::RendererUnavailable { format, reason }
            }
            other => SerializationError::SerializationFailed {
                format,
                reason: other.to_string(),
            },
        }
    }
}

/// Turns result text into export byte streams.
///
/// Text and markdown are encoded directly. PDF and DOCX go through the
/// renderer; a renderer fault is logged and returned to the caller.
pub struct ResultSerializer {
    renderer: Arc<dyn DocumentExportService>,
}

impl ResultSerializer {
    pub fn new(renderer: Arc<dyn DocumentExportService>) -> Self {
        Self { renderer }
    }

    pub async fn serialize(
        &self,
        text: &str,
        format: ExportFormat,
    ) -> Result<ExportedDocument, SerializationError> {
        let rendered = match format {
            ExportFormat::PlainText | ExportFormat::Markdown => Ok(text.as_bytes().to_vec()),
            ExportFormat::Pdf => self.renderer.to_pdf(text).await,
            ExportFormat::Docx => self.renderer.to_docx(text).await,
        };

        match rendered {
            Ok(content) => {
                tracing::debug!(format = %format, size = content.len(), "Result serialized");
                Ok(ExportedDocument::new(content, format))
            }
            Err(err) => {
                tracing::error!(format = %format, error = %err, "Failed to serialize result");
                Err(SerializationError::from_export(format, err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Renderer stub recording which formats were requested.
    #[derive(Default)]
    struct StubRenderer {
        pdf: Option<ExportError>,
        calls: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl DocumentExportService for StubRenderer {
        async fn to_pdf(&self, _text: &str) -> Result<Vec<u8>, ExportError> {
            self.calls.lock().unwrap().push("pdf");
            match &self.pdf {
                Some(err) => Err(err.clone()),
                None => Ok(b"%PDF-stub".to_vec()),
            }
        }

        async fn to_docx(&self, _text: &str) -> Result<Vec<u8>, ExportError> {
            self.calls.lock().unwrap().push("docx");
            Ok(b"PK-stub".to_vec())
        }

        async fn is_available(&self) -> bool {
            true
        }
    }

    fn serializer_with(renderer: StubRenderer) -> (ResultSerializer, Arc<StubRenderer>) {
        let renderer = Arc::new(renderer);
        (ResultSerializer::new(renderer.clone()), renderer)
    }

    #[tokio::test]
    async fn plain_text_round_trips_unchanged() {
        let (serializer, renderer) = serializer_with(StubRenderer::default());
        let text = "Línea 1\n\n**Plan:** rest & fluids <24h>";

        let doc = serializer.serialize(text, ExportFormat::PlainText).await.unwrap();

        assert_eq!(String::from_utf8(doc.content).unwrap(), text);
        assert_eq!(doc.filename, "result.txt");
        assert!(renderer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn markdown_is_not_escaped() {
        let (serializer, _) = serializer_with(StubRenderer::default());

        let doc = serializer.serialize("# *raw*", ExportFormat::Markdown).await.unwrap();

        assert_eq!(doc.content, b"# *raw*");
        assert_eq!(doc.content_type, "text/markdown;charset=utf-8");
    }

    #[tokio::test]
    async fn pdf_and_docx_use_renderer() {
        let (serializer, renderer) = serializer_with(StubRenderer::default());

        let pdf = serializer.serialize("x", ExportFormat::Pdf).await.unwrap();
        let docx = serializer.serialize("x", ExportFormat::Docx).await.unwrap();

        assert_eq!(pdf.content, b"%PDF-stub");
        assert_eq!(docx.filename, "result.docx");
        assert_eq!(*renderer.calls.lock().unwrap(), vec!["pdf", "docx"]);
    }

    #[tokio::test]
    async fn renderer_failure_is_returned() {
        let (serializer, _) = serializer_with(StubRenderer {
            pdf: Some(ExportError::pdf_failed("engine crashed")),
            ..Default::default()
        });

        let err = serializer.serialize("x", ExportFormat::Pdf).await.unwrap_err();

        assert_eq!(err.code(), "SERIALIZATION_FAILED");
        assert_eq!(err.format(), ExportFormat::Pdf);
        assert!(err.to_string().contains("engine crashed"));
    }

    #[tokio::test]
    async fn missing_renderer_is_unavailable() {
        let (serializer, _) = serializer_with(StubRenderer {
            pdf: Some(ExportError::service_unavailable("Pandoc is not installed")),
            ..Default::default()
        });

        let err = serializer.serialize("x", ExportFormat::Pdf).await.unwrap_err();

        assert!(matches!(err, SerializationError::RendererUnavailable { .. }));
    }
}
