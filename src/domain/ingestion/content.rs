//! Uploaded documents and the content ingestion produces from them.

use serde::Serialize;

/// A file as uploaded by the user. Held in memory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    pub filename: String,
    /// Declared content type, if the client sent one.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    /// Sets the declared content type. Blank values are ignored.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        let content_type = content_type.into();
        if !content_type.trim().is_empty() {
            self.content_type = Some(content_type);
        }
        self
    }

    /// True when the filename carries a `.docx` suffix (any case).
    pub fn is_docx(&self) -> bool {
        self.filename.to_ascii_lowercase().ends_with(".docx")
    }

    /// Declared content type, falling back to one guessed from the filename.
    pub fn effective_content_type(&self) -> String {
        match &self.content_type {
            Some(declared) => declared.clone(),
            None => mime_guess::from_path(&self.filename)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        }
    }

    /// True when the effective content type is `text/*`.
    pub fn is_text(&self) -> bool {
        self.effective_content_type()
            .to_ascii_lowercase()
            .starts_with("text/")
    }
}

/// What ingestion produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum IngestedContent {
    /// Text usable directly as input.
    PlainText(String),
    /// Read-only HTML preview with inline images.
    StructuredHtml(String),
}

impl IngestedContent {
    /// The text or HTML payload.
    pub fn as_str(&self) -> &str {
        match self {
            IngestedContent::PlainText(text) => text,
            IngestedContent::StructuredHtml(html) => html,
        }
    }

    pub fn is_html(&self) -> bool {
        matches!(self, IngestedContent::StructuredHtml(_))
    }

    /// Appends this content to an existing input, separated by a blank line.
    pub fn append_to(&self, input: &str) -> String {
        format!("{}\n\n{}", input, self.as_str())
    }
}

/// Why ingestion fell back to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("ingestion degraded: {reason}")]
pub struct IngestionDegraded {
    pub reason: String,
}

impl IngestionDegraded {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Ingestion result with diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestionOutcome {
    pub content: IngestedContent,
    /// Set when `content` is a placeholder rather than the document's content.
    pub degraded: Option<IngestionDegraded>,
    /// Converter messages about content that could not be represented.
    pub warnings: Vec<String>,
}

impl IngestionOutcome {
    pub fn converted(content: IngestedContent, warnings: Vec<String>) -> Self {
        Self {
            content,
            degraded: None,
            warnings,
        }
    }

    pub fn placeholder(text: String, degraded: IngestionDegraded) -> Self {
        Self {
            content: IngestedContent::PlainText(text),
            degraded: Some(degraded),
            warnings: Vec::new(),
        }
    }
}
