//! Request and response bodies for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::export::DisplayFormat;
use crate::domain::foundation::UseCase;
use crate::domain::registry::TemplateAssistant;

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/process`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessRequest {
    pub input: String,
    pub use_case: String,
    /// Selected template assistant; blank means none.
    #[serde(default)]
    pub assistant_id: Option<String>,
}

/// Query of `POST /api/documents`.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentQuery {
    pub filename: String,
    #[serde(default)]
    pub mode: IngestMode,
}

/// How `.docx` uploads are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestMode {
    #[default]
    Html,
    RawText,
}

/// Body of `POST /api/export/:format`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportRequest {
    pub text: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UseCaseResponse {
    pub id: &'static str,
    pub title: &'static str,
    pub requires_template: bool,
}

impl From<UseCase> for UseCaseResponse {
    fn from(use_case: UseCase) -> Self {
        Self {
            id: use_case.as_str(),
            title: use_case.title(),
            requires_template: use_case.requires_template(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UseCaseListResponse {
    pub use_cases: Vec<UseCaseResponse>,
}

/// Template assistants, with the first one pre-selected.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateAssistant>,
    pub default_template_id: Option<String>,
}

impl From<Vec<TemplateAssistant>> for TemplateListResponse {
    fn from(templates: Vec<TemplateAssistant>) -> Self {
        let default_template_id = templates.first().map(|t| t.id.to_string());
        Self {
            templates,
            default_template_id,
        }
    }
}

/// Result of `POST /api/process`.
///
/// `ok = false` means the cycle ran but failed; `result` then holds the
/// error text shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResponse {
    pub ok: bool,
    pub result: String,
    pub format: DisplayFormat,
    pub assistant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
