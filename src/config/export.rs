//! Export rendering configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Settings for the PDF renderer.
///
/// PDF output is produced by an external `pandoc` binary. Word documents are
/// built in-process and need no configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Path to the pandoc binary; looked up on `PATH` when absent
    pub pandoc_path: Option<String>,

    /// LaTeX engine pandoc uses for PDF output
    #[serde(default = "default_pdf_engine")]
    pub pdf_engine: String,

    /// Body font for PDF output
    #[serde(default = "default_pdf_font")]
    pub pdf_font: String,

    /// Page margin for PDF output (any LaTeX length)
    #[serde(default = "default_pdf_margin")]
    pub pdf_margin: String,

    /// Maximum time a single PDF render may take
    #[serde(default = "default_pdf_timeout")]
    pub pdf_timeout_secs: u64,
}

impl ExportConfig {
    /// Binary used to invoke pandoc
    pub fn pandoc_binary(&self) -> &str {
        self.pandoc_path.as_deref().unwrap_or("pandoc")
    }

    /// Get the render timeout as Duration
    pub fn pdf_timeout(&self) -> Duration {
        Duration::from_secs(self.pdf_timeout_secs)
    }

    /// Validate export configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pdf_timeout_secs == 0 {
            return Err(ValidationError::InvalidExportTimeout);
        }
        if self.pdf_engine.trim().is_empty() {
            return Err(ValidationError::MissingRequired("EXPORT__PDF_ENGINE"));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pandoc_path: None,
            pdf_engine: default_pdf_engine(),
            pdf_font: default_pdf_font(),
            pdf_margin: default_pdf_margin(),
            pdf_timeout_secs: default_pdf_timeout(),
        }
    }
}

fn default_pdf_engine() -> String {
    "xelatex".to_string()
}

fn default_pdf_font() -> String {
    "TeX Gyre Heros".to_string()
}

fn default_pdf_margin() -> String {
    "50pt".to_string()
}

fn default_pdf_timeout() -> u64 {
    30
}
