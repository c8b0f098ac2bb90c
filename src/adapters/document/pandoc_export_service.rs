//! Export renderers: Pandoc for PDF, docx-rs for Word documents.
//!
//! PDF output pipes an HTML rendition of the result through an external
//! `pandoc` process. Pandoc must be installed for PDF export; when it is
//! missing `to_pdf` returns `ServiceUnavailable`. DOCX output is built
//! in-process and is always available.

use std::io::Cursor;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use docx_rs::{Docx, Paragraph, Run};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::ExportConfig;
use crate::domain::ingestion::html_escape;
use crate::ports::{DocumentExportService, ExportError};

/// Export service using Pandoc for PDF and docx-rs for DOCX.
#[derive(Debug, Clone)]
pub struct PandocExportService {
    /// Path to pandoc executable. If None, will search PATH.
    pandoc_path: Option<String>,
    pdf_engine: String,
    font: String,
    margin: String,
    pdf_timeout_secs: u64,
}

impl PandocExportService {
    pub fn new() -> Self {
        Self::from_config(&ExportConfig::default())
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            pandoc_path: config.pandoc_path.clone(),
            pdf_engine: config.pdf_engine.clone(),
            font: config.pdf_font.clone(),
            margin: config.pdf_margin.clone(),
            pdf_timeout_secs: config.pdf_timeout_secs,
        }
    }

    /// Set a custom path to the Pandoc executable.
    pub fn with_pandoc_path(mut self, path: impl Into<String>) -> Self {
        self.pandoc_path = Some(path.into());
        self
    }

    /// Set the timeout for PDF conversion.
    pub fn with_pdf_timeout(mut self, timeout_secs: u64) -> Self {
        self.pdf_timeout_secs = timeout_secs;
        self
    }

    fn pandoc_command(&self) -> &str {
        self.pandoc_path.as_deref().unwrap_or("pandoc")
    }

    fn pdf_args(&self) -> Vec<String> {
        vec![
            "-f".to_string(),
            "html".to_string(),
            "-t".to_string(),
            "pdf".to_string(),
            format!("--pdf-engine={}", self.pdf_engine),
            "-V".to_string(),
            "papersize=a4".to_string(),
            "-V".to_string(),
            format!("geometry:margin={}", self.margin),
            "-V".to_string(),
            "fontsize=12pt".to_string(),
            "-V".to_string(),
            "linestretch=1.5".to_string(),
            "-V".to_string(),
            format!("mainfont={}", self.font),
        ]
    }

    /// Check if Pandoc is installed and accessible.
    async fn check_pandoc(&self) -> bool {
        let output = Command::new(self.pandoc_command())
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;

        output.map(|o| o.status.success()).unwrap_or(false)
    }

    /// Feeds `html` to Pandoc and collects the PDF. Pandoc's stderr wins over
    /// a broken pipe when it exits before reading all of its input.
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, ExportError> {
        let mut child = Command::new(self.pandoc_command())
            .args(self.pdf_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExportError::pdf_failed(format!("Failed to start Pandoc: {}", e)))?;

        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(html.as_bytes()).await,
            None => Ok(()),
        };

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ExportError::pdf_failed(format!("Pandoc execution failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExportError::pdf_failed(format!(
                "Pandoc returned error: {}",
                stderr.trim()
            )));
        }

        written
            .map_err(|e| ExportError::pdf_failed(format!("Failed to write to Pandoc: {}", e)))?;

        Ok(output.stdout)
    }
}

impl Default for PandocExportService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExportService for PandocExportService {
    async fn to_pdf(&self, text: &str) -> Result<Vec<u8>, ExportError> {
        if !self.check_pandoc().await {
            return Err(ExportError::service_unavailable(
                "Pandoc is not installed. PDF export requires Pandoc. \
                 Install from https://pandoc.org/installing.html",
            ));
        }

        let html = text_to_html(text);
        tokio::time::timeout(Duration::from_secs(self.pdf_timeout_secs), self.render_pdf(&html))
            .await
            .map_err(|_| ExportError::Timeout(self.pdf_timeout_secs))?
    }

    async fn to_docx(&self, text: &str) -> Result<Vec<u8>, ExportError> {
        build_docx(text)
    }

    async fn is_available(&self) -> bool {
        self.check_pandoc().await
    }
}

/// One paragraph, one run, the whole text.
fn build_docx(text: &str) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Cursor::new(Vec::new());
    Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
        .build()
        .pack(&mut buffer)
        .map_err(|e| ExportError::docx_failed(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Blank lines separate `<p>` blocks; single newlines become `<br />`.
fn text_to_html(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    let body: String = normalized
        .split("\n\n")
        .filter(|paragraph| !paragraph.trim().is_empty())
        .map(|paragraph| {
            let escaped = html_escape(paragraph.trim_matches('\n'));
            format!("<p>{}</p>\n", escaped.replace('\n', "<br />"))
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"UTF-8\"><title>Result</title></head>\n<body>\n{}</body>\n</html>\n",
        body
    )
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
