//! Ingestion module - uploaded documents to input text or HTML previews.
//!
//! - `model` - the structural content model converters produce
//! - `html` - HTML and raw-text rendering of the model
//! - `DocumentIngestor` - format dispatch with placeholder fallbacks

mod content;
mod html;
mod ingestor;
pub mod model;

pub use content::{IngestedContent, IngestionDegraded, IngestionOutcome, UploadedDocument};
pub use html::{data_url, html_escape, render_html, render_text, StyleMap};
pub use ingestor::{DocumentIngestor, RAW_TEXT_FAILURE};
pub use model::Document;
