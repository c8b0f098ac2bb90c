//! Document adapters.
//!
//! - `DocxConverter` - reads `.docx` uploads into the content model
//! - `PandocExportService` - renders results as PDF (Pandoc) and DOCX

mod docx_converter;
mod pandoc_export_service;

pub use docx_converter::DocxConverter;
pub use pandoc_export_service::PandocExportService;
