//! Export - result serialization and display.

mod display;
mod serializer;

pub use display::{display_result, markdown_bold_to_html, DisplayFormat, ResultDisplay};
pub use serializer::{ResultSerializer, SerializationError};
