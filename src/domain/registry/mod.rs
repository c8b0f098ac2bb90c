//! Registry module - which assistant serves which use case.

mod errors;
mod assistant_registry;

pub use errors::RegistryError;
pub use assistant_registry::{filter_templates, AssistantRegistry, TemplateAssistant};
