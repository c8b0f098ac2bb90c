//! Foundation module - Shared domain primitives.
//!
//! Identifiers handed out by the remote assistant service, the use-case
//! catalogue, and value object validation errors.

mod errors;
mod ids;
mod use_case;

pub use errors::ValidationError;
pub use ids::{AssistantId, RunId, ThreadId};
pub use use_case::UseCase;
