//! Registry error types.

use thiserror::Error;

use crate::domain::foundation::UseCase;

/// Errors raised while resolving or discovering assistants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No fixed assignment and no manual selection for the use case.
    #[error("No assistant available for use case '{use_case}'; select a template first")]
    UnresolvedAssistant { use_case: UseCase },

    /// The remote assistant listing could not be fetched.
    #[error("Assistant registry unavailable: {0}")]
    RegistryUnavailable(String),
}

impl RegistryError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnresolvedAssistant { .. } => "UNRESOLVED_ASSISTANT",
            Self::RegistryUnavailable(_) => "REGISTRY_UNAVAILABLE",
        }
    }
}
