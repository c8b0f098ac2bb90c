//! Orchestration error types.

use thiserror::Error;

use crate::ports::AssistantServiceError;

/// Why an orchestration cycle did not produce a result.
///
/// `Display` renders the text shown to the user in place of a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestrationError {
    /// The remote service could not allocate a thread.
    #[error("Error: could not create a conversation thread: {0}")]
    ThreadCreationFailed(#[source] AssistantServiceError),

    /// The input could not be posted to the thread.
    #[error("Error: could not submit the message: {0}")]
    MessageSubmissionFailed(#[source] AssistantServiceError),

    /// The run reached a terminal status other than `completed`.
    #[error("Run ended with status: {status}")]
    RunEndedAbnormally { status: String },

    /// Any other failure during the cycle.
    #[error("Error: {0}")]
    Unexpected(String),

    /// The caller cancelled the cycle before the run finished.
    #[error("Run was cancelled before it completed")]
    Cancelled,

    /// Polling gave up after the configured ceiling.
    #[error("Error: run did not finish within {waited_secs}s")]
    DeadlineExceeded { waited_secs: u64 },
}

impl OrchestrationError {
    /// Creates an abnormal run end error.
    pub fn run_ended(status: impl Into<String>) -> Self {
        Self::RunEndedAbnormally {
            status: status.into(),
        }
    }

    /// Creates an unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ThreadCreationFailed(_) => "THREAD_CREATION_FAILED",
            Self::MessageSubmissionFailed(_) => "MESSAGE_SUBMISSION_FAILED",
            Self::RunEndedAbnormally { .. } => "RUN_ENDED_ABNORMALLY",
            Self::Unexpected(_) => "ORCHESTRATION_UNEXPECTED_ERROR",
            Self::Cancelled => "CANCELLED",
            Self::DeadlineExceeded { .. } => "DEADLINE_EXCEEDED",
        }
    }
}

impl From<AssistantServiceError> for OrchestrationError {
    fn from(err: AssistantServiceError) -> Self {
        Self::Unexpected(err.to_string())
    }
}
