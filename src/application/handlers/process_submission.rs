//! ProcessSubmissionHandler - resolves an assistant and runs one cycle.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::domain::export::{display_result, ResultDisplay};
use crate::domain::foundation::{AssistantId, UseCase};
use crate::domain::orchestration::{OrchestrationError, ResultMessage, RunOrchestrator};
use crate::domain::registry::{AssistantRegistry, RegistryError};

/// Command to process one submission.
#[derive(Debug, Clone)]
pub struct ProcessSubmissionCommand {
    pub input: String,
    pub use_case: UseCase,
    /// Manually selected template assistant, if any.
    pub assistant_id: Option<AssistantId>,
}

/// Outcome of a submission that reached the assistant service.
///
/// Orchestration failures are carried here rather than as `Err`: their text
/// is what the user sees in place of a result.
#[derive(Debug, Clone)]
pub struct ProcessSubmissionResult {
    pub assistant_id: AssistantId,
    pub display: ResultDisplay,
    pub error: Option<OrchestrationError>,
}

impl ProcessSubmissionResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Submission rejected before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Input is empty")]
    EmptyInput,

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl SubmissionError {
    pub fn code(&self) -> &'static str {
        match self {
            SubmissionError::EmptyInput => "EMPTY_INPUT",
            SubmissionError::Registry(err) => err.code(),
        }
    }
}

/// Handler for processing submissions.
pub struct ProcessSubmissionHandler {
    registry: Arc<AssistantRegistry>,
    orchestrator: Arc<RunOrchestrator>,
}

impl ProcessSubmissionHandler {
    pub fn new(registry: Arc<AssistantRegistry>, orchestrator: Arc<RunOrchestrator>) -> Self {
        Self {
            registry,
            orchestrator,
        }
    }

    pub async fn handle(
        &self,
        cmd: ProcessSubmissionCommand,
        cancel: &CancellationToken,
    ) -> Result<ProcessSubmissionResult, SubmissionError> {
        // 1. Reject blank input before touching the remote service
        if cmd.input.trim().is_empty() {
            return Err(SubmissionError::EmptyInput);
        }

        // 2. Resolve the assistant
        let assistant_id = self
            .registry
            .resolve(cmd.use_case, cmd.assistant_id.as_ref())?;

        // 3. Run the cycle
        tracing::info!(
            use_case = %cmd.use_case,
            assistant_id = %assistant_id,
            input_len = cmd.input.len(),
            "Processing submission"
        );
        let outcome = self
            .orchestrator
            .execute(&cmd.input, &assistant_id, cancel)
            .await;

        // 4. Prepare for display
        Ok(match outcome {
            Ok(result) => ProcessSubmissionResult {
                assistant_id,
                display: display_for(cmd.use_case, &result),
                error: None,
            },
            Err(err) => {
                tracing::warn!(use_case = %cmd.use_case, code = err.code(), error = %err, "Submission failed");
                ProcessSubmissionResult {
                    assistant_id,
                    display: ResultDisplay::text(err.to_string()),
                    error: Some(err),
                }
            }
        })
    }
}

fn display_for(use_case: UseCase, result: &ResultMessage) -> ResultDisplay {
    match result {
        ResultMessage::NoContent => ResultDisplay::text(result.display_text()),
        _ => display_result(use_case, &result.display_text()),
    }
}
