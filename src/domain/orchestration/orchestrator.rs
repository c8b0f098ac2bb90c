//! RunOrchestrator - drives one submission through the remote assistant service.
//!
//! The cycle is strictly linear:
//!
//! ```text
//! create thread → post message → start run → poll while pending → fetch messages
//! ```
//!
//! Every remote failure is terminal for the cycle; nothing is retried. The
//! poll loop waits a fixed interval between status checks and stops early
//! when the caller's cancellation token fires or the optional deadline passes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use super::errors::OrchestrationError;
use super::result_message::ResultMessage;
use crate::domain::foundation::AssistantId;
use crate::ports::AssistantService;

/// Pacing and result-shaping settings for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Fixed delay between status checks.
    pub poll_interval: Duration,
    /// Ceiling on time spent polling; `None` polls until a terminal status.
    pub max_wait: Option<Duration>,
    /// Assistant whose reply segments are joined with newlines.
    pub joined_assistant: Option<AssistantId>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(8),
            max_wait: None,
            joined_assistant: None,
        }
    }
}

impl OrchestratorConfig {
    /// Sets the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the polling ceiling.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Sets the assistant whose segments are joined.
    pub fn with_joined_assistant(mut self, assistant_id: AssistantId) -> Self {
        self.joined_assistant = Some(assistant_id);
        self
    }
}

/// Executes orchestration cycles against an assistant service.
pub struct RunOrchestrator {
    service: Arc<dyn AssistantService>,
    config: OrchestratorConfig,
}

impl RunOrchestrator {
    pub fn new(service: Arc<dyn AssistantService>, config: OrchestratorConfig) -> Self {
        Self { service, config }
    }

    /// Runs one full cycle for `input` against `assistant_id`.
    ///
    /// # Errors
    ///
    /// - `ThreadCreationFailed` / `MessageSubmissionFailed` for the first two calls
    /// - `RunEndedAbnormally` for any terminal status other than `completed`
    /// - `Cancelled` when `cancel` fires before the cycle finishes
    /// - `DeadlineExceeded` when the configured ceiling passes while polling
    /// - `Unexpected` for every other failure
    pub async fn execute(
        &self,
        input: &str,
        assistant_id: &AssistantId,
        cancel: &CancellationToken,
    ) -> Result<ResultMessage, OrchestrationError> {
        // 1. Create thread
        let thread_id = guarded(cancel, self.service.create_thread())
            .await?
            .map_err(OrchestrationError::ThreadCreationFailed)?;
        tracing::debug!(thread_id = %thread_id, "Thread created");

        // 2. Post the input as the single user message
        guarded(cancel, self.service.post_user_message(&thread_id, input))
            .await?
            .map_err(OrchestrationError::MessageSubmissionFailed)?;

        // 3. Start the run
        let mut run = guarded(cancel, self.service.start_run(&thread_id, assistant_id)).await??;
        tracing::info!(
            thread_id = %thread_id,
            run_id = %run.id,
            assistant_id = %assistant_id,
            status = %run.status,
            "Run started"
        );

        // 4. Poll while pending
        let started = Instant::now();
        let expiry = expires_at(self.config.max_wait.map(|max_wait| started + max_wait));
        tokio::pin!(expiry);
        let mut polls: u32 = 0;

        while run.status.is_pending() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(thread_id = %thread_id, run_id = %run.id, polls, "Run polling cancelled");
                    return Err(OrchestrationError::Cancelled);
                }
                _ = &mut expiry => {
                    tracing::warn!(
                        thread_id = %thread_id,
                        run_id = %run.id,
                        polls,
                        "Run still pending at deadline, giving up"
                    );
                    return Err(OrchestrationError::DeadlineExceeded {
                        waited_secs: started.elapsed().as_secs(),
                    });
                }
                _ = sleep(self.config.poll_interval) => {}
            }

            let run_id = run.id.clone();
            run = tokio::select! {
                biased;
                _ = &mut expiry => {
                    tracing::warn!(thread_id = %thread_id, run_id = %run_id, polls, "Deadline passed during status check");
                    return Err(OrchestrationError::DeadlineExceeded {
                        waited_secs: started.elapsed().as_secs(),
                    });
                }
                polled = guarded(cancel, self.service.get_run(&thread_id, &run_id)) => polled??,
            };
            polls += 1;
            tracing::debug!(run_id = %run.id, status = %run.status, polls, "Run polled");
        }

        // 5. Terminal handling
        if !run.status.is_completed() {
            tracing::warn!(
                thread_id = %thread_id,
                run_id = %run.id,
                status = %run.status,
                "Run ended abnormally"
            );
            return Err(OrchestrationError::run_ended(run.status.as_str()));
        }

        let messages = guarded(cancel, self.service.list_messages(&thread_id)).await??;
        let join = self.config.joined_assistant.as_ref() == Some(assistant_id);
        let result = ResultMessage::from_thread(&messages, join);

        tracing::info!(
            thread_id = %thread_id,
            run_id = %run.id,
            polls,
            empty = result.is_empty(),
            "Run completed"
        );

        Ok(result)
    }
}

/// Resolves once `deadline` passes; never resolves without one.
async fn expires_at(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Races a remote call against cancellation.
async fn guarded<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = T>,
) -> Result<T, OrchestrationError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(OrchestrationError::Cancelled),
        output = call => Ok(output),
    }
}
