//! Mock assistant service for testing.
//!
//! Provides a scripted implementation of the AssistantService port so the
//! orchestration state machine can be exercised without a remote service.
//!
//! # Features
//!
//! - Scripted run status sequence (first entry answers `start_run`)
//! - Canned thread messages and assistant listing
//! - Error injection per operation
//! - Simulated latency for cancellation testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let service = MockAssistantService::new()
//!     .with_statuses(["queued", "in_progress", "completed"])
//!     .with_message(ThreadMessage::assistant_text("Done"));
//!
//! let result = orchestrator.execute("notes", &assistant_id, &cancel).await?;
//! assert_eq!(service.poll_count(), 2);
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::{AssistantId, RunId, ThreadId};
use crate::domain::orchestration::RunStatus;
use crate::ports::{
    AssistantService, AssistantServiceError, AssistantSummary, RunSnapshot, ThreadMessage,
};

/// Remote operations the mock can fail on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    CreateThread,
    PostMessage,
    StartRun,
    GetRun,
    ListMessages,
    ListAssistants,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    CreateThread,
    PostMessage { thread_id: ThreadId, content: String },
    StartRun { thread_id: ThreadId, assistant_id: AssistantId },
    GetRun { thread_id: ThreadId, run_id: RunId },
    ListMessages { thread_id: ThreadId },
    ListAssistants,
}

/// Scripted assistant service.
#[derive(Debug, Clone)]
pub struct MockAssistantService {
    thread_id: ThreadId,
    run_id: RunId,
    /// Statuses consumed in order; the last one repeats once the queue drains.
    statuses: Arc<Mutex<VecDeque<RunStatus>>>,
    last_status: Arc<Mutex<RunStatus>>,
    messages: Vec<ThreadMessage>,
    assistants: Vec<AssistantSummary>,
    failures: HashMap<MockOperation, AssistantServiceError>,
    delay: Duration,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl Default for MockAssistantService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAssistantService {
    /// Creates a mock whose runs complete immediately with no messages.
    pub fn new() -> Self {
        Self {
            thread_id: ThreadId::new("thread_mock").expect("static id"),
            run_id: RunId::new("run_mock").expect("static id"),
            statuses: Arc::new(Mutex::new(VecDeque::new())),
            last_status: Arc::new(Mutex::new(RunStatus::Completed)),
            messages: Vec::new(),
            assistants: Vec::new(),
            failures: HashMap::new(),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Scripts the run status sequence. The first status answers `start_run`,
    /// the rest answer successive `get_run` calls.
    pub fn with_statuses<I, S>(self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<RunStatus>,
    {
        let mut queue = self.statuses.lock().unwrap();
        queue.extend(statuses.into_iter().map(Into::into));
        drop(queue);
        self
    }

    /// Adds a message returned by `list_messages`.
    pub fn with_message(mut self, message: ThreadMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Adds an assistant returned by `list_assistants`.
    pub fn with_assistant(mut self, id: &str, name: &str) -> Self {
        self.assistants.push(AssistantSummary::new(
            AssistantId::new(id).expect("mock assistant id must not be blank"),
            name,
        ));
        self
    }

    /// Makes an operation fail with the given error.
    pub fn with_failure(mut self, operation: MockOperation, error: AssistantServiceError) -> Self {
        self.failures.insert(operation, error);
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this service.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns the number of run status polls (`get_run` calls).
    pub fn poll_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, MockCall::GetRun { .. }))
            .count()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: MockCall, operation: MockOperation) -> Result<(), AssistantServiceError> {
        self.calls.lock().unwrap().push(call);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.failures.get(&operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn next_status(&self) -> RunStatus {
        let mut last = self.last_status.lock().unwrap();
        if let Some(status) = self.statuses.lock().unwrap().pop_front() {
            *last = status;
        }
        last.clone()
    }
}

#[async_trait]
impl AssistantService for MockAssistantService {
    async fn create_thread(&self) -> Result<ThreadId, AssistantServiceError> {
        self.record(MockCall::CreateThread, MockOperation::CreateThread)
            .await?;
        Ok(self.thread_id.clone())
    }

    async fn post_user_message(
        &self,
        thread_id: &ThreadId,
        content: &str,
    ) -> Result<(), AssistantServiceError> {
        self.record(
            MockCall::PostMessage {
                thread_id: thread_id.clone(),
                content: content.to_string(),
            },
            MockOperation::PostMessage,
        )
        .await
    }

    async fn start_run(
        &self,
        thread_id: &ThreadId,
        assistant_id: &AssistantId,
    ) -> Result<RunSnapshot, AssistantServiceError> {
        self.record(
            MockCall::StartRun {
                thread_id: thread_id.clone(),
                assistant_id: assistant_id.clone(),
            },
            MockOperation::StartRun,
        )
        .await?;
        Ok(RunSnapshot::new(self.run_id.clone(), self.next_status()))
    }

    async fn get_run(
        &self,
        thread_id: &ThreadId,
        run_id: &RunId,
    ) -> Result<RunSnapshot, AssistantServiceError> {
        self.record(
            MockCall::GetRun {
                thread_id: thread_id.clone(),
                run_id: run_id.clone(),
            },
            MockOperation::GetRun,
        )
        .await?;
        Ok(RunSnapshot::new(run_id.clone(), self.next_status()))
    }

    async fn list_messages(
        &self,
        thread_id: &ThreadId,
    ) -> Result<Vec<ThreadMessage>, AssistantServiceError> {
        self.record(
            MockCall::ListMessages {
                thread_id: thread_id.clone(),
            },
            MockOperation::ListMessages,
        )
        .await?;
        Ok(self.messages.clone())
    }

    async fn list_assistants(&self) -> Result<Vec<AssistantSummary>, AssistantServiceError> {
        self.record(MockCall::ListAssistants, MockOperation::ListAssistants)
            .await?;
        Ok(self.assistants.clone())
    }
}
