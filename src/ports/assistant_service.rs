//! Assistant Service Port - Interface to the hosted assistants API.
//!
//! The remote service owns threads, runs and assistants. This port exposes
//! the handful of calls a single orchestration cycle needs, plus assistant
//! discovery for template selection.
//!
//! # Design
//!
//! - One method per remote call, no retries (every failure is terminal for a cycle)
//! - Remote identifiers are wrapped in domain newtypes
//! - Run status is passed through verbatim; the domain decides what is terminal

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AssistantId, RunId, ThreadId};
use crate::domain::orchestration::RunStatus;

/// Port for the remote conversational assistant service.
#[async_trait]
pub trait AssistantService: Send + Sync {
    /// Allocates a fresh conversation thread.
    async fn create_thread(&self) -> Result<ThreadId, AssistantServiceError>;

    /// Appends a user-role message to a thread.
    async fn post_user_message(
        &self,
        thread_id: &ThreadId,
        content: &str,
    ) -> Result<(), AssistantServiceError>;

    /// Starts executing an assistant against a thread.
    async fn start_run(
        &self,
        thread_id: &ThreadId,
        assistant_id: &AssistantId,
    ) -> Result<RunSnapshot, AssistantServiceError>;

    /// Fetches the current state of a run.
    async fn get_run(
        &self,
        thread_id: &ThreadId,
        run_id: &RunId,
    ) -> Result<RunSnapshot, AssistantServiceError>;

    /// Lists every message on a thread in the order the service returns them.
    async fn list_messages(
        &self,
        thread_id: &ThreadId,
    ) -> Result<Vec<ThreadMessage>, AssistantServiceError>;

    /// Lists the assistants visible to the configured credential.
    async fn list_assistants(&self) -> Result<Vec<AssistantSummary>, AssistantServiceError>;
}

/// A run as last observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSnapshot {
    pub id: RunId,
    pub status: RunStatus,
}

impl RunSnapshot {
    pub fn new(id: RunId, status: impl Into<RunStatus>) -> Self {
        Self {
            id,
            status: status.into(),
        }
    }
}

/// Author of a thread message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One content part of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// A text part.
    Text(String),
    /// Any non-text part (image file, attachment...), identified by its type.
    Other(String),
}

impl MessageContent {
    /// Text value of the part, if it is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            MessageContent::Other(_) => None,
        }
    }
}

/// A message on a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    pub role: MessageRole,
    pub content: Vec<MessageContent>,
}

impl ThreadMessage {
    /// Creates an assistant message with a single text part.
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: vec![MessageContent::Text(text.into())],
        }
    }

    /// Creates a user message with a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: vec![MessageContent::Text(text.into())],
        }
    }
}

/// An assistant as listed by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantSummary {
    pub id: AssistantId,
    pub name: Option<String>,
}

impl AssistantSummary {
    pub fn new(id: AssistantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }
}

/// Assistant service errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssistantServiceError {
    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// API key rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Non-success HTTP status.
    #[error("service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Failed to parse a service response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl AssistantServiceError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_content_exposes_text_only_for_text_parts() {
        assert_eq!(MessageContent::Text("hi".into()).as_text(), Some("hi"));
        assert_eq!(MessageContent::Other("image_file".into()).as_text(), None);
    }

    #[test]
    fn error_messages_are_readable() {
        assert_eq!(
            AssistantServiceError::status(404, "no such thread").to_string(),
            "service returned 404: no such thread"
        );
        assert_eq!(
            AssistantServiceError::Timeout { timeout_secs: 60 }.to_string(),
            "request timed out after 60s"
        );
    }

    #[test]
    fn run_snapshot_accepts_raw_status() {
        let snapshot = RunSnapshot::new(RunId::new("run_1").unwrap(), "queued");
        assert!(snapshot.status.is_pending());
    }
}
