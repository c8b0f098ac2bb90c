//! Run status reported by the remote assistant service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a run.
///
/// The remote service owns the set of statuses. Only `queued` and
/// `in_progress` are treated as pending; every other value, including ones
/// this crate has never seen, is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
    Cancelled,
    Expired,
    /// Any status string not listed above, kept verbatim.
    Other(String),
}

impl RunStatus {
    /// True while the run still has work to do and must be polled again.
    pub fn is_pending(&self) -> bool {
        matches!(self, RunStatus::Queued | RunStatus::InProgress)
    }

    /// True when the run finished successfully.
    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }

    /// The literal status string as reported by the service.
    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Expired => "expired",
            RunStatus::Other(status) => status,
        }
    }
}

impl From<String> for RunStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "queued" => RunStatus::Queued,
            "in_progress" => RunStatus::InProgress,
            "completed" => RunStatus::Completed,
            "failed" => RunStatus::Failed,
            "cancelled" => RunStatus::Cancelled,
            "expired" => RunStatus::Expired,
            _ => RunStatus::Other(value),
        }
    }
}

impl From<&str> for RunStatus {
    fn from(value: &str) -> Self {
        RunStatus::from(value.to_string())
    }
}

impl From<RunStatus> for String {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_queued_and_in_progress_are_pending() {
        assert!(RunStatus::Queued.is_pending());
        assert!(RunStatus::InProgress.is_pending());
        assert!(!RunStatus::Completed.is_pending());
        assert!(!RunStatus::Failed.is_pending());
        assert!(!RunStatus::Cancelled.is_pending());
        assert!(!RunStatus::Expired.is_pending());
    }

    #[test]
    fn unknown_statuses_are_terminal_and_kept_verbatim() {
        let status = RunStatus::from("requires_action");
        assert_eq!(status, RunStatus::Other("requires_action".to_string()));
        assert!(!status.is_pending());
        assert!(!status.is_completed());
        assert_eq!(status.to_string(), "requires_action");
    }

    #[test]
    fn deserializes_from_wire_strings() {
        let status: RunStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, RunStatus::InProgress);

        let status: RunStatus = serde_json::from_str("\"cancelling\"").unwrap();
        assert_eq!(status.as_str(), "cancelling");
    }

    #[test]
    fn serializes_to_wire_strings() {
        assert_eq!(
            serde_json::to_string(&RunStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&RunStatus::Other("incomplete".into())).unwrap(),
            "\"incomplete\""
        );
    }
}
