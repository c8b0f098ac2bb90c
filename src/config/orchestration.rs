//! Run orchestration configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Poll pacing for assistant runs
#[derive(Debug, Clone, Deserialize)]
pub struct OrchestrationConfig {
    /// Fixed delay between run status checks
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Optional ceiling on the total time spent polling one run.
    /// When absent, polling continues until the run reaches a terminal status.
    pub max_wait_secs: Option<u64>,
}

impl OrchestrationConfig {
    /// Get the poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Get the polling ceiling as Duration, if any
    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait_secs.map(Duration::from_secs)
    }

    /// Validate orchestration configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_interval_secs == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if let Some(max_wait) = self.max_wait_secs {
            if max_wait < self.poll_interval_secs {
                return Err(ValidationError::InvalidMaxWait);
            }
        }
        Ok(())
    }
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            max_wait_secs: None,
        }
    }
}

fn default_poll_interval() -> u64 {
    8
}
