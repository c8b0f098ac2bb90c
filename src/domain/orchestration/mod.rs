//! Orchestration module - the thread/run lifecycle for one submission.
//!
//! - `RunStatus` - remote run status with the pending/terminal split
//! - `ResultMessage` - the assistant reply extracted from a completed thread
//! - `RunOrchestrator` - the create → post → run → poll → fetch state machine
//! - `OrchestrationError` - tagged failures, rendered verbatim to users

mod errors;
mod orchestrator;
mod result_message;
mod run_status;

pub use errors::OrchestrationError;
pub use orchestrator::{OrchestratorConfig, RunOrchestrator};
pub use result_message::{ResultMessage, NO_CONTENT_TEXT};
pub use run_status::RunStatus;
