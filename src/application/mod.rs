//! Application layer - command handlers.
//!
//! Handlers compose domain services for one user interaction.

pub mod handlers;

pub use handlers::{
    ProcessSubmissionCommand, ProcessSubmissionHandler, ProcessSubmissionResult, SubmissionError,
};
