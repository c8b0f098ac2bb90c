//! Application handlers.

pub mod process_submission;

pub use process_submission::{
    ProcessSubmissionCommand, ProcessSubmissionHandler, ProcessSubmissionResult, SubmissionError,
};
