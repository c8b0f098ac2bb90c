//! Extraction of the assistant's reply from a completed thread.

use serde::Serialize;

use crate::ports::{MessageRole, ThreadMessage};

/// Shown when a completed run produced no assistant text.
pub const NO_CONTENT_TEXT: &str = "No response content available";

/// The assistant's reply to one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResultMessage {
    /// Reply segments joined with newlines into one text.
    Joined(String),
    /// Reply segments kept as returned, for display logic to handle.
    Segments(Vec<String>),
    /// The run completed without any assistant text.
    NoContent,
}

impl ResultMessage {
    /// Builds the result from a thread's messages.
    ///
    /// Keeps assistant-authored messages that have at least one content
    /// part and whose first part is text, in service order. With
    /// `join_segments` the texts are joined with `\n`.
    pub fn from_thread(messages: &[ThreadMessage], join_segments: bool) -> Self {
        let segments: Vec<String> = messages
            .iter()
            .filter(|message| message.role == MessageRole::Assistant)
            .filter_map(|message| message.content.first())
            .filter_map(|part| part.as_text())
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            return ResultMessage::NoContent;
        }

        if join_segments {
            let joined = segments.join("\n");
            if joined.is_empty() {
                ResultMessage::NoContent
            } else {
                ResultMessage::Joined(joined)
            }
        } else {
            ResultMessage::Segments(segments)
        }
    }

    /// True when the run produced no assistant text.
    pub fn is_empty(&self) -> bool {
        matches!(self, ResultMessage::NoContent)
    }

    /// Text shown to the user. Segments are concatenated without a
    /// separator, the way a list of text nodes renders.
    pub fn display_text(&self) -> String {
        match self {
            ResultMessage::Joined(text) => text.clone(),
            ResultMessage::Segments(segments) => segments.concat(),
            ResultMessage::NoContent => NO_CONTENT_TEXT.to_string(),
        }
    }
}
