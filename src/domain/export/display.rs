//! Result display helpers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::domain::foundation::UseCase;
use crate::domain::ingestion::html_escape;

static BOLD_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"));

/// How a result should be shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    Text,
    Html,
}

/// Result text prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultDisplay {
    pub format: DisplayFormat,
    pub content: String,
}

impl ResultDisplay {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            format: DisplayFormat::Text,
            content: content.into(),
        }
    }
}

/// Escapes the text, then turns `**span**` into `<strong>span</strong>`.
/// Spans do not cross line breaks.
pub fn markdown_bold_to_html(text: &str) -> String {
    let escaped = html_escape(text);
    BOLD_SPAN
        .replace_all(&escaped, "<strong>$1</strong>")
        .into_owned()
}

/// Prepares a successful result for the given use case.
pub fn display_result(use_case: UseCase, text: &str) -> ResultDisplay {
    if use_case.renders_markup() {
        ResultDisplay {
            format: DisplayFormat::Html,
            content: markdown_bold_to_html(text),
        }
    } else {
        ResultDisplay::text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_spans_become_strong() {
        assert_eq!(
            markdown_bold_to_html("**Diagnosis:** pneumonia"),
            "<strong>Diagnosis:</strong> pneumonia"
        );
    }

    #[test]
    fn bold_matching_is_non_greedy() {
        assert_eq!(
            markdown_bold_to_html("**a** and **b**"),
            "<strong>a</strong> and <strong>b</strong>"
        );
    }

    #[test]
    fn markup_is_escaped_before_bolding() {
        assert_eq!(
            markdown_bold_to_html("**<b>** x < y"),
            "<strong>&lt;b&gt;</strong> x &lt; y"
        );
    }

    #[test]
    fn unbalanced_markers_are_left_alone() {
        assert_eq!(markdown_bold_to_html("**open"), "**open");
    }

    #[test]
    fn only_summary_displays_html() {
        let summary = display_result(UseCase::Summary, "**Plan**");
        assert_eq!(summary.format, DisplayFormat::Html);
        assert_eq!(summary.content, "<strong>Plan</strong>");

        let discharge = display_result(UseCase::Discharge, "**Plan**");
        assert_eq!(discharge, ResultDisplay::text("**Plan**"));
    }
}
