//! UseCase enum naming the clinical workflows a submission can target.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// A clinical workflow. Decides which assistant handles a submission and
/// how its result is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UseCase {
    /// Extract SNOMED CT procedure codes from a discharge summary.
    #[serde(rename = "discharge")]
    Discharge,
    /// Enhance a consultation transcript using a user-selected template.
    #[serde(rename = "tuhi")]
    Tuhi,
    /// Draft a learning review report from meeting notes and case history.
    #[serde(rename = "review")]
    Review,
    /// Generate a discharge summary.
    #[serde(rename = "summary")]
    Summary,
    /// Feedback on consultation communication.
    #[serde(rename = "dev_CommunicationReview")]
    CommunicationReview,
}

impl UseCase {
    /// Returns all use cases in presentation order.
    pub fn all() -> &'static [UseCase] {
        &[
            UseCase::Discharge,
            UseCase::Tuhi,
            UseCase::Review,
            UseCase::Summary,
            UseCase::CommunicationReview,
        ]
    }

    /// Wire identifier of the use case.
    pub fn as_str(&self) -> &'static str {
        match self {
            UseCase::Discharge => "discharge",
            UseCase::Tuhi => "tuhi",
            UseCase::Review => "review",
            UseCase::Summary => "summary",
            UseCase::CommunicationReview => "dev_CommunicationReview",
        }
    }

    /// Title shown above the input form.
    pub fn title(&self) -> &'static str {
        match self {
            UseCase::Discharge => {
                "Analyse the Discharge Summary Report to extract and identify SNOMED CT procedure code"
            }
            UseCase::Tuhi => {
                "Analyze the medical consultation and generate an enhanced transcript based on selected template"
            }
            UseCase::Review => {
                "Add your clinical review meetings and case history to produce a draft learning review report"
            }
            UseCase::Summary => "AI generate Discharge Summary",
            UseCase::CommunicationReview => {
                "Review a consultation to get feedback on your communication"
            }
        }
    }

    /// True when the caller must pick a template assistant.
    pub fn requires_template(&self) -> bool {
        matches!(self, UseCase::Tuhi)
    }

    /// True when the result is rendered as HTML with bold markup converted.
    pub fn renders_markup(&self) -> bool {
        matches!(self, UseCase::Summary)
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UseCase {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UseCase::all()
            .iter()
            .find(|use_case| use_case.as_str() == s)
            .copied()
            .ok_or_else(|| ValidationError::invalid_format("use_case", format!("unknown use case '{}'", s)))
    }
}
