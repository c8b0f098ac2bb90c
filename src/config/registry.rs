//! Assistant registry configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Fixed use-case assignments and the template discovery prefix.
///
/// A use case without an id here can only be served by a manually selected
/// template assistant.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Name prefix marking assistants that belong to this deployment
    #[serde(default = "default_template_prefix")]
    pub template_prefix: String,

    /// Discharge summary coding assistant
    pub discharge: Option<String>,

    /// Discharge summary writer; its replies are joined line by line
    pub summary: Option<String>,

    /// Learning review assistant
    pub review: Option<String>,

    /// Consultation communication feedback assistant
    pub communication_review: Option<String>,
}

impl RegistryConfig {
    /// Validate registry configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.template_prefix.trim().is_empty() {
            return Err(ValidationError::EmptyTemplatePrefix);
        }

        let assignments = [
            ("discharge", &self.discharge),
            ("summary", &self.summary),
            ("review", &self.review),
            ("communication_review", &self.communication_review),
        ];
        for (name, id) in assignments {
            if id.as_ref().is_some_and(|id| id.trim().is_empty()) {
                return Err(ValidationError::BlankAssistantId(name));
            }
        }

        Ok(())
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            template_prefix: default_template_prefix(),
            discharge: None,
            summary: None,
            review: None,
            communication_review: None,
        }
    }
}

fn default_template_prefix() -> String {
    "dev".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.template_prefix, "dev");
        assert!(config.summary.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_assignment_rejected() {
        let config = RegistryConfig {
            review: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::BlankAssistantId("review"))
        );
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let config = RegistryConfig {
            template_prefix: String::new(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::EmptyTemplatePrefix));
    }
}
