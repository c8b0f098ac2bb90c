//! AssistantRegistry - maps use cases to assistants and discovers templates.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use super::errors::RegistryError;
use crate::domain::foundation::{AssistantId, UseCase};
use crate::ports::{AssistantService, AssistantSummary};

/// An assistant eligible for manual template selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateAssistant {
    pub id: AssistantId,
    pub name: String,
}

/// Resolves the assistant for a submission.
///
/// Fixed assignments always win. Use cases without one (the template-backed
/// workflow, or any production use case left unconfigured) fall back to the
/// caller's manual selection.
pub struct AssistantRegistry {
    service: Arc<dyn AssistantService>,
    assignments: HashMap<UseCase, AssistantId>,
    template_prefix: String,
}

impl AssistantRegistry {
    pub fn new(service: Arc<dyn AssistantService>, template_prefix: impl Into<String>) -> Self {
        Self {
            service,
            assignments: HashMap::new(),
            template_prefix: template_prefix.into(),
        }
    }

    /// Binds a use case to a fixed assistant.
    pub fn with_assignment(mut self, use_case: UseCase, assistant_id: AssistantId) -> Self {
        self.assignments.insert(use_case, assistant_id);
        self
    }

    /// The fixed assistant for a use case, if any.
    pub fn assignment(&self, use_case: UseCase) -> Option<&AssistantId> {
        self.assignments.get(&use_case)
    }

    /// Name prefix that marks template assistants.
    pub fn template_prefix(&self) -> &str {
        &self.template_prefix
    }

    /// Picks the assistant for `use_case`.
    ///
    /// Pure: repeated calls with the same inputs return the same id.
    pub fn resolve(
        &self,
        use_case: UseCase,
        manual_selection: Option<&AssistantId>,
    ) -> Result<AssistantId, RegistryError> {
        self.assignments
            .get(&use_case)
            .or(manual_selection)
            .cloned()
            .ok_or(RegistryError::UnresolvedAssistant { use_case })
    }

    /// Lists template assistants, failing when the remote listing fails.
    pub async fn try_list_template_assistants(
        &self,
    ) -> Result<Vec<TemplateAssistant>, RegistryError> {
        let assistants = self
            .service
            .list_assistants()
            .await
            .map_err(|e| RegistryError::RegistryUnavailable(e.to_string()))?;

        Ok(filter_templates(assistants, &self.template_prefix))
    }

    /// Lists template assistants, degrading to an empty list on failure.
    pub async fn list_template_assistants(&self) -> Vec<TemplateAssistant> {
        match self.try_list_template_assistants().await {
            Ok(templates) => templates,
            Err(err) => {
                tracing::warn!(error = %err, "Template discovery failed, offering no templates");
                Vec::new()
            }
        }
    }
}

/// Keeps assistants whose name starts with `prefix`, in service order.
/// Unnamed assistants are never eligible.
pub fn filter_templates(assistants: Vec<AssistantSummary>, prefix: &str) -> Vec<TemplateAssistant> {
    assistants
        .into_iter()
        .filter_map(|assistant| match assistant.name {
            Some(name) if name.starts_with(prefix) => Some(TemplateAssistant {
                id: assistant.id,
                name,
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::assistants::{MockAssistantService, MockOperation};
    use crate::ports::AssistantServiceError;
    use proptest::prelude::*;

    fn id(value: &str) -> AssistantId {
        AssistantId::new(value).unwrap()
    }

    fn registry(service: MockAssistantService) -> AssistantRegistry {
        AssistantRegistry::new(Arc::new(service), "dev")
            .with_assignment(UseCase::Discharge, id("asst_discharge"))
            .with_assignment(UseCase::Summary, id("asst_summary"))
    }

    // ─────────────────────────────────────────────────────────────────────
    // resolve
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn fixed_assignment_wins_over_manual_selection() {
        let registry = registry(MockAssistantService::new());
        let manual = id("asst_template");

        assert_eq!(
            registry.resolve(UseCase::Discharge, Some(&manual)),
            Ok(id("asst_discharge"))
        );
        assert_eq!(registry.resolve(UseCase::Summary, None), Ok(id("asst_summary")));
    }

    #[test]
    fn unassigned_use_case_falls_back_to_manual_selection() {
        let registry = registry(MockAssistantService::new());
        let manual = id("asst_template");

        assert_eq!(registry.resolve(UseCase::Tuhi, Some(&manual)), Ok(manual));
    }

    #[test]
    fn unassigned_use_case_without_selection_is_unresolved() {
        let registry = registry(MockAssistantService::new());

        assert_eq!(
            registry.resolve(UseCase::Tuhi, None),
            Err(RegistryError::UnresolvedAssistant {
                use_case: UseCase::Tuhi
            })
        );
    }

    // ─────────────────────────────────────────────────────────────────────
    // template discovery
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn lists_only_prefixed_assistants_in_service_order() {
        let service = MockAssistantService::new()
            .with_assistant("asst_1", "dev Cardiology")
            .with_assistant("asst_2", "Production Summary")
            .with_assistant("asst_3", "dev General Practice")
            .with_assistant("asst_4", "Dev Uppercase");

        let templates = registry(service).list_template_assistants().await;

        let names: Vec<_> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["dev Cardiology", "dev General Practice"]);
    }

    #[tokio::test]
    async fn listing_failure_degrades_to_empty() {
        let service = MockAssistantService::new()
            .with_assistant("asst_1", "dev Cardiology")
            .with_failure(
                MockOperation::ListAssistants,
                AssistantServiceError::status(503, "unavailable"),
            );
        let registry = registry(service);

        assert!(registry.list_template_assistants().await.is_empty());
        assert!(matches!(
            registry.try_list_template_assistants().await,
            Err(RegistryError::RegistryUnavailable(_))
        ));
    }

    #[test]
    fn unnamed_assistants_are_excluded() {
        let assistants = vec![AssistantSummary {
            id: id("asst_1"),
            name: None,
        }];
        assert!(filter_templates(assistants, "dev").is_empty());
    }

    proptest! {
        #[test]
        fn filtered_templates_always_carry_prefix(
            names in proptest::collection::vec("[a-zA-Z ]{0,12}", 0..20)
        ) {
            let assistants: Vec<_> = names
                .iter()
                .enumerate()
                .map(|(i, name)| AssistantSummary::new(id(&format!("asst_{i}")), name.clone()))
                .collect();
            let expected = names.iter().filter(|n| n.starts_with("dev")).count();

            let templates = filter_templates(assistants, "dev");

            prop_assert_eq!(templates.len(), expected);
            prop_assert!(templates.iter().all(|t| t.name.starts_with("dev")));
        }

        #[test]
        fn resolve_is_idempotent(
            use_case_index in 0usize..5,
            manual in proptest::option::of("[a-z_]{1,10}")
        ) {
            let registry = registry(MockAssistantService::new());
            let use_case = UseCase::all()[use_case_index];
            let manual = manual.map(|m| id(&m));

            let first = registry.resolve(use_case, manual.as_ref());
            let second = registry.resolve(use_case, manual.as_ref());

            prop_assert_eq!(first, second);
        }
    }
}
