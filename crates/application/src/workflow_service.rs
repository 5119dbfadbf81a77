use std::sync::Arc;

use curatia_core::{AppError, AppResult};
use curatia_domain::{PermissionTemplate, WorkflowTemplate};

use crate::template_ports::{Messenger, WorkflowRepository};

/// Activation bookkeeping for the workflows available to a template.
#[derive(Clone)]
pub struct WorkflowActivationService {
    workflows: Arc<dyn WorkflowRepository>,
    messenger: Arc<dyn Messenger>,
}

impl WorkflowActivationService {
    /// Creates a workflow activation service.
    #[must_use]
    pub fn new(workflows: Arc<dyn WorkflowRepository>, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            workflows,
            messenger,
        }
    }

    /// Lists the workflows available to a template, active one included.
    pub async fn available_workflows(&self, source_id: &str) -> AppResult<Vec<WorkflowTemplate>> {
        self.workflows.list_for_template(source_id).await
    }

    /// Returns the template's active workflow, if any.
    pub async fn active_workflow(&self, source_id: &str) -> AppResult<Option<WorkflowTemplate>> {
        Ok(self
            .workflows
            .list_for_template(source_id)
            .await?
            .into_iter()
            .find(|workflow| workflow.active))
    }

    /// Activates the named workflow for the template, deactivating every
    /// other workflow so at most one stays active, then notifies the
    /// template's managers.
    pub async fn activate(&self, template: &PermissionTemplate, name: &str) -> AppResult<()> {
        let source_id = template.source_id.as_str();
        let mut workflows = self.workflows.list_for_template(source_id).await?;

        if !workflows.iter().any(|workflow| workflow.name.as_str() == name) {
            return Err(AppError::NotFound(format!(
                "workflow '{name}' is not available to source '{source_id}'"
            )));
        }

        for workflow in &mut workflows {
            workflow.active = workflow.name.as_str() == name;
        }
        self.workflows
            .replace_for_template(source_id, workflows)
            .await?;

        for manager in template.edit_users() {
            self.messenger
                .send(
                    manager.as_str(),
                    "Deposit workflow changed",
                    &format!("Workflow '{name}' is now active for '{source_id}'."),
                )
                .await?;
        }

        Ok(())
    }
}
