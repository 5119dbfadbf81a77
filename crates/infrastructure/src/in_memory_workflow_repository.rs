use std::collections::HashMap;

use async_trait::async_trait;
use curatia_application::WorkflowRepository;
use curatia_core::AppResult;
use curatia_domain::WorkflowTemplate;
use tokio::sync::RwLock;

/// In-memory workflow bookkeeping repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryWorkflowRepository {
    workflows: RwLock<HashMap<String, Vec<WorkflowTemplate>>>,
}

impl InMemoryWorkflowRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            workflows: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn list_for_template(&self, source_id: &str) -> AppResult<Vec<WorkflowTemplate>> {
        Ok(self
            .workflows
            .read()
            .await
            .get(source_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_for_template(
        &self,
        source_id: &str,
        workflows: Vec<WorkflowTemplate>,
    ) -> AppResult<()> {
        self.workflows
            .write()
            .await
            .insert(source_id.to_owned(), workflows);
        Ok(())
    }
}
