use std::collections::HashMap;

use async_trait::async_trait;
use curatia_application::TemplateRepository;
use curatia_core::{AppError, AppResult};
use curatia_domain::{AccessGrant, PermissionTemplate};
use tokio::sync::RwLock;

/// In-memory permission template repository implementation.
///
/// Grants live inside the stored template, so deleting a template drops
/// its grants with it.
#[derive(Debug, Default)]
pub struct InMemoryTemplateRepository {
    templates: RwLock<HashMap<String, PermissionTemplate>>,
}

impl InMemoryTemplateRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn save(&self, template: PermissionTemplate) -> AppResult<()> {
        let key = template.source_id.as_str().to_owned();
        let mut templates = self.templates.write().await;

        if templates.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "a permission template already governs source '{key}'"
            )));
        }

        templates.insert(key, template);
        Ok(())
    }

    async fn find_by_source(&self, source_id: &str) -> AppResult<Option<PermissionTemplate>> {
        Ok(self.templates.read().await.get(source_id).cloned())
    }

    async fn replace_grants(&self, source_id: &str, grants: Vec<AccessGrant>) -> AppResult<()> {
        match self.templates.write().await.get_mut(source_id) {
            Some(template) => {
                template.access_grants = grants;
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "no permission template governs source '{source_id}'"
            ))),
        }
    }

    async fn delete_by_source(&self, source_id: &str) -> AppResult<()> {
        if self.templates.write().await.remove(source_id).is_none() {
            return Err(AppError::NotFound(format!(
                "no permission template governs source '{source_id}'"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use curatia_application::TemplateRepository;
    use curatia_domain::{AccessGrant, AccessLevel, AgentType, PermissionTemplate};

    use super::InMemoryTemplateRepository;

    fn template(source_id: &str) -> PermissionTemplate {
        PermissionTemplate::new(source_id).unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn duplicate_source_is_a_conflict() {
        let repository = InMemoryTemplateRepository::new();

        assert!(repository.save(template("admin_set/default")).await.is_ok());
        assert!(repository.save(template("admin_set/default")).await.is_err());
    }

    #[tokio::test]
    async fn replacing_grants_swaps_the_whole_set() {
        let repository = InMemoryTemplateRepository::new();
        let mut stored = template("admin_set/default");
        stored.access_grants = vec![
            AccessGrant::new(AgentType::User, "alice", AccessLevel::Manage)
                .unwrap_or_else(|_| unreachable!()),
        ];
        assert!(repository.save(stored).await.is_ok());

        let replaced = repository
            .replace_grants(
                "admin_set/default",
                vec![
                    AccessGrant::new(AgentType::Group, "curators", AccessLevel::View)
                        .unwrap_or_else(|_| unreachable!()),
                ],
            )
            .await;
        assert!(replaced.is_ok());

        let loaded = repository.find_by_source("admin_set/default").await;
        let grants = loaded
            .ok()
            .flatten()
            .map(|template| template.access_grants)
            .unwrap_or_default();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].agent_id.as_str(), "curators");
    }

    #[tokio::test]
    async fn delete_cascades_grants_with_the_template() {
        let repository = InMemoryTemplateRepository::new();
        let mut stored = template("admin_set/default");
        stored.access_grants = vec![
            AccessGrant::new(AgentType::User, "alice", AccessLevel::Manage)
                .unwrap_or_else(|_| unreachable!()),
        ];
        assert!(repository.save(stored).await.is_ok());

        assert!(repository.delete_by_source("admin_set/default").await.is_ok());
        let reloaded = repository.find_by_source("admin_set/default").await;
        assert!(matches!(reloaded, Ok(None)));
    }

    #[tokio::test]
    async fn deleting_a_missing_template_is_not_found() {
        let repository = InMemoryTemplateRepository::new();
        assert!(repository.delete_by_source("admin_set/missing").await.is_err());
    }
}
