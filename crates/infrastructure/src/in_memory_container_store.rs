use std::collections::HashMap;

use async_trait::async_trait;
use curatia_application::ContainerStore;
use curatia_core::{AppError, AppResult};
use curatia_domain::{AccessControlList, Container};
use tokio::sync::RwLock;

/// In-memory container store implementation.
///
/// Enforces one container-side invariant on writes: a container must keep
/// at least one editing user or group, otherwise nobody could manage it.
#[derive(Debug, Default)]
pub struct InMemoryContainerStore {
    containers: RwLock<HashMap<String, Container>>,
}

impl InMemoryContainerStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            containers: RwLock::new(HashMap::new()),
        }
    }

    /// Seeds the store with a container, replacing any previous one with
    /// the same id.
    pub async fn insert(&self, container: Container) {
        self.containers
            .write()
            .await
            .insert(container.id.as_str().to_owned(), container);
    }
}

#[async_trait]
impl ContainerStore for InMemoryContainerStore {
    async fn resolve(&self, container_id: &str) -> AppResult<Container> {
        self.containers
            .read()
            .await
            .get(container_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("container '{container_id}' does not exist")))
    }

    async fn replace_access(
        &self,
        container_id: &str,
        access: AccessControlList,
    ) -> AppResult<()> {
        if access.is_unmanaged() {
            return Err(AppError::Validation(format!(
                "container '{container_id}' would be left without any editor"
            )));
        }

        match self.containers.write().await.get_mut(container_id) {
            Some(container) => {
                container.access = access;
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "container '{container_id}' does not exist"
            ))),
        }
    }
}
