use async_trait::async_trait;
use chrono::NaiveDate;
use curatia_core::AppResult;
use curatia_domain::{AccessControlList, AccessGrant, Container, PermissionTemplate, WorkflowTemplate};

/// Repository port for permission templates and their owned grants.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Persists a new template. Fails with a conflict when a template
    /// already governs the same source.
    async fn save(&self, template: PermissionTemplate) -> AppResult<()>;

    /// Loads the template governing the given source, grants included.
    async fn find_by_source(&self, source_id: &str) -> AppResult<Option<PermissionTemplate>>;

    /// Replaces the full grant set of a template. Grants are immutable
    /// value objects; there is no per-grant edit.
    async fn replace_grants(&self, source_id: &str, grants: Vec<AccessGrant>) -> AppResult<()>;

    /// Deletes a template together with all grants it owns.
    async fn delete_by_source(&self, source_id: &str) -> AppResult<()>;
}

/// Resolution and mutation port for the external container resource.
#[async_trait]
pub trait ContainerStore: Send + Sync {
    /// Resolves a container by id. Absence is a distinct not-found error,
    /// never a default container.
    async fn resolve(&self, container_id: &str) -> AppResult<Container>;

    /// Replaces all four access lists of a container in one atomic write.
    /// A container-side rejection propagates unchanged.
    async fn replace_access(&self, container_id: &str, access: AccessControlList)
    -> AppResult<()>;
}

/// Injectable current-date provider.
///
/// Release dates are defined relative to "today", so the clock is a port
/// rather than a direct system call.
pub trait Clock: Send + Sync {
    /// Returns the current date.
    fn today(&self) -> NaiveDate;
}

/// Outbound message delivery port.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends one message to one recipient.
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> AppResult<()>;
}

/// Repository port for per-template workflow bookkeeping.
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Lists the workflows available to a template.
    async fn list_for_template(&self, source_id: &str) -> AppResult<Vec<WorkflowTemplate>>;

    /// Replaces a template's workflow set, activation flags included.
    async fn replace_for_template(
        &self,
        source_id: &str,
        workflows: Vec<WorkflowTemplate>,
    ) -> AppResult<()>;
}

/// Query port backing container-creation statistics.
#[async_trait]
pub trait DepositStatisticsRepository: Send + Sync {
    /// Counts containers created in `[min, max)`.
    async fn count_created_between(&self, min: NaiveDate, max: NaiveDate) -> AppResult<u64>;
}
