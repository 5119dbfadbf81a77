use std::sync::Arc;

use chrono::NaiveDate;
use curatia_core::{AppError, AppResult};
use curatia_domain::{AccessGrant, Container, PermissionTemplate, Visibility};

use crate::template_ports::{Clock, ContainerStore, TemplateRepository};

/// Application façade over permission templates.
///
/// Wraps the pure template policy logic with template storage, container
/// resolution and the injected clock. The access-control write in
/// [`PermissionTemplateService::reset_access_controls`] is the only
/// mutation; the service takes no locks, so callers must guarantee at most
/// one concurrent writer per container (last writer wins otherwise).
#[derive(Clone)]
pub struct PermissionTemplateService {
    templates: Arc<dyn TemplateRepository>,
    containers: Arc<dyn ContainerStore>,
    clock: Arc<dyn Clock>,
}

impl PermissionTemplateService {
    /// Creates a service from its port implementations.
    #[must_use]
    pub fn new(
        templates: Arc<dyn TemplateRepository>,
        containers: Arc<dyn ContainerStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            templates,
            containers,
            clock,
        }
    }

    /// Persists a new template.
    pub async fn save_template(&self, template: PermissionTemplate) -> AppResult<()> {
        self.templates.save(template).await
    }

    /// Loads the template governing a source. Absence is a distinct
    /// not-found condition, never a default template.
    pub async fn template_for_source(&self, source_id: &str) -> AppResult<PermissionTemplate> {
        self.templates
            .find_by_source(source_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("no permission template governs source '{source_id}'"))
            })
    }

    /// Replaces the full grant set of a template.
    pub async fn replace_grants(
        &self,
        source_id: &str,
        grants: Vec<AccessGrant>,
    ) -> AppResult<()> {
        self.templates.replace_grants(source_id, grants).await
    }

    /// Deletes a template and every grant it owns.
    pub async fn delete_template(&self, source_id: &str) -> AppResult<()> {
        self.templates.delete_by_source(source_id).await
    }

    /// Resolves the container a template governs.
    pub async fn resolve_container(&self, template: &PermissionTemplate) -> AppResult<Container> {
        self.containers.resolve(template.source_id.as_str()).await
    }

    /// Returns the template's effective release date as of today.
    #[must_use]
    pub fn release_date(&self, template: &PermissionTemplate) -> Option<NaiveDate> {
        template.release_date_for(self.clock.today())
    }

    /// Validates a candidate release date against the template, with
    /// today supplied by the injected clock.
    #[must_use]
    pub fn valid_release_date(&self, template: &PermissionTemplate, candidate: NaiveDate) -> bool {
        template.valid_release_date(candidate, self.clock.today())
    }

    /// Validates a candidate visibility against the template.
    #[must_use]
    pub fn valid_visibility(&self, template: &PermissionTemplate, candidate: Visibility) -> bool {
        template.valid_visibility(candidate)
    }

    /// Recomputes the template's effective access lists and writes them
    /// onto the governed container, replacing whatever was there.
    ///
    /// With `interpret_visibility` set, a container whose own current
    /// visibility is public or authenticated gets that one visibility's
    /// reserved group marker added to the read groups; the aggregation
    /// itself always strips both markers. The write is a full replace:
    /// container grants not re-derived from the template are lost.
    pub async fn reset_access_controls(
        &self,
        template: &PermissionTemplate,
        interpret_visibility: bool,
    ) -> AppResult<()> {
        let container = self.resolve_container(template).await?;

        let mut access = template.access_control_list();
        if interpret_visibility
            && let Some(marker) = container.visibility.group_marker()
        {
            access.read_groups.insert(marker.to_owned());
        }

        self.containers
            .replace_access(container.id.as_str(), access)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use curatia_core::{AppError, AppResult, NonEmptyString};
    use curatia_domain::{
        AccessControlList, AccessGrant, AccessLevel, AgentType, Container, PermissionTemplate,
        ReleasePeriod, Visibility,
    };
    use tokio::sync::Mutex;

    use crate::template_ports::{Clock, ContainerStore, TemplateRepository};

    use super::PermissionTemplateService;

    struct FixedClock(NaiveDate);

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            self.0
        }
    }

    #[derive(Default)]
    struct FakeTemplateRepository {
        templates: Mutex<HashMap<String, PermissionTemplate>>,
    }

    #[async_trait]
    impl TemplateRepository for FakeTemplateRepository {
        async fn save(&self, template: PermissionTemplate) -> AppResult<()> {
            self.templates
                .lock()
                .await
                .insert(template.source_id.as_str().to_owned(), template);
            Ok(())
        }

        async fn find_by_source(&self, source_id: &str) -> AppResult<Option<PermissionTemplate>> {
            Ok(self.templates.lock().await.get(source_id).cloned())
        }

        async fn replace_grants(
            &self,
            source_id: &str,
            grants: Vec<AccessGrant>,
        ) -> AppResult<()> {
            match self.templates.lock().await.get_mut(source_id) {
                Some(template) => {
                    template.access_grants = grants;
                    Ok(())
                }
                None => Err(AppError::NotFound(format!(
                    "template for '{source_id}' does not exist"
                ))),
            }
        }

        async fn delete_by_source(&self, source_id: &str) -> AppResult<()> {
            self.templates.lock().await.remove(source_id);
            Ok(())
        }
    }

    struct FakeContainerStore {
        containers: Mutex<HashMap<String, Container>>,
        reject_writes: bool,
    }

    impl FakeContainerStore {
        fn with_container(container: Container) -> Self {
            Self {
                containers: Mutex::new(HashMap::from([(
                    container.id.as_str().to_owned(),
                    container,
                )])),
                reject_writes: false,
            }
        }

        fn empty() -> Self {
            Self {
                containers: Mutex::new(HashMap::new()),
                reject_writes: false,
            }
        }
    }

    #[async_trait]
    impl ContainerStore for FakeContainerStore {
        async fn resolve(&self, container_id: &str) -> AppResult<Container> {
            self.containers
                .lock()
                .await
                .get(container_id)
                .cloned()
                .ok_or_else(|| {
                    AppError::NotFound(format!("container '{container_id}' does not exist"))
                })
        }

        async fn replace_access(
            &self,
            container_id: &str,
            access: AccessControlList,
        ) -> AppResult<()> {
            if self.reject_writes {
                return Err(AppError::Validation(
                    "container rejected the access update".to_owned(),
                ));
            }

            match self.containers.lock().await.get_mut(container_id) {
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

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
    }

    fn container(id: &str, visibility: Visibility) -> Container {
        Container {
            id: NonEmptyString::new(id).unwrap_or_else(|_| unreachable!()),
            visibility,
            access: AccessControlList::default(),
        }
    }

    fn template(source_id: &str) -> PermissionTemplate {
        PermissionTemplate::new(source_id).unwrap_or_else(|_| unreachable!())
    }

    fn grant(agent_type: AgentType, agent_id: &str, access: AccessLevel) -> AccessGrant {
        AccessGrant::new(agent_type, agent_id, access).unwrap_or_else(|_| unreachable!())
    }

    fn service(store: FakeContainerStore) -> (PermissionTemplateService, Arc<FakeContainerStore>) {
        let store = Arc::new(store);
        let service = PermissionTemplateService::new(
            Arc::new(FakeTemplateRepository::default()),
            store.clone(),
            Arc::new(FixedClock(date(2026, 8, 26))),
        );
        (service, store)
    }

    #[tokio::test]
    async fn template_for_source_reports_not_found() {
        let (service, _) = service(FakeContainerStore::empty());

        let result = service.template_for_source("admin_set/missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn saved_template_is_loaded_with_its_grants() {
        let (service, _) = service(FakeContainerStore::empty());
        let mut template = template("admin_set/default");
        template.access_grants = vec![grant(AgentType::User, "alice", AccessLevel::Manage)];

        assert!(service.save_template(template).await.is_ok());

        let loaded = service.template_for_source("admin_set/default").await;
        assert!(loaded.is_ok());
        assert_eq!(
            loaded.map(|template| template.access_grants.len()).unwrap_or_default(),
            1
        );
    }

    #[tokio::test]
    async fn release_date_uses_the_injected_clock() {
        let (service, _) = service(FakeContainerStore::empty());
        let mut template = template("admin_set/default");
        template.release_period = Some(ReleasePeriod::SixMonths);

        assert_eq!(service.release_date(&template), Some(date(2027, 2, 26)));
        assert!(service.valid_release_date(&template, date(2027, 2, 26)));
        assert!(!service.valid_release_date(&template, date(2027, 2, 27)));
    }

    #[tokio::test]
    async fn reset_replaces_all_four_lists() {
        let mut existing = container("admin_set/default", Visibility::Restricted);
        existing.access.edit_users.insert("stale-admin".to_owned());
        existing.access.read_groups.insert("stale-group".to_owned());
        let (service, store) = service(FakeContainerStore::with_container(existing));

        let mut template = template("admin_set/default");
        template.access_grants = vec![
            grant(AgentType::User, "alice", AccessLevel::Manage),
            grant(AgentType::Group, "curators", AccessLevel::View),
            grant(AgentType::User, "bob", AccessLevel::Deposit),
            grant(AgentType::Group, "public", AccessLevel::Deposit),
        ];

        let result = service.reset_access_controls(&template, false).await;
        assert!(result.is_ok());

        let written = store.resolve("admin_set/default").await;
        assert!(written.is_ok());
        let access = written.map(|container| container.access).unwrap_or_default();
        assert_eq!(access.edit_users, BTreeSet::from(["alice".to_owned()]));
        assert!(access.edit_groups.is_empty());
        assert_eq!(access.read_users, BTreeSet::from(["bob".to_owned()]));
        assert_eq!(access.read_groups, BTreeSet::from(["curators".to_owned()]));
    }

    #[tokio::test]
    async fn interpreted_visibility_adds_the_container_marker() {
        let (service, store) = service(FakeContainerStore::with_container(container(
            "admin_set/default",
            Visibility::Public,
        )));

        let mut template = template("admin_set/default");
        template.access_grants = vec![grant(AgentType::Group, "curators", AccessLevel::View)];

        let result = service.reset_access_controls(&template, true).await;
        assert!(result.is_ok());

        let written = store.resolve("admin_set/default").await;
        let read_groups = written
            .map(|container| container.access.read_groups)
            .unwrap_or_default();
        assert_eq!(
            read_groups,
            BTreeSet::from(["curators".to_owned(), "public".to_owned()])
        );
    }

    #[tokio::test]
    async fn authenticated_container_gets_only_its_own_marker() {
        let (service, store) = service(FakeContainerStore::with_container(container(
            "admin_set/default",
            Visibility::Authenticated,
        )));

        let result = service
            .reset_access_controls(&template("admin_set/default"), true)
            .await;
        assert!(result.is_ok());

        let written = store.resolve("admin_set/default").await;
        let read_groups = written
            .map(|container| container.access.read_groups)
            .unwrap_or_default();
        assert_eq!(read_groups, BTreeSet::from(["authenticated".to_owned()]));
        assert!(!read_groups.contains("public"));
    }

    #[tokio::test]
    async fn restricted_container_never_gains_a_marker() {
        let (service, store) = service(FakeContainerStore::with_container(container(
            "admin_set/default",
            Visibility::Restricted,
        )));

        let result = service
            .reset_access_controls(&template("admin_set/default"), true)
            .await;
        assert!(result.is_ok());

        let written = store.resolve("admin_set/default").await;
        assert!(
            written
                .map(|container| container.access.read_groups)
                .unwrap_or_default()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn uninterpreted_visibility_stays_stripped() {
        let (service, store) = service(FakeContainerStore::with_container(container(
            "admin_set/default",
            Visibility::Public,
        )));

        let result = service
            .reset_access_controls(&template("admin_set/default"), false)
            .await;
        assert!(result.is_ok());

        let written = store.resolve("admin_set/default").await;
        assert!(
            written
                .map(|container| container.access.read_groups)
                .unwrap_or_default()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn missing_container_surfaces_not_found() {
        let (service, _) = service(FakeContainerStore::empty());

        let result = service
            .reset_access_controls(&template("admin_set/gone"), false)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn container_rejection_propagates_unchanged() {
        let mut store = FakeContainerStore::with_container(container(
            "admin_set/default",
            Visibility::Restricted,
        ));
        store.reject_writes = true;
        let (service, _) = service(store);

        let result = service
            .reset_access_controls(&template("admin_set/default"), false)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
