use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use curatia_application::TemplateRepository;
use curatia_core::{AppError, AppResult, NonEmptyString};
use curatia_domain::{AccessGrant, AccessLevel, AgentType, PermissionTemplate, ReleasePeriod, Visibility};
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed permission template repository.
///
/// Templates live in `permission_templates`; their grants live in
/// `permission_template_accesses`, keyed by the template's source id and
/// deleted with it.
#[derive(Clone)]
pub struct PostgresTemplateRepository {
    pool: PgPool,
}

impl PostgresTemplateRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TemplateRow {
    source_id: String,
    release_period: Option<String>,
    release_date: Option<NaiveDate>,
    visibility: Option<String>,
}

#[derive(Debug, FromRow)]
struct GrantRow {
    agent_type: String,
    agent_id: String,
    access: String,
}

impl TemplateRow {
    fn into_template(self, grants: Vec<AccessGrant>) -> AppResult<PermissionTemplate> {
        let visibility = self
            .visibility
            .as_deref()
            .map(Visibility::from_str)
            .transpose()
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to decode visibility for source '{}': {error}",
                    self.source_id
                ))
            })?;

        // Unknown stored tags degrade to "varies" instead of failing.
        let release_period = self
            .release_period
            .as_deref()
            .and_then(ReleasePeriod::parse);

        Ok(PermissionTemplate {
            source_id: NonEmptyString::new(self.source_id)?,
            release_period,
            release_date: self.release_date,
            visibility,
            access_grants: grants,
        })
    }
}

impl GrantRow {
    fn into_grant(self, source_id: &str) -> AppResult<AccessGrant> {
        let agent_type = AgentType::from_str(self.agent_type.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode agent type for source '{source_id}': {error}"
            ))
        })?;
        let access = AccessLevel::from_str(self.access.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode access level for source '{source_id}': {error}"
            ))
        })?;

        AccessGrant::new(agent_type, self.agent_id, access)
    }
}

async fn insert_grants(
    transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    source_id: &str,
    grants: &[AccessGrant],
) -> AppResult<()> {
    for grant in grants {
        sqlx::query(
            r#"
            INSERT INTO permission_template_accesses (source_id, agent_type, agent_id, access)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(source_id)
        .bind(grant.agent_type.as_str())
        .bind(grant.agent_id.as_str())
        .bind(grant.access.as_str())
        .execute(&mut **transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert grant: {error}")))?;
    }

    Ok(())
}

#[async_trait]
impl TemplateRepository for PostgresTemplateRepository {
    async fn save(&self, template: PermissionTemplate) -> AppResult<()> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO permission_templates (source_id, release_period, release_date, visibility)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (source_id) DO NOTHING
            "#,
        )
        .bind(template.source_id.as_str())
        .bind(template.release_period.map(|period| period.as_str()))
        .bind(template.release_date)
        .bind(template.visibility.map(|visibility| visibility.as_str()))
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert template: {error}")))?;

        if inserted.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "a permission template already governs source '{}'",
                template.source_id
            )));
        }

        insert_grants(
            &mut transaction,
            template.source_id.as_str(),
            &template.access_grants,
        )
        .await?;

        transaction
            .commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit template: {error}")))
    }

    async fn find_by_source(&self, source_id: &str) -> AppResult<Option<PermissionTemplate>> {
        let row = sqlx::query_as::<_, TemplateRow>(
            r#"
            SELECT source_id, release_period, release_date, visibility
            FROM permission_templates
            WHERE source_id = $1
            "#,
        )
        .bind(source_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load template: {error}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let grant_rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT agent_type, agent_id, access
            FROM permission_template_accesses
            WHERE source_id = $1
            ORDER BY agent_type, agent_id, access
            "#,
        )
        .bind(source_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load grants: {error}")))?;

        let grants = grant_rows
            .into_iter()
            .map(|grant_row| grant_row.into_grant(source_id))
            .collect::<AppResult<Vec<AccessGrant>>>()?;

        row.into_template(grants).map(Some)
    }

    async fn replace_grants(&self, source_id: &str, grants: Vec<AccessGrant>) -> AppResult<()> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))?;

        let governed = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM permission_templates
            WHERE source_id = $1
            "#,
        )
        .bind(source_id)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check template: {error}")))?;

        if governed == 0 {
            return Err(AppError::NotFound(format!(
                "no permission template governs source '{source_id}'"
            )));
        }

        sqlx::query(
            r#"
            DELETE FROM permission_template_accesses
            WHERE source_id = $1
            "#,
        )
        .bind(source_id)
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to clear grants: {error}")))?;

        insert_grants(&mut transaction, source_id, &grants).await?;

        transaction
            .commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit grants: {error}")))
    }

    async fn delete_by_source(&self, source_id: &str) -> AppResult<()> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))?;

        sqlx::query(
            r#"
            DELETE FROM permission_template_accesses
            WHERE source_id = $1
            "#,
        )
        .bind(source_id)
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete grants: {error}")))?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM permission_templates
            WHERE source_id = $1
            "#,
        )
        .bind(source_id)
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete template: {error}")))?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "no permission template governs source '{source_id}'"
            )));
        }

        transaction
            .commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit delete: {error}")))
    }
}
