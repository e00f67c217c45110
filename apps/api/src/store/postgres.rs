//! Cloud store backend: project records and master profiles as jsonb rows.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::project::ResumeProject;
use crate::models::resume::ResumeData;
use crate::store::{ProjectStore, StoreError};

pub struct PgProjectStore {
    pool: PgPool,
}

impl PgProjectStore {
    pub fn new(pool: PgPool) -> Self {
        PgProjectStore { pool }
    }
}

/// Creates the two tables on startup if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resume_projects (
            id UUID PRIMARY KEY,
            user_id TEXT NOT NULL,
            last_modified TIMESTAMPTZ NOT NULL,
            record JSONB NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_profiles (
            user_id TEXT PRIMARY KEY,
            master_profile JSONB NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Postgres schema ensured");
    Ok(())
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn list_projects(&self, user_id: &str) -> Result<Vec<ResumeProject>, StoreError> {
        let records: Vec<serde_json::Value> = sqlx::query_scalar(
            "SELECT record FROM resume_projects WHERE user_id = $1 ORDER BY last_modified DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        records
            .into_iter()
            .map(|record| serde_json::from_value(record).map_err(StoreError::Corrupt))
            .collect()
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<ResumeProject>, StoreError> {
        let record: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT record FROM resume_projects WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        record
            .map(|r| serde_json::from_value(r).map_err(StoreError::Corrupt))
            .transpose()
    }

    async fn upsert_project(&self, project: &ResumeProject) -> Result<(), StoreError> {
        let record = serde_json::to_value(project)?;

        sqlx::query(
            r#"
            INSERT INTO resume_projects (id, user_id, last_modified, record)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id)
            DO UPDATE SET user_id = $2, last_modified = $3, record = $4
            "#,
        )
        .bind(project.id)
        .bind(&project.user_id)
        .bind(project.last_modified)
        .bind(&record)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM resume_projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn load_master_profile(&self, user_id: &str) -> Result<Option<ResumeData>, StoreError> {
        let record: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT master_profile FROM user_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        record
            .map(|r| serde_json::from_value(r).map_err(StoreError::Corrupt))
            .transpose()
    }

    async fn save_master_profile(
        &self,
        user_id: &str,
        data: &ResumeData,
    ) -> Result<(), StoreError> {
        let profile = serde_json::to_value(data)?;

        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, master_profile, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET master_profile = $2, updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(&profile)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
