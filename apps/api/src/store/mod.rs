//! Persistence adapter.
//!
//! One trait, two backends chosen at startup: Postgres for signed-in cloud
//! use, a fixed-key JSON directory for guest mode. Saves are last-write-wins
//! snapshots of whole records — no diffs, no cross-record transactions.

pub mod local;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::project::ResumeProject;
use crate::models::resume::ResumeData;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored record is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// CRUD over `ResumeProject` records plus the per-user master profile
/// singleton. Carried in `AppState` as `Arc<dyn ProjectStore>`.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// All projects owned by a user, most recently modified first.
    async fn list_projects(&self, user_id: &str) -> Result<Vec<ResumeProject>, StoreError>;

    async fn get_project(&self, id: Uuid) -> Result<Option<ResumeProject>, StoreError>;

    /// Inserts or fully replaces a project record.
    async fn upsert_project(&self, project: &ResumeProject) -> Result<(), StoreError>;

    async fn delete_project(&self, id: Uuid) -> Result<(), StoreError>;

    async fn load_master_profile(&self, user_id: &str) -> Result<Option<ResumeData>, StoreError>;

    async fn save_master_profile(
        &self,
        user_id: &str,
        data: &ResumeData,
    ) -> Result<(), StoreError>;
}
