//! Guest-mode store backend.
//!
//! The same two record shapes the cloud store holds, serialized as JSON
//! under fixed file names in a local data directory: the full project list
//! in one document, master profiles keyed by uid in another. Writes are
//! whole-file rewrites guarded by one async mutex — fine at this scale,
//! and honest about the non-transactional contract.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::project::ResumeProject;
use crate::models::resume::ResumeData;
use crate::store::{ProjectStore, StoreError};

const PROJECTS_FILE: &str = "resume_projects.json";
const PROFILES_FILE: &str = "master_profiles.json";

pub struct LocalProjectStore {
    dir: PathBuf,
    /// Serializes read-modify-write cycles on the two documents.
    write_lock: Mutex<()>,
}

impl LocalProjectStore {
    pub fn new(dir: PathBuf) -> Self {
        LocalProjectStore {
            dir,
            write_lock: Mutex::new(()),
        }
    }

    fn projects_path(&self) -> PathBuf {
        self.dir.join(PROJECTS_FILE)
    }

    fn profiles_path(&self) -> PathBuf {
        self.dir.join(PROFILES_FILE)
    }

    async fn read_projects(&self) -> Result<Vec<ResumeProject>, StoreError> {
        read_document(&self.projects_path()).await
    }

    async fn read_profiles(&self) -> Result<HashMap<String, ResumeData>, StoreError> {
        read_document(&self.profiles_path()).await
    }

    async fn write_projects(&self, projects: &[ResumeProject]) -> Result<(), StoreError> {
        write_document(&self.dir, &self.projects_path(), projects).await
    }

    async fn write_profiles(
        &self,
        profiles: &HashMap<String, ResumeData>,
    ) -> Result<(), StoreError> {
        write_document(&self.dir, &self.profiles_path(), profiles).await
    }
}

/// Missing file means an empty collection, not an error.
async fn read_document<T: serde::de::DeserializeOwned + Default>(
    path: &Path,
) -> Result<T, StoreError> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

async fn write_document<T: serde::Serialize>(
    dir: &Path,
    path: &Path,
    value: &T,
) -> Result<(), StoreError> {
    tokio::fs::create_dir_all(dir).await?;
    let raw = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, raw).await?;
    Ok(())
}

#[async_trait]
impl ProjectStore for LocalProjectStore {
    async fn list_projects(&self, user_id: &str) -> Result<Vec<ResumeProject>, StoreError> {
        let mut projects: Vec<ResumeProject> = self
            .read_projects()
            .await?
            .into_iter()
            .filter(|p| p.user_id == user_id)
            .collect();
        projects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(projects)
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<ResumeProject>, StoreError> {
        Ok(self.read_projects().await?.into_iter().find(|p| p.id == id))
    }

    async fn upsert_project(&self, project: &ResumeProject) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.read_projects().await?;
        match projects.iter_mut().find(|p| p.id == project.id) {
            Some(slot) => *slot = project.clone(),
            None => projects.push(project.clone()),
        }
        self.write_projects(&projects).await
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.read_projects().await?;
        projects.retain(|p| p.id != id);
        self.write_projects(&projects).await
    }

    async fn load_master_profile(&self, user_id: &str) -> Result<Option<ResumeData>, StoreError> {
        Ok(self.read_profiles().await?.remove(user_id))
    }

    async fn save_master_profile(
        &self,
        user_id: &str,
        data: &ResumeData,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut profiles = self.read_profiles().await?;
        profiles.insert(user_id.to_string(), data.clone());
        self.write_profiles(&profiles).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, LocalProjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalProjectStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let (_dir, store) = store();
        assert!(store.list_projects("user-1").await.unwrap().is_empty());
        assert!(store.load_master_profile("user-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_project_round_trip() {
        let (_dir, store) = store();
        let project = ResumeProject::new("user-1", "My Resume", ResumeData::starter());

        store.upsert_project(&project).await.unwrap();
        let loaded = store.get_project(project.id).await.unwrap().unwrap();
        assert_eq!(loaded, project);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_record() {
        let (_dir, store) = store();
        let mut project = ResumeProject::new("user-1", "My Resume", ResumeData::default());
        store.upsert_project(&project).await.unwrap();

        project.title = "Renamed".to_string();
        store.upsert_project(&project).await.unwrap();

        let projects = store.list_projects("user-1").await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "Renamed");
    }

    #[tokio::test]
    async fn test_listing_filters_by_owner_and_sorts_newest_first() {
        let (_dir, store) = store();
        let mut old = ResumeProject::new("user-1", "Old", ResumeData::default());
        old.last_modified = chrono::Utc::now() - chrono::Duration::hours(1);
        let new = ResumeProject::new("user-1", "New", ResumeData::default());
        let other = ResumeProject::new("user-2", "Other", ResumeData::default());

        store.upsert_project(&old).await.unwrap();
        store.upsert_project(&new).await.unwrap();
        store.upsert_project(&other).await.unwrap();

        let titles: Vec<String> = store
            .list_projects("user-1")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["New", "Old"]);
    }

    #[tokio::test]
    async fn test_delete_removes_only_the_target() {
        let (_dir, store) = store();
        let keep = ResumeProject::new("user-1", "Keep", ResumeData::default());
        let drop = ResumeProject::new("user-1", "Drop", ResumeData::default());
        store.upsert_project(&keep).await.unwrap();
        store.upsert_project(&drop).await.unwrap();

        store.delete_project(drop.id).await.unwrap();

        let projects = store.list_projects("user-1").await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, keep.id);
    }

    #[tokio::test]
    async fn test_master_profile_round_trip_per_user() {
        let (_dir, store) = store();
        let profile = ResumeData::starter();

        store.save_master_profile("user-1", &profile).await.unwrap();

        let loaded = store.load_master_profile("user-1").await.unwrap().unwrap();
        assert_eq!(loaded, profile);
        assert!(store.load_master_profile("user-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_an_error_not_a_reset() {
        let (dir, store) = store();
        tokio::fs::write(dir.path().join(PROJECTS_FILE), "not json")
            .await
            .unwrap();

        assert!(matches!(
            store.list_projects("user-1").await,
            Err(StoreError::Corrupt(_))
        ));
    }
}
