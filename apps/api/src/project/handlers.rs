//! Axum route handlers for projects, master profiles, and guest identity.
//!
//! Working-copy updates go through the autosaver (debounced, last-write
//! wins); explicit saves and improvement applications write straight to the
//! store and push a version snapshot where the lifecycle calls for one.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::ReviewResult;
use crate::errors::AppError;
use crate::models::project::{ResumeProject, TemplateKind};
use crate::models::resume::ResumeData;
use crate::models::user::UserProfile;
use crate::project::merge::{apply_and_consume, ApplyOutcome};
use crate::project::validation::{check_resume_links, LinkAdvisory};
use crate::project::versioning::{push_version, touch};
use crate::state::AppState;
use crate::store::ProjectStore;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub user_id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Partial update of the working copy. Absent fields are left alone.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProjectRequest {
    pub data: Option<ResumeData>,
    pub title: Option<String>,
    pub template: Option<TemplateKind>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveProjectRequest {
    pub data: Option<ResumeData>,
    pub title: Option<String>,
    pub template: Option<TemplateKind>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectResponse {
    pub project: ResumeProject,
    /// Advisory link findings for the editor. Never blocks the update.
    pub advisories: Vec<LinkAdvisory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMasterProfileRequest {
    pub user_id: String,
    pub data: ResumeData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyImprovementRequest {
    /// The pending review as the client holds it.
    pub review: ReviewResult,
    pub improvement_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyImprovementResponse {
    pub project: ResumeProject,
    /// The review with the consumed improvement removed.
    pub review: ReviewResult,
    pub outcome: ApplyOutcome,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

pub(crate) async fn load_project(
    store: &dyn ProjectStore,
    id: Uuid,
) -> Result<ResumeProject, AppError> {
    store
        .get_project(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))
}

/// POST /api/v1/auth/guest
///
/// Mints a synthetic guest identity. Nothing is stored — the uid only ever
/// keys records in the local store.
pub async fn handle_guest_identity() -> Json<UserProfile> {
    Json(UserProfile::guest())
}

/// POST /api/v1/projects
///
/// Creates a project seeded from the user's master profile when one exists,
/// otherwise from the starter document.
pub async fn handle_create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<Json<ResumeProject>, AppError> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::Validation("userId cannot be empty".to_string()));
    }

    let data = state
        .store
        .load_master_profile(&request.user_id)
        .await?
        .unwrap_or_else(ResumeData::starter);

    let title = request.title.unwrap_or_else(|| "Untitled Resume".to_string());
    let project = ResumeProject::new(&request.user_id, &title, data);
    state.store.upsert_project(&project).await?;

    Ok(Json(project))
}

/// GET /api/v1/projects?user_id=…
pub async fn handle_list_projects(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeProject>>, AppError> {
    Ok(Json(state.store.list_projects(&params.user_id).await?))
}

/// GET /api/v1/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeProject>, AppError> {
    Ok(Json(load_project(state.store.as_ref(), id).await?))
}

/// PUT /api/v1/projects/:id
///
/// Updates the working copy and hands it to the autosaver; the store is
/// written when the debounce window closes, not here. The response carries
/// advisory link findings for the editor.
pub async fn handle_update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<UpdateProjectResponse>, AppError> {
    let mut project = load_project(state.store.as_ref(), id).await?;
    apply_fields(&mut project, request.data, request.title, request.template);
    touch(&mut project);

    let advisories = check_resume_links(&project.data);
    state.autosave.notify_edit(project.clone());

    Ok(Json(UpdateProjectResponse {
        project,
        advisories,
    }))
}

/// POST /api/v1/projects/:id/save
///
/// Explicit save: pushes a version snapshot and writes the store
/// immediately, bypassing the debounce.
pub async fn handle_save_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SaveProjectRequest>,
) -> Result<Json<ResumeProject>, AppError> {
    let mut project = load_project(state.store.as_ref(), id).await?;
    apply_fields(&mut project, request.data, request.title, request.template);
    push_version(&mut project, request.note);
    touch(&mut project);
    state.store.upsert_project(&project).await?;

    Ok(Json(project))
}

/// DELETE /api/v1/projects/:id
pub async fn handle_delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    // Load first so a bogus id is a 404, not a silent success.
    load_project(state.store.as_ref(), id).await?;
    state.store.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/:id/improvements/apply
///
/// Applies one pending audit finding to the stored document and consumes it
/// from the review. A finding whose target item no longer exists is spent
/// without touching the document.
pub async fn handle_apply_improvement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ApplyImprovementRequest>,
) -> Result<Json<ApplyImprovementResponse>, AppError> {
    let mut project = load_project(state.store.as_ref(), id).await?;
    let mut review = request.review;

    let outcome = apply_and_consume(&mut project.data, &mut review, &request.improvement_id)?;
    if outcome == ApplyOutcome::Applied {
        touch(&mut project);
        state.store.upsert_project(&project).await?;
    }

    Ok(Json(ApplyImprovementResponse {
        project,
        review,
        outcome,
    }))
}

/// GET /api/v1/profile/master?user_id=…
pub async fn handle_get_master_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeData>, AppError> {
    let profile = state
        .store
        .load_master_profile(&params.user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No master profile for user {}", params.user_id))
        })?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile/master
pub async fn handle_save_master_profile(
    State(state): State<AppState>,
    Json(request): Json<SaveMasterProfileRequest>,
) -> Result<StatusCode, AppError> {
    state
        .store
        .save_master_profile(&request.user_id, &request.data)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

fn apply_fields(
    project: &mut ResumeProject,
    data: Option<ResumeData>,
    title: Option<String>,
    template: Option<TemplateKind>,
) {
    if let Some(data) = data {
        project.data = data;
    }
    if let Some(title) = title {
        project.title = title;
    }
    if let Some(template) = template {
        project.template = template;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ResumeImprovement;
    use crate::config::Config;
    use crate::llm_client::GeminiClient;
    use crate::project::autosave::spawn_autosaver;
    use crate::store::local::LocalProjectStore;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    fn test_state(dir: &tempfile::TempDir) -> AppState {
        let store: Arc<dyn ProjectStore> =
            Arc::new(LocalProjectStore::new(dir.path().to_path_buf()));
        let (autosave, _task) = spawn_autosaver(store.clone(), Duration::from_millis(2_000));
        AppState {
            store,
            llm: GeminiClient::new(String::new()),
            autosave,
            config: Config {
                gemini_api_key: String::new(),
                database_url: None,
                data_dir: PathBuf::from(dir.path()),
                port: 8080,
                rust_log: "info".to_string(),
            },
        }
    }

    async fn create(state: &AppState, user_id: &str) -> ResumeProject {
        let response = handle_create_project(
            State(state.clone()),
            Json(CreateProjectRequest {
                user_id: user_id.to_string(),
                title: None,
            }),
        )
        .await
        .unwrap();
        response.0
    }

    #[tokio::test]
    async fn test_create_without_master_profile_seeds_starter() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let project = create(&state, "user-1").await;

        assert_eq!(project.title, "Untitled Resume");
        assert_eq!(project.data.personal_info.full_name, "Alex Developer");
        // Persisted immediately, not via autosave.
        assert!(state.store.get_project(project.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_seeds_from_master_profile_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let mut master = ResumeData::default();
        master.personal_info.full_name = "Ada Lovelace".to_string();
        state
            .store
            .save_master_profile("user-1", &master)
            .await
            .unwrap();

        let project = create(&state, "user-1").await;
        assert_eq!(project.data.personal_info.full_name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_explicit_save_pushes_a_version_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let project = create(&state, "user-1").await;

        let mut data = project.data.clone();
        data.personal_info.summary = "Explicitly saved.".to_string();
        let saved = handle_save_project(
            State(state.clone()),
            Path(project.id),
            Json(SaveProjectRequest {
                data: Some(data),
                ..Default::default()
            }),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(saved.versions.len(), 1);
        assert_eq!(saved.versions[0].note, "Version 1");
        assert_eq!(saved.revision, 1);

        let stored = state.store.get_project(project.id).await.unwrap().unwrap();
        assert_eq!(stored.data.personal_info.summary, "Explicitly saved.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_defers_the_write_to_the_autosaver() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let project = create(&state, "user-1").await;

        let mut data = project.data.clone();
        data.personal_info.summary = "Edited.".to_string();
        handle_update_project(
            State(state.clone()),
            Path(project.id),
            Json(UpdateProjectRequest {
                data: Some(data),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        // Inside the debounce window the store still has the old copy.
        let stored = state.store.get_project(project.id).await.unwrap().unwrap();
        assert_ne!(stored.data.personal_info.summary, "Edited.");

        sleep(Duration::from_millis(2_100)).await;
        let stored = state.store.get_project(project.id).await.unwrap().unwrap();
        assert_eq!(stored.data.personal_info.summary, "Edited.");
        assert!(stored.versions.is_empty());
    }

    #[tokio::test]
    async fn test_update_reports_link_advisories() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let project = create(&state, "user-1").await;

        let mut data = project.data.clone();
        data.personal_info.linkedin = "github.com/alex".to_string();
        let response = handle_update_project(
            State(state.clone()),
            Path(project.id),
            Json(UpdateProjectRequest {
                data: Some(data),
                ..Default::default()
            }),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(response.advisories.len(), 1);
        assert_eq!(response.advisories[0].field, "linkedin");
        // Advisory only: the update itself went through.
        assert_eq!(
            response.project.data.personal_info.linkedin,
            "github.com/alex"
        );
    }

    #[tokio::test]
    async fn test_apply_improvement_consumes_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let project = create(&state, "user-1").await;

        let review = ReviewResult {
            score: 70,
            summary: "ok".to_string(),
            improvements: vec![ResumeImprovement {
                id: "imp-1".to_string(),
                section: "personalInfo".to_string(),
                item_id: None,
                field: "summary".to_string(),
                issue: "Too generic".to_string(),
                suggestion: "Sharper summary.".to_string(),
            }],
        };

        let response = handle_apply_improvement(
            State(state.clone()),
            Path(project.id),
            Json(ApplyImprovementRequest {
                review,
                improvement_id: "imp-1".to_string(),
            }),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(response.outcome, ApplyOutcome::Applied);
        assert!(response.review.improvements.is_empty());

        let stored = state.store.get_project(project.id).await.unwrap().unwrap();
        assert_eq!(stored.data.personal_info.summary, "Sharper summary.");
    }

    #[tokio::test]
    async fn test_unknown_section_improvement_is_rejected_and_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let project = create(&state, "user-1").await;

        let review = ReviewResult {
            improvements: vec![ResumeImprovement {
                id: "imp-1".to_string(),
                section: "hobbies".to_string(),
                field: "x".to_string(),
                suggestion: "y".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let result = handle_apply_improvement(
            State(state.clone()),
            Path(project.id),
            Json(ApplyImprovementRequest {
                review,
                improvement_id: "imp-1".to_string(),
            }),
        )
        .await;

        assert!(matches!(result, Err(AppError::Merge(_))));
        let stored = state.store.get_project(project.id).await.unwrap().unwrap();
        assert_eq!(stored.revision, 0);
    }

    #[tokio::test]
    async fn test_get_missing_project_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let result = handle_get_project(State(state.clone()), Path(Uuid::new_v4())).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let project = create(&state, "user-1").await;

        let status = handle_delete_project(State(state.clone()), Path(project.id))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let result = handle_get_project(State(state.clone()), Path(project.id)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_master_profile_round_trip_via_handlers() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let missing = handle_get_master_profile(
            State(state.clone()),
            Query(UserIdQuery {
                user_id: "user-1".to_string(),
            }),
        )
        .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));

        let status = handle_save_master_profile(
            State(state.clone()),
            Json(SaveMasterProfileRequest {
                user_id: "user-1".to_string(),
                data: ResumeData::starter(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let profile = handle_get_master_profile(
            State(state.clone()),
            Query(UserIdQuery {
                user_id: "user-1".to_string(),
            }),
        )
        .await
        .unwrap()
        .0;
        assert_eq!(profile.personal_info.full_name, "Alex Developer");
    }
}
