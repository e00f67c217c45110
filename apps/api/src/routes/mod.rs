pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ai::handlers as ai;
use crate::project::handlers as projects;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Identity (guest mode only — cloud callers arrive with a provider uid)
        .route("/api/v1/auth/guest", post(projects::handle_guest_identity))
        // Projects
        .route(
            "/api/v1/projects",
            get(projects::handle_list_projects).post(projects::handle_create_project),
        )
        .route(
            "/api/v1/projects/:id",
            get(projects::handle_get_project)
                .put(projects::handle_update_project)
                .delete(projects::handle_delete_project),
        )
        .route(
            "/api/v1/projects/:id/save",
            post(projects::handle_save_project),
        )
        .route(
            "/api/v1/projects/:id/improvements/apply",
            post(projects::handle_apply_improvement),
        )
        // Master profile
        .route(
            "/api/v1/profile/master",
            get(projects::handle_get_master_profile).put(projects::handle_save_master_profile),
        )
        // AI pipeline
        .route("/api/v1/ai/optimize", post(ai::handle_optimize))
        .route("/api/v1/ai/summary", post(ai::handle_summary))
        .route("/api/v1/ai/refine", post(ai::handle_refine))
        .route("/api/v1/ai/analyze", post(ai::handle_analyze))
        .route("/api/v1/ai/review", post(ai::handle_review))
        .route("/api/v1/ai/scan", post(ai::handle_scan))
        .route("/api/v1/ai/import", post(ai::handle_import))
        .with_state(state)
}
