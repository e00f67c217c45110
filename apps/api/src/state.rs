use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::project::autosave::AutosaveHandle;
use crate::store::ProjectStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres for signed-in use, local JSON files for guest mode.
    /// Chosen once at startup from `DATABASE_URL`.
    pub store: Arc<dyn ProjectStore>,
    pub llm: GeminiClient,
    /// Feeds working-copy edits into the debounced autosave actor.
    pub autosave: AutosaveHandle,
    /// Deployment settings as loaded at startup.
    #[allow(dead_code)]
    pub config: Config,
}
