mod ai;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod project;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::GeminiClient;
use crate::project::autosave::{spawn_autosaver, AUTOSAVE_DEBOUNCE};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::local::LocalProjectStore;
use crate::store::postgres::{ensure_schema, PgProjectStore};
use crate::store::ProjectStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailr API v{}", env!("CARGO_PKG_VERSION"));

    // Cloud store when a database is configured, guest-mode local store
    // otherwise.
    let store: Arc<dyn ProjectStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgProjectStore::new(pool))
        }
        None => {
            info!(
                "No DATABASE_URL set — guest mode, local store at {}",
                config.data_dir.display()
            );
            Arc::new(LocalProjectStore::new(config.data_dir.clone()))
        }
    };

    // Initialize LLM client. A missing key is not fatal here: every AI
    // action checks it per call and fails with a configuration error.
    let llm = GeminiClient::new(config.gemini_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Debounced autosaver for working-copy edits.
    let (autosave, _autosave_task) = spawn_autosaver(store.clone(), AUTOSAVE_DEBOUNCE);

    // Build app state
    let state = AppState {
        store,
        llm,
        autosave,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
