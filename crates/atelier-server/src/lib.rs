//! atelier-server - HTTP boundary over the generation core
//!
//! Exposes `generate`, status polling, a readiness wait and the preview proxy
//! to UI clients. Store calls are blocking, so each request's call chain runs
//! on tokio's blocking pool.

use atelier_core::Result;
use atelier_gen::{create_store, AssetStore, AtelierConfig, Orchestrator};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;

/// Largest sketch upload accepted
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The store chosen at startup (real or mock)
    pub store: Arc<dyn AssetStore>,
    pub orchestrator: Orchestrator,
}

impl AppState {
    /// Create state around an already-selected store
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        let orchestrator = Orchestrator::new(Arc::clone(&store));
        Self {
            store,
            orchestrator,
        }
    }

    /// Select the store from config; fails fast when live mode has no token
    pub fn from_config(config: &AtelierConfig) -> Result<Self> {
        let store: Arc<dyn AssetStore> = Arc::from(create_store(config)?);
        Ok(Self::new(store))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::root))
        .route("/generate/text-to-image", post(api::text_to_image))
        .route("/generate/text-to-model", post(api::text_to_model))
        .route("/generate/sketch-to-model", post(api::sketch_to_model))
        .route("/generate/image-to-model", post(api::sketch_to_model))
        .route("/status/:asset_id", get(api::get_status))
        .route("/wait/:asset_id", get(api::wait_ready))
        .route("/proxy-glb/:asset_id", get(api::proxy_glb))
        .route("/proxy-image/:asset_id", get(api::proxy_image))
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(state: AppState, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(store = state.store.name(), "atelier-server listening on http://{}", addr);
    axum::serve(listener, build_router(state)).await
}
