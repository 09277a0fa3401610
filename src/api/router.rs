use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::catalog::Catalog;
use crate::details::DetailService;
use crate::stars::StarFetcher;

use super::handlers::{
    categories_handler, health_handler, list_plugins_handler, plugin_details_handler,
    runtime_config_handler, stars_handler, types_handler,
};

/// Application state container
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub stars: StarFetcher,
    pub details: DetailService,
    pub public_github_token: Arc<str>,
}

/// Create router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/github/stars", post(stars_handler))
        .route("/api/plugins", get(list_plugins_handler))
        .route("/api/plugins/{id}", get(plugin_details_handler))
        .route("/api/categories", get(categories_handler))
        .route("/api/types", get(types_handler))
        .route("/api/runtime-config", get(runtime_config_handler))
        .with_state(state)
}
