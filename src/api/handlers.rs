use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::catalog::{CATEGORIES, Page, Plugin, PluginQuery};
use crate::details::PluginWithStats;
use crate::stars::StarsResponse;

use super::errors::ApiError;
use super::router::AppState;

/// Body of the star lookup request.
#[derive(Debug, Deserialize)]
pub struct StarsRequest {
    #[serde(rename = "repositoryUrls", alias = "githubUrls")]
    pub repository_urls: Vec<String>,
}

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /api/github/stars
/// Resolve star counts for a list of repository URLs
pub async fn stars_handler(
    State(state): State<AppState>,
    payload: Result<Json<StarsRequest>, JsonRejection>,
) -> Result<Json<StarsResponse>, ApiError> {
    let Json(request) = payload?;
    debug!(urls = request.repository_urls.len(), "Star lookup requested");

    let response = state.stars.fetch_stars(&request.repository_urls).await;
    Ok(Json(response))
}

/// GET /api/plugins
/// Search, filter, and paginate the catalog
pub async fn list_plugins_handler(
    State(state): State<AppState>,
    Query(query): Query<PluginQuery>,
) -> Json<Page<Plugin>> {
    Json(state.catalog.list(&query))
}

/// GET /api/plugins/{id}
/// Catalog entry enriched with repository statistics
pub async fn plugin_details_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PluginWithStats>, ApiError> {
    let plugin = state
        .catalog
        .find(&id)
        .ok_or_else(|| ApiError::not_found("Plugin not found"))?;

    Ok(Json(state.details.enrich(plugin).await))
}

/// GET /api/categories
pub async fn categories_handler() -> Json<Vec<&'static str>> {
    Json(CATEGORIES.to_vec())
}

/// GET /api/types
pub async fn types_handler(State(state): State<AppState>) -> Json<Vec<&'static str>> {
    Json(state.catalog.types())
}

/// GET /api/runtime-config
/// Client-visible settings; the token is only exposed in development
pub async fn runtime_config_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "githubToken": &*state.public_github_token }))
}
