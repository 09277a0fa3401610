// Application wiring.
// Builds the cache, GitHub client, catalog, and services from configuration.

use std::sync::Arc;

use tracing::info;

use crate::api::AppState;
use crate::cache::{CacheBackend, FileBackend, MemoryBackend, StarCache};
use crate::catalog::Catalog;
use crate::config::{CacheBackendKind, Config};
use crate::details::DetailService;
use crate::error::{Result, StarboardError};
use crate::github::{ClientConfig, GitHubClient, RepoSource};
use crate::stars::StarFetcher;

/// Create the star cache backend selected by configuration.
pub fn cache_backend(config: &Config) -> Result<Arc<dyn CacheBackend>> {
    match config.cache_backend {
        CacheBackendKind::Memory => {
            info!("Using in-memory star cache");
            Ok(Arc::new(MemoryBackend::new()))
        }
        CacheBackendKind::File => {
            let dir = config.cache_dir.clone().ok_or_else(|| {
                StarboardError::Config("no cache directory available".to_string())
            })?;
            info!(dir = %dir.display(), "Using file-backed star cache");
            Ok(Arc::new(FileBackend::new(dir)))
        }
    }
}

/// Assemble application state around an explicit source and catalog.
pub fn build_state_with(
    config: &Config,
    source: Arc<dyn RepoSource>,
    backend: Arc<dyn CacheBackend>,
    catalog: Catalog,
) -> AppState {
    let cache = StarCache::new(backend);
    let stars = StarFetcher::new(Arc::clone(&source), cache.clone()).with_key_policy(config.cache_key);
    let details = DetailService::new(source, cache).with_key_policy(config.cache_key);

    AppState {
        catalog: Arc::new(catalog),
        stars,
        details,
        public_github_token: Arc::from(config.public_github_token()),
    }
}

/// Assemble application state from configuration.
pub fn build_state(config: &Config) -> Result<AppState> {
    let client = GitHubClient::new(ClientConfig::from(config))?;
    if !client.is_authenticated() {
        info!("GITHUB_TOKEN not set, using unauthenticated GitHub rate limits");
    }

    let catalog = Catalog::load_or_empty(&config.catalog_path)?;
    let backend = cache_backend(config)?;

    Ok(build_state_with(config, Arc::new(client), backend, catalog))
}
