// Plugin detail enrichment.
// Combines a catalog entry with live repository metadata, README, and a download figure.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::warn;

use crate::cache::StarCache;
use crate::catalog::Plugin;
use crate::github::{RepoMetadata, RepoSource, RepositoryRef, UNKNOWN_LICENSE};
use crate::stars::KeyPolicy;

/// Placeholder download counts are drawn from this range.
const DOWNLOADS_RANGE: std::ops::Range<u64> = 10_000..1_010_000;

/// Catalog entry enriched with repository statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginWithStats {
    #[serde(flatten)]
    pub plugin: Plugin,
    pub stars: u64,
    pub downloads: u64,
    pub last_commit: DateTime<Utc>,
    pub license: String,
    pub readme: String,
    pub issues: u64,
    pub forks: u64,
}

/// Builds detail records. Never fails: upstream problems degrade to cached or default values.
#[derive(Clone)]
pub struct DetailService {
    source: Arc<dyn RepoSource>,
    cache: StarCache,
    key_policy: KeyPolicy,
}

impl DetailService {
    pub fn new(source: Arc<dyn RepoSource>, cache: StarCache) -> Self {
        Self {
            source,
            cache,
            key_policy: KeyPolicy::default(),
        }
    }

    /// Key the star cache the same way as the star fetcher sharing it.
    pub fn with_key_policy(mut self, key_policy: KeyPolicy) -> Self {
        self.key_policy = key_policy;
        self
    }

    /// Enrich a catalog entry. Metadata and README are fetched concurrently.
    pub async fn enrich(&self, plugin: &Plugin) -> PluginWithStats {
        let (metadata, readme) = tokio::join!(
            self.fetch_metadata(&plugin.github_url),
            self.fetch_readme(&plugin.github_url)
        );

        PluginWithStats {
            plugin: plugin.clone(),
            stars: metadata.stars,
            downloads: mock_downloads(),
            last_commit: metadata.last_push.unwrap_or_else(Utc::now),
            license: metadata.license,
            readme,
            issues: metadata.issues,
            forks: metadata.forks,
        }
    }

    /// Fetch metadata, refreshing the star cache on success.
    ///
    /// On failure the last cached star count is used even if stale.
    async fn fetch_metadata(&self, github_url: &str) -> RepoMetadata {
        let result = match RepositoryRef::parse(github_url) {
            Ok(repo) => self.source.fetch_metadata(&repo).await,
            Err(e) => Err(e),
        };

        let cache_url = self.key_policy.cache_url(github_url);
        match result {
            Ok(metadata) => {
                self.cache.set(&cache_url, metadata.stars, None).await;
                metadata
            }
            Err(e) => {
                warn!(url = github_url, error = %e, "Failed to fetch GitHub data");
                let stars = self
                    .cache
                    .peek(&cache_url)
                    .await
                    .map(|entry| entry.stars)
                    .unwrap_or(0);

                RepoMetadata {
                    stars,
                    forks: 0,
                    issues: 0,
                    last_push: None,
                    license: UNKNOWN_LICENSE.to_string(),
                }
            }
        }
    }

    async fn fetch_readme(&self, github_url: &str) -> String {
        match RepositoryRef::parse(github_url) {
            Ok(repo) => self.source.fetch_readme(&repo).await,
            Err(e) => {
                warn!(url = github_url, error = %e, "Failed to fetch README");
                String::new()
            }
        }
    }
}

/// Random placeholder for package downloads.
fn mock_downloads() -> u64 {
    rand::rng().random_range(DOWNLOADS_RANGE)
}
