// Repository data source abstraction.
// Lets the star fetcher and detail aggregator run against GitHub or a test double.

use async_trait::async_trait;

use crate::error::Result;

use super::client::{DETAIL_TIMEOUT, GitHubClient, STARS_TIMEOUT};
use super::reference::RepositoryRef;
use super::types::RepoMetadata;

/// Upstream source of repository popularity data.
///
/// Implementations never retry and never touch the star cache.
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// Star count only, for batched lookups.
    async fn fetch_stars(&self, repo: &RepositoryRef) -> Result<u64>;

    /// Full metadata, for the plugin detail view.
    async fn fetch_metadata(&self, repo: &RepositoryRef) -> Result<RepoMetadata>;

    /// README with absolute links, or an empty string.
    async fn fetch_readme(&self, repo: &RepositoryRef) -> String;
}

#[async_trait]
impl RepoSource for GitHubClient {
    async fn fetch_stars(&self, repo: &RepositoryRef) -> Result<u64> {
        let repository = self.get_repo(repo, STARS_TIMEOUT).await?;
        Ok(repository.stargazers_count)
    }

    async fn fetch_metadata(&self, repo: &RepositoryRef) -> Result<RepoMetadata> {
        self.fetch_repo_metadata(repo, DETAIL_TIMEOUT).await
    }

    async fn fetch_readme(&self, repo: &RepositoryRef) -> String {
        GitHubClient::fetch_readme(self, repo).await
    }
}
