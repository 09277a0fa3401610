// GitHub API endpoint functions.
// Provides typed methods for the repository and contents endpoints.

use std::time::Duration;

use tracing::debug;

use crate::error::Result;

use super::client::{DETAIL_TIMEOUT, GitHubClient};
use super::readme::{self, DEFAULT_BRANCH, README_CANDIDATES};
use super::reference::RepositoryRef;
use super::types::{ContentFile, RepoMetadata, Repository};

impl GitHubClient {
    /// Get a specific repository.
    pub async fn get_repo(&self, repo: &RepositoryRef, timeout: Duration) -> Result<Repository> {
        let response = self
            .get(&format!("/repos/{}/{}", repo.owner(), repo.name()), timeout)
            .await?;
        let repository: Repository = response.json().await?;
        Ok(repository)
    }

    /// Get a file through the contents endpoint.
    pub async fn get_contents(&self, repo: &RepositoryRef, path: &str) -> Result<ContentFile> {
        let response = self
            .get(
                &format!("/repos/{}/{}/contents/{}", repo.owner(), repo.name(), path),
                DETAIL_TIMEOUT,
            )
            .await?;
        let file: ContentFile = response.json().await?;
        Ok(file)
    }

    /// Fetch normalized popularity metadata for a repository.
    pub async fn fetch_repo_metadata(
        &self,
        repo: &RepositoryRef,
        timeout: Duration,
    ) -> Result<RepoMetadata> {
        let repository = self.get_repo(repo, timeout).await?;
        Ok(RepoMetadata::from(repository))
    }

    /// Fetch the README of a repository with relative links made absolute.
    ///
    /// Returns an empty string when no candidate file exists.
    pub async fn fetch_readme(&self, repo: &RepositoryRef) -> String {
        for filename in README_CANDIDATES {
            let file = match self.get_contents(repo, filename).await {
                Ok(file) => file,
                Err(e) => {
                    debug!(repo = %repo, filename, error = %e, "README candidate unavailable");
                    continue;
                }
            };

            let (Some(content), Some("base64")) = (file.content.as_deref(), file.encoding.as_deref())
            else {
                continue;
            };

            match readme::decode_content(content) {
                Ok(text) => {
                    return readme::rewrite_relative_links(
                        &text,
                        |path| self.raw_url(repo, DEFAULT_BRANCH, path),
                        |path| self.blob_url(repo, DEFAULT_BRANCH, path),
                    );
                }
                Err(e) => {
                    debug!(repo = %repo, filename, error = %e, "README candidate undecodable");
                }
            }
        }

        String::new()
    }
}
