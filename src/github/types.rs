// GitHub API response types.
// Defines structs for deserializing the repository and contents endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// License summary attached to a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub name: String,
}

/// GitHub repository, limited to the fields the directory consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub full_name: String,
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

/// File returned by the contents endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentFile {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// Popularity metadata for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub stars: u64,
    pub forks: u64,
    pub issues: u64,
    pub last_push: Option<DateTime<Utc>>,
    pub license: String,
}

/// License name used when a repository has none or metadata is unavailable.
pub const UNKNOWN_LICENSE: &str = "Unknown";

impl From<Repository> for RepoMetadata {
    fn from(repo: Repository) -> Self {
        Self {
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            issues: repo.open_issues_count,
            last_push: repo.pushed_at,
            license: repo
                .license
                .map(|l| l.name)
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNKNOWN_LICENSE.to_string()),
        }
    }
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}
