// Star count retrieval.
// Resolves repository URLs into star counts through the cache and batched upstream lookups.

pub mod batch;
pub mod fetcher;

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::CacheEntry;
use crate::error::StarboardError;
use crate::github::RepositoryRef;

pub use batch::BatchConfig;
pub use fetcher::StarFetcher;

/// Star lookup outcome for one requested URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarResult {
    pub stars: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StarResult {
    pub fn ok(stars: u64) -> Self {
        Self { stars, error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stars: 0,
            error: Some(message.into()),
        }
    }
}

impl From<CacheEntry> for StarResult {
    fn from(entry: CacheEntry) -> Self {
        Self {
            stars: entry.stars,
            error: entry.error,
        }
    }
}

/// Requested URL to its lookup outcome.
pub type StarsResponse = BTreeMap<String, StarResult>;

/// How a requested URL maps to a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Cache by the URL exactly as requested. Textual variants of one
    /// repository are cached and fetched independently.
    #[default]
    Raw,
    /// Cache by the canonical `https://github.com/owner/name` URL.
    /// Unparseable URLs fall back to raw keying.
    Normalized,
}

impl KeyPolicy {
    /// The URL under which the lookup for `url` is cached.
    pub fn cache_url(&self, url: &str) -> String {
        match self {
            KeyPolicy::Raw => url.to_string(),
            KeyPolicy::Normalized => RepositoryRef::parse(url)
                .map(|repo| format!("https://github.com/{}", repo))
                .unwrap_or_else(|_| url.to_string()),
        }
    }
}

impl FromStr for KeyPolicy {
    type Err = StarboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(KeyPolicy::Raw),
            "normalized" | "normalised" => Ok(KeyPolicy::Normalized),
            other => Err(StarboardError::Config(format!(
                "unknown cache key policy '{}', expected 'raw' or 'normalized'",
                other
            ))),
        }
    }
}
