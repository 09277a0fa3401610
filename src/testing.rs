// Test doubles shared by unit tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::cache::Clock;
use crate::error::{Result, StarboardError};
use crate::github::{RepoMetadata, RepoSource, RepositoryRef};

/// In-memory repository source that records every lookup.
#[derive(Default)]
pub struct FakeSource {
    repos: HashMap<String, std::result::Result<u64, String>>,
    readme: String,
    star_calls: Mutex<Vec<(String, Instant)>>,
    metadata_calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stars(mut self, full_name: &str, stars: u64) -> Self {
        self.repos.insert(full_name.to_string(), Ok(stars));
        self
    }

    pub fn with_failure(mut self, full_name: &str, message: &str) -> Self {
        self.repos
            .insert(full_name.to_string(), Err(message.to_string()));
        self
    }

    pub fn with_readme(mut self, readme: &str) -> Self {
        self.readme = readme.to_string();
        self
    }

    /// Repositories passed to `fetch_stars`, in call order.
    pub fn star_calls(&self) -> Vec<String> {
        self.star_calls.lock().iter().map(|(r, _)| r.clone()).collect()
    }

    /// Instants at which `fetch_stars` was entered.
    pub fn star_call_instants(&self) -> Vec<Instant> {
        self.star_calls.lock().iter().map(|(_, at)| *at).collect()
    }

    pub fn metadata_calls(&self) -> Vec<String> {
        self.metadata_calls.lock().clone()
    }

    fn lookup(&self, repo: &RepositoryRef) -> Result<u64> {
        match self.repos.get(&repo.full_name()) {
            Some(Ok(stars)) => Ok(*stars),
            Some(Err(message)) => Err(StarboardError::Upstream(message.clone())),
            None => Err(StarboardError::NotFound(repo.full_name())),
        }
    }
}

#[async_trait]
impl RepoSource for FakeSource {
    async fn fetch_stars(&self, repo: &RepositoryRef) -> Result<u64> {
        self.star_calls
            .lock()
            .push((repo.full_name(), Instant::now()));
        self.lookup(repo)
    }

    async fn fetch_metadata(&self, repo: &RepositoryRef) -> Result<RepoMetadata> {
        self.metadata_calls.lock().push(repo.full_name());
        let stars = self.lookup(repo)?;
        Ok(RepoMetadata {
            stars,
            forks: 3,
            issues: 1,
            last_push: None,
            license: "MIT License".to_string(),
        })
    }

    async fn fetch_readme(&self, _repo: &RepositoryRef) -> String {
        self.readme.clone()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let by = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::MAX);
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
