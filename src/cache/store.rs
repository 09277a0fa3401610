// Star cache store.
// Wraps a key-value backend with TTL checking, lazy expiry, and error containment.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::backend::{CacheBackend, CacheError};

/// Lifetime of a star cache entry: 1 hour.
pub const STARS_TTL: Duration = Duration::from_secs(60 * 60);

/// Source of the current time, injectable for expiry tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One cached star lookup, successful or failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Star count; zero for failed lookups.
    pub stars: u64,
    /// When the upstream lookup finished.
    pub fetched_at: DateTime<Utc>,
    /// Failure message of the lookup, if it failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CacheEntry {
    /// Check if this entry has expired at `now`. Entries dated in the future count as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let elapsed = now
            .signed_duration_since(self.fetched_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed > ttl
    }
}

/// Cache key for a URL: `stars:<base64 of the URL>`.
pub fn cache_key(url: &str) -> String {
    format!("stars:{}", STANDARD.encode(url))
}

/// TTL cache of star counts keyed by URL.
///
/// `get` and `set` never fail: backend errors are logged and degrade to a miss or a no-op.
#[derive(Clone)]
pub struct StarCache {
    backend: Arc<dyn CacheBackend>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl StarCache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self::with_clock(backend, Arc::new(SystemClock))
    }

    pub fn with_clock(backend: Arc<dyn CacheBackend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            ttl: STARS_TTL,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a fresh entry. Stale entries are removed and reported absent.
    pub async fn get(&self, url: &str) -> Option<CacheEntry> {
        let key = cache_key(url);
        let entry = match self.read(&key).await {
            Ok(entry) => entry?,
            Err(e) => {
                warn!(url, error = %e, "Error reading from star cache");
                return None;
            }
        };

        if entry.is_expired_at(self.clock.now(), self.ttl) {
            if let Err(e) = self.backend.remove_item(&key).await {
                warn!(url, error = %e, "Error removing expired star cache entry");
            }
            return None;
        }

        Some(entry)
    }

    /// Look up the last stored entry regardless of age, without expiring it.
    pub async fn peek(&self, url: &str) -> Option<CacheEntry> {
        match self.read(&cache_key(url)).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(url, error = %e, "Error reading from star cache");
                None
            }
        }
    }

    /// Store the outcome of a lookup, stamped with the current time.
    pub async fn set(&self, url: &str, stars: u64, error: Option<String>) {
        let entry = CacheEntry {
            stars,
            fetched_at: self.clock.now(),
            error,
        };

        if let Err(e) = self.write(&cache_key(url), &entry).await {
            warn!(url, error = %e, "Error writing to star cache");
        }
    }

    async fn read(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        match self.backend.get_item(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn write(&self, key: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        let json = serde_json::to_string(entry)?;
        self.backend.set_item(key, &json).await
    }
}
