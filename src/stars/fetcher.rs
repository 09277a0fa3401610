// Batched star fetcher.
// Serves cache hits directly and looks up misses upstream in paced, concurrent batches.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::cache::StarCache;
use crate::github::{RepoSource, RepositoryRef};

use super::batch::BatchConfig;
use super::{KeyPolicy, StarResult, StarsResponse};

/// One cache slot to resolve, with every requested URL that maps to it.
struct Lookup<'a> {
    cache_url: String,
    urls: Vec<&'a str>,
}

/// Resolves repository URLs into star counts.
///
/// Every requested URL gets exactly one entry in the response. Lookup failures
/// are reported per URL as `{stars: 0, error}` and never fail the whole call.
#[derive(Clone)]
pub struct StarFetcher {
    source: Arc<dyn RepoSource>,
    cache: StarCache,
    batch: BatchConfig,
    key_policy: KeyPolicy,
}

impl StarFetcher {
    pub fn new(source: Arc<dyn RepoSource>, cache: StarCache) -> Self {
        Self {
            source,
            cache,
            batch: BatchConfig::default(),
            key_policy: KeyPolicy::default(),
        }
    }

    pub fn with_batch_config(mut self, batch: BatchConfig) -> Self {
        self.batch = batch;
        self
    }

    pub fn with_key_policy(mut self, key_policy: KeyPolicy) -> Self {
        self.key_policy = key_policy;
        self
    }

    pub fn cache(&self) -> &StarCache {
        &self.cache
    }

    /// Resolve star counts for `urls`. Duplicates are looked up once.
    pub async fn fetch_stars(&self, urls: &[String]) -> StarsResponse {
        let lookups = self.group_lookups(urls);
        let mut results = StarsResponse::new();
        let mut misses = Vec::new();

        for lookup in lookups {
            match self.cache.get(&lookup.cache_url).await {
                Some(entry) => {
                    let result = StarResult::from(entry);
                    for url in &lookup.urls {
                        results.insert(url.to_string(), result.clone());
                    }
                }
                None => misses.push(lookup),
            }
        }

        if misses.is_empty() {
            debug!(requested = urls.len(), "All star counts served from cache");
            return results;
        }

        let total_batches = misses.len().div_ceil(self.batch.batch_size.max(1));
        info!(
            cached = results.len(),
            to_fetch = misses.len(),
            batches = total_batches,
            "Fetching star counts from GitHub"
        );

        for (index, batch) in self.batch.batches(&misses).enumerate() {
            debug!(batch = index + 1, size = batch.len(), "Dispatching star batch");

            let outcomes = join_all(batch.iter().map(|lookup| self.fetch_one(lookup))).await;

            for (lookup, result) in batch.iter().zip(outcomes) {
                for url in &lookup.urls {
                    results.insert(url.to_string(), result.clone());
                }
            }

            if index + 1 < total_batches {
                tokio::time::sleep(self.batch.pacing).await;
            }
        }

        results
    }

    /// Deduplicate `urls` and group them by cache URL, keeping first-seen order.
    fn group_lookups<'a>(&self, urls: &'a [String]) -> Vec<Lookup<'a>> {
        let mut seen = HashSet::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut lookups: Vec<Lookup<'a>> = Vec::new();

        for url in urls {
            if !seen.insert(url.as_str()) {
                continue;
            }

            let cache_url = self.key_policy.cache_url(url);
            match index.get(&cache_url) {
                Some(&i) => lookups[i].urls.push(url.as_str()),
                None => {
                    index.insert(cache_url.clone(), lookups.len());
                    lookups.push(Lookup {
                        cache_url,
                        urls: vec![url.as_str()],
                    });
                }
            }
        }

        lookups
    }

    /// Look up one repository and record the outcome in the cache.
    ///
    /// Unparseable URLs are reported without touching the cache or the upstream API.
    async fn fetch_one(&self, lookup: &Lookup<'_>) -> StarResult {
        let repo = match RepositoryRef::parse(&lookup.cache_url) {
            Ok(repo) => repo,
            Err(e) => {
                warn!(url = %lookup.cache_url, "Skipping star lookup: {}", e);
                return StarResult::failed(e.to_string());
            }
        };

        match self.source.fetch_stars(&repo).await {
            Ok(stars) => {
                self.cache.set(&lookup.cache_url, stars, None).await;
                StarResult::ok(stars)
            }
            Err(e) => {
                let message = e.to_string();
                warn!(url = %lookup.cache_url, error = %message, "Failed to fetch stars");
                self.cache
                    .set(&lookup.cache_url, 0, Some(message.clone()))
                    .await;
                StarResult::failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheBackend, MemoryBackend, cache_key};
    use crate::testing::FakeSource;
    use std::collections::BTreeSet;
    use std::time::Duration;

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn fetcher(source: Arc<FakeSource>) -> (StarFetcher, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let cache = StarCache::new(backend.clone());
        (StarFetcher::new(source, cache), backend)
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let source = Arc::new(
            FakeSource::new()
                .with_stars("vuejs/router", 4000)
                .with_stars("vuejs/pinia", 13000),
        );
        let (fetcher, _) = fetcher(source.clone());
        let input = urls(&["https://github.com/vuejs/router", "https://github.com/vuejs/pinia"]);

        let first = fetcher.fetch_stars(&input).await;
        assert_eq!(source.star_calls().len(), 2);

        let second = fetcher.fetch_stars(&input).await;
        assert_eq!(source.star_calls().len(), 2, "no upstream calls on full hit");
        assert_eq!(first, second);
        assert_eq!(second["https://github.com/vuejs/pinia"], StarResult::ok(13000));
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successes() {
        let source = Arc::new(
            FakeSource::new()
                .with_stars("a/one", 1)
                .with_failure("a/two", "HTTP 502 Bad Gateway")
                .with_stars("a/three", 3),
        );
        let (fetcher, _) = fetcher(source);

        let result = fetcher
            .fetch_stars(&urls(&[
                "https://github.com/a/one",
                "https://github.com/a/two",
                "https://github.com/a/three",
            ]))
            .await;

        assert_eq!(result.len(), 3);
        assert_eq!(result["https://github.com/a/one"], StarResult::ok(1));
        assert_eq!(result["https://github.com/a/three"], StarResult::ok(3));
        assert_eq!(
            result["https://github.com/a/two"],
            StarResult::failed("HTTP 502 Bad Gateway")
        );
    }

    #[tokio::test]
    async fn test_failures_are_cached_and_not_retried() {
        let source = Arc::new(FakeSource::new().with_failure("a/down", "timed out"));
        let (fetcher, _) = fetcher(source.clone());
        let input = urls(&["https://github.com/a/down"]);

        let first = fetcher.fetch_stars(&input).await;
        let second = fetcher.fetch_stars(&input).await;

        assert_eq!(source.star_calls().len(), 1);
        assert_eq!(first, second);
        assert_eq!(
            second["https://github.com/a/down"].error.as_deref(),
            Some("timed out")
        );
    }

    #[tokio::test]
    async fn test_invalid_reference_is_per_item_and_not_cached() {
        let source = Arc::new(FakeSource::new().with_stars("a/b", 5));
        let (fetcher, backend) = fetcher(source.clone());

        let result = fetcher
            .fetch_stars(&urls(&["not-a-github-url", "https://github.com/a/b"]))
            .await;

        assert_eq!(result["https://github.com/a/b"], StarResult::ok(5));
        let invalid = &result["not-a-github-url"];
        assert_eq!(invalid.stars, 0);
        assert!(invalid.error.as_deref().unwrap().contains("Invalid GitHub URL"));

        assert!(
            backend
                .get_item(&cache_key("not-a-github-url"))
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(source.star_calls(), vec!["a/b".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicates_fetched_once_and_reported_once() {
        let source = Arc::new(FakeSource::new().with_stars("a/b", 2));
        let (fetcher, _) = fetcher(source.clone());

        let result = fetcher
            .fetch_stars(&urls(&[
                "https://github.com/a/b",
                "https://github.com/a/b",
                "https://github.com/a/b",
            ]))
            .await;

        assert_eq!(result.len(), 1);
        assert_eq!(source.star_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_raw_url_keying_caches_variants_separately() {
        let source = Arc::new(FakeSource::new().with_stars("a/b", 50).with_stars("c/d", 7));
        let (fetcher, _) = fetcher(source.clone());
        fetcher.cache().set("https://github.com/a/b", 42, None).await;

        let input = urls(&[
            "https://github.com/a/b",
            "https://github.com/a/b.git",
            "https://github.com/c/d",
        ]);
        let result = fetcher.fetch_stars(&input).await;

        let keys: BTreeSet<&str> = result.keys().map(String::as_str).collect();
        let expected: BTreeSet<&str> = input.iter().map(String::as_str).collect();
        assert_eq!(keys, expected);

        assert_eq!(result["https://github.com/a/b"], StarResult::ok(42));
        assert_eq!(result["https://github.com/a/b.git"], StarResult::ok(50));
        assert_eq!(result["https://github.com/c/d"], StarResult::ok(7));
        assert_eq!(source.star_calls(), vec!["a/b".to_string(), "c/d".to_string()]);
    }

    #[tokio::test]
    async fn test_normalized_keying_shares_cache_between_variants() {
        let source = Arc::new(FakeSource::new().with_stars("a/b", 50).with_stars("c/d", 7));
        let (fetcher, _) = fetcher(source.clone());
        let fetcher = fetcher.with_key_policy(KeyPolicy::Normalized);
        fetcher.cache().set("https://github.com/a/b", 42, None).await;

        let result = fetcher
            .fetch_stars(&urls(&[
                "https://github.com/a/b",
                "https://github.com/a/b.git",
                "http://github.com/c/d/",
                "https://github.com/c/d",
            ]))
            .await;

        assert_eq!(result.len(), 4);
        assert_eq!(result["https://github.com/a/b.git"], StarResult::ok(42));
        assert_eq!(result["http://github.com/c/d/"], StarResult::ok(7));
        assert_eq!(result["https://github.com/c/d"], StarResult::ok(7));
        assert_eq!(source.star_calls(), vec!["c/d".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batches_are_paced() {
        let source = Arc::new((0..25u64).fold(FakeSource::new(), |source, i| {
            source.with_stars(&format!("org/repo{}", i), i)
        }));
        let input: Vec<String> = (0..25)
            .map(|i| format!("https://github.com/org/repo{}", i))
            .collect();
        let (fetcher, _) = fetcher(source.clone());

        let start = tokio::time::Instant::now();
        let result = fetcher.fetch_stars(&input).await;
        let elapsed = start.elapsed();

        assert_eq!(result.len(), 25);
        assert_eq!(result["https://github.com/org/repo24"], StarResult::ok(24));

        let offsets: Vec<u128> = source
            .star_call_instants()
            .iter()
            .map(|at| at.duration_since(start).as_millis())
            .collect();
        let batch_sizes: Vec<usize> = [0u128, 100, 200]
            .iter()
            .map(|from| offsets.iter().filter(|o| **o >= *from && **o < from + 50).count())
            .collect();
        assert_eq!(batch_sizes, vec![10, 10, 5], "three batches, two pauses");
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(250), "no pause after the last batch");
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_hit_has_no_delay() {
        let source = Arc::new(FakeSource::new());
        let (fetcher, _) = fetcher(source.clone());
        for i in 0..15 {
            fetcher
                .cache()
                .set(&format!("https://github.com/org/r{}", i), i, None)
                .await;
        }
        let input: Vec<String> = (0..15).map(|i| format!("https://github.com/org/r{}", i)).collect();

        let start = tokio::time::Instant::now();
        let result = fetcher.fetch_stars(&input).await;

        assert_eq!(result.len(), 15);
        assert!(source.star_calls().is_empty());
        assert!(start.elapsed() < Duration::from_millis(1));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let (fetcher, _) = fetcher(Arc::new(FakeSource::new()));
        assert!(fetcher.fetch_stars(&[]).await.is_empty());
    }

    #[test]
    fn test_grouping_large_request_keeps_first_seen_order() {
        let (fetcher, _) = fetcher(Arc::new(FakeSource::new()));
        let fetcher = fetcher.with_key_policy(KeyPolicy::Normalized);
        let input: Vec<String> = (0..5_000)
            .map(|i| match i % 3 {
                0 => format!("https://github.com/org/repo{}", i % 1_000),
                1 => format!("https://github.com/org/repo{}.git", i % 1_000),
                _ => format!("https://github.com/org/repo{}", i % 1_000),
            })
            .collect();

        let lookups = fetcher.group_lookups(&input);

        assert_eq!(lookups.len(), 1_000);
        assert_eq!(lookups[0].cache_url, "https://github.com/org/repo0");
        assert_eq!(lookups[1].cache_url, "https://github.com/org/repo1");
        assert_eq!(
            lookups[0].urls,
            vec![
                "https://github.com/org/repo0",
                "https://github.com/org/repo0.git"
            ]
        );
        let grouped: usize = lookups.iter().map(|l| l.urls.len()).sum();
        assert_eq!(grouped, 2_000);
    }
}
