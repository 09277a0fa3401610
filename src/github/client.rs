// GitHub API HTTP client.
// Handles optional authentication, per-request timeouts, and rate limit tracking.

use std::time::Duration;

use parking_lot::Mutex;
use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::config::Config;
use crate::error::{Result, StarboardError};

use super::reference::RepositoryRef;
use super::types::RateLimit;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const GITHUB_RAW_BASE: &str = "https://raw.githubusercontent.com";
pub const GITHUB_HTML_BASE: &str = "https://github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const CLIENT_USER_AGENT: &str = "starboard-plugin-directory";

/// Longest upstream body excerpt carried in an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Timeout for the star-only lookups issued in batches.
pub const STARS_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for the richer single-repository detail lookups.
pub const DETAIL_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub token: Option<String>,
    pub api_base: String,
    pub raw_base: String,
    pub html_base: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: GITHUB_API_BASE.to_string(),
            raw_base: GITHUB_RAW_BASE.to_string(),
            html_base: GITHUB_HTML_BASE.to_string(),
        }
    }
}

impl From<&Config> for ClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            token: config.github_token.clone(),
            api_base: config.github_api_base.clone(),
            raw_base: config.github_raw_base.clone(),
            html_base: config.github_html_base.clone(),
        }
    }
}

/// GitHub API client with optional authentication and rate limit tracking.
///
/// Without a token requests are unauthenticated and get GitHub's lower rate limit.
pub struct GitHubClient {
    client: Client,
    config: ClientConfig,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a new GitHub client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| StarboardError::Config(e.to_string()))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(StarboardError::Api)?;

        Ok(Self {
            client,
            config,
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Whether requests carry a bearer token.
    pub fn is_authenticated(&self) -> bool {
        self.config.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Get a snapshot of the most recent rate limit information.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit.lock().clone()
    }

    /// Raw-content URL for a file on a branch.
    pub fn raw_url(&self, repo: &RepositoryRef, branch: &str, path: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.config.raw_base.trim_end_matches('/'),
            repo,
            branch,
            path
        )
    }

    /// Web URL for a file on a branch.
    pub fn blob_url(&self, repo: &RepositoryRef, branch: &str, path: &str) -> String {
        format!(
            "{}/{}/blob/{}/{}",
            self.config.html_base.trim_end_matches('/'),
            repo,
            branch,
            path
        )
    }

    /// Make a GET request to the GitHub API, bounded by `timeout`.
    pub async fn get(&self, endpoint: &str, timeout: Duration) -> Result<Response> {
        let url = format!("{}{}", self.config.api_base.trim_end_matches('/'), endpoint);
        let response = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(StarboardError::Api)?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| -> Option<u64> {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };

        let mut rate_limit = self.rate_limit.lock();
        if let Some(limit) = header("x-ratelimit-limit") {
            rate_limit.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            rate_limit.remaining = remaining;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            rate_limit.reset = reset;
        }
    }

    /// Whether the last response reported an exhausted quota.
    fn is_rate_limited(&self) -> bool {
        let rate_limit = self.rate_limit.lock();
        rate_limit.limit > 0 && rate_limit.remaining == 0
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(StarboardError::Unauthorized),
            StatusCode::NOT_FOUND => {
                let url = response.url().to_string();
                Err(StarboardError::NotFound(url))
            }
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
                if self.is_rate_limited() =>
            {
                let reset = self.rate_limit.lock().reset;
                let reset_at = chrono::DateTime::from_timestamp(reset as i64, 0)
                    .map(|dt| dt.format("%H:%M:%S").to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                Err(StarboardError::RateLimited { reset_at })
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(StarboardError::Upstream(upstream_message(status, &body)))
            }
        }
    }
}

/// Error text for an unexpected status: the status plus the start of a
/// single-line body. Multi-line bodies (HTML error pages) are omitted.
fn upstream_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() || body.contains('\n') {
        return format!("HTTP {status}");
    }

    let mut excerpt: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    if excerpt.len() < body.len() {
        excerpt.push_str("...");
    }
    format!("HTTP {status}: {excerpt}")
}
