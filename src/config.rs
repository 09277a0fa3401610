use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::{STARS_NAMESPACE, namespace_dir};
use crate::error::{Result, StarboardError};
use crate::github::client::{GITHUB_API_BASE, GITHUB_HTML_BASE, GITHUB_RAW_BASE};
use crate::stars::KeyPolicy;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl FromStr for Environment {
    type Err = StarboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(StarboardError::Config(format!(
                "STARBOARD_ENV must be 'development' or 'production', got '{}'",
                other
            ))),
        }
    }
}

/// Where star cache entries are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackendKind {
    #[default]
    File,
    Memory,
}

impl FromStr for CacheBackendKind {
    type Err = StarboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(CacheBackendKind::File),
            "memory" => Ok(CacheBackendKind::Memory),
            other => Err(StarboardError::Config(format!(
                "STARS_CACHE_BACKEND must be 'file' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub github_token: Option<String>,
    pub github_api_base: String,
    pub github_raw_base: String,
    pub github_html_base: String,
    pub environment: Environment,
    pub cache_backend: CacheBackendKind,
    pub cache_dir: Option<PathBuf>,
    pub cache_key: KeyPolicy,
    pub catalog_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            github_token: None,
            github_api_base: GITHUB_API_BASE.to_string(),
            github_raw_base: GITHUB_RAW_BASE.to_string(),
            github_html_base: GITHUB_HTML_BASE.to_string(),
            environment: Environment::default(),
            cache_backend: CacheBackendKind::default(),
            cache_dir: namespace_dir(STARS_NAMESPACE),
            cache_key: KeyPolicy::default(),
            catalog_path: PathBuf::from("plugins.json"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            listen_addr: var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            // An absent token only means a lower, unauthenticated rate limit
            github_token: var("GITHUB_TOKEN"),
            github_api_base: var("GITHUB_API_BASE").unwrap_or(defaults.github_api_base),
            github_raw_base: var("GITHUB_RAW_BASE").unwrap_or(defaults.github_raw_base),
            github_html_base: var("GITHUB_HTML_BASE").unwrap_or(defaults.github_html_base),
            environment: var("STARBOARD_ENV")
                .map(|v| v.parse::<Environment>())
                .transpose()?
                .unwrap_or_default(),
            cache_backend: var("STARS_CACHE_BACKEND")
                .map(|v| v.parse::<CacheBackendKind>())
                .transpose()?
                .unwrap_or_default(),
            cache_dir: var("STARS_CACHE_DIR")
                .map(PathBuf::from)
                .or(defaults.cache_dir),
            cache_key: var("STARS_CACHE_KEY")
                .map(|v| v.parse::<KeyPolicy>())
                .transpose()?
                .unwrap_or_default(),
            catalog_path: var("CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.trim().is_empty() {
            return Err(StarboardError::Config(
                "LISTEN_ADDR cannot be empty".to_string(),
            ));
        }

        for (name, url) in [
            ("GITHUB_API_BASE", &self.github_api_base),
            ("GITHUB_RAW_BASE", &self.github_raw_base),
            ("GITHUB_HTML_BASE", &self.github_html_base),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(StarboardError::Config(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        if self.cache_backend == CacheBackendKind::File && self.cache_dir.is_none() {
            return Err(StarboardError::Config(
                "STARS_CACHE_DIR is required when no platform cache directory exists".to_string(),
            ));
        }

        Ok(())
    }

    /// Token exposed to client-side code. Only development builds get the real token.
    pub fn public_github_token(&self) -> String {
        match self.environment {
            Environment::Development => self.github_token.clone().unwrap_or_default(),
            Environment::Production => String::new(),
        }
    }
}
