// Repository reference parsing.
// Extracts a canonical owner/name pair from the many textual forms of a GitHub URL.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, StarboardError};

/// Patterns tried in order. The first capture is the owner, the second the name.
static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // git@github.com:owner/name.git
        r"^git@github\.com:([^/\s]+)/([^/\s]+?)(?:\.git)?/?$",
        // https://github.com/owner/name(.git)(/)(?query)(#fragment)
        r"\bgithub\.com/([^/\s?#]+)/([^/\s?#]+?)(?:\.git)?/?(?:[?#].*)?$",
        // https://github.com/owner/name/tree/main/...
        r"\bgithub\.com/([^/\s?#]+)/([^/\s?#]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid repository URL regex"))
    .collect()
});

/// Canonical `owner/name` reference to a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    owner: String,
    name: String,
}

impl RepositoryRef {
    /// Parse a repository reference from a GitHub URL.
    ///
    /// Protocol, a trailing slash and a `.git` suffix do not affect the result.
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();

        for pattern in PATTERNS.iter() {
            let Some(captures) = pattern.captures(url) else {
                continue;
            };
            let owner = &captures[1];
            let name = captures[2].strip_suffix(".git").unwrap_or(&captures[2]);

            if owner.is_empty() || name.is_empty() {
                continue;
            }

            return Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            });
        }

        Err(StarboardError::InvalidReference(url.to_string()))
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `owner/name` path.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryRef {
    type Err = StarboardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(PATTERNS.len(), 3);
    }

    #[test]
    fn test_equivalent_urls_normalize_identically() {
        let variants = [
            "https://github.com/vuejs/router",
            "https://github.com/vuejs/router/",
            "https://github.com/vuejs/router.git",
            "https://github.com/vuejs/router.git/",
            "http://github.com/vuejs/router",
            "github.com/vuejs/router",
            "git@github.com:vuejs/router.git",
            "https://www.github.com/vuejs/router",
        ];

        for url in variants {
            let repo = RepositoryRef::parse(url).unwrap();
            assert_eq!(repo.full_name(), "vuejs/router", "url: {}", url);
        }
    }

    #[test]
    fn test_deep_links_use_repository_segment() {
        let repo = RepositoryRef::parse("https://github.com/vuejs/pinia/tree/v2/packages").unwrap();
        assert_eq!(repo.owner(), "vuejs");
        assert_eq!(repo.name(), "pinia");

        let repo = RepositoryRef::parse("https://github.com/intlify/vue-i18n#readme").unwrap();
        assert_eq!(repo.full_name(), "intlify/vue-i18n");
    }

    #[test]
    fn test_git_only_stripped_as_suffix() {
        let repo = RepositoryRef::parse("https://github.com/owner/site.github.io").unwrap();
        assert_eq!(repo.name(), "site.github.io");
    }

    #[test]
    fn test_invalid_urls() {
        for url in [
            "",
            "not a url",
            "https://gitlab.com/owner/name",
            "https://github.com/owner",
            "https://github.com/",
            "https://notgithub.com/owner/name",
        ] {
            let err = RepositoryRef::parse(url).unwrap_err();
            assert!(
                matches!(err, StarboardError::InvalidReference(_)),
                "url: {}",
                url
            );
        }
    }

    #[test]
    fn test_display_and_from_str() {
        let repo: RepositoryRef = "https://github.com/a/b".parse().unwrap();
        assert_eq!(repo.to_string(), "a/b");
    }
}
