// Plugin catalog.
// Loads the static plugin list and answers search, filter, and pagination queries.

pub mod types;

use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

pub use types::{Author, AuthorProfile, Authors, CATEGORIES, Plugin, PluginType};

const DEFAULT_PAGE_SIZE: usize = 12;

/// Sort orders accepted by the listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NameAsc,
    NameDesc,
}

impl SortOrder {
    /// Parse a sort key. Unknown keys sort by name ascending.
    pub fn parse(value: &str) -> Self {
        match value {
            "name-desc" => SortOrder::NameDesc,
            _ => SortOrder::NameAsc,
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

/// In-memory plugin catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    plugins: Vec<Plugin>,
}

impl Catalog {
    pub fn new(plugins: Vec<Plugin>) -> Self {
        Self { plugins }
    }

    /// Load the catalog from a JSON array file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let plugins: Vec<Plugin> = serde_json::from_str(&contents)?;
        info!(path = %path.display(), plugins = plugins.len(), "Catalog loaded");
        Ok(Self::new(plugins))
    }

    /// Load the catalog, starting empty when the file does not exist.
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "Catalog file not found, starting with an empty catalog");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Find a plugin by id.
    pub fn find(&self, id: &str) -> Option<&Plugin> {
        self.plugins.iter().find(|p| p.id == id)
    }

    /// Sorted unique plugin types present in the catalog.
    pub fn types(&self) -> Vec<&'static str> {
        let mut types: Vec<PluginType> = self.plugins.iter().map(|p| p.plugin_type).collect();
        types.sort_by_key(|t| t.as_str());
        types.dedup();
        types.into_iter().map(|t| t.as_str()).collect()
    }

    /// Search, filter, sort, and paginate the catalog.
    pub fn list(&self, query: &PluginQuery) -> Page<Plugin> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let category = query.category.as_deref().filter(|c| !c.is_empty());

        let mut matches: Vec<&Plugin> = self
            .plugins
            .iter()
            .filter(|p| search.as_deref().is_none_or(|s| matches_search(p, s)))
            .filter(|p| category.is_none_or(|c| p.category == c))
            .collect();

        let order = query.sort.as_deref().map(SortOrder::parse).unwrap_or_default();
        matches.sort_by(|a, b| match order {
            SortOrder::NameAsc => compare_names(&a.name, &b.name),
            SortOrder::NameDesc => compare_names(&b.name, &a.name),
        });

        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let total = matches.len();

        let data = matches
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .cloned()
            .collect();

        Page {
            data,
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit),
        }
    }
}

fn matches_search(plugin: &Plugin, needle: &str) -> bool {
    plugin.name.to_lowercase().contains(needle)
        || plugin.description.to_lowercase().contains(needle)
        || plugin.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
