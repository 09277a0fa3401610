// Catalog record types.
// Mirrors the JSON shape of the plugin catalog file.

use serde::{Deserialize, Serialize};

/// Categories offered by the directory, in display order.
pub const CATEGORIES: [&str; 10] = [
    "Routing",
    "State Management",
    "Utilities",
    "Internationalization",
    "UI Framework",
    "Animation",
    "Forms",
    "Testing",
    "Development Tools",
    "Data Fetching",
];

/// Whether a plugin is maintained by the framework team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginType {
    Official,
    Community,
}

impl PluginType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginType::Official => "official",
            PluginType::Community => "community",
        }
    }
}

/// Author with a profile link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub name: String,
    pub github_url: String,
}

/// A single author, either a bare name or a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Profile(AuthorProfile),
}

/// One author or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Authors {
    One(Author),
    Many(Vec<Author>),
}

/// Plugin catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plugin {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub package_name: String,
    pub github_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    pub author: Authors,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub plugin_type: PluginType,
}
