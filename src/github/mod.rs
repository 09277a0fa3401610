// GitHub API module.
// Provides the client, reference parsing, and types for the GitHub REST API.

pub mod client;
pub mod endpoints;
pub mod readme;
pub mod reference;
pub mod source;
pub mod types;

pub use client::{ClientConfig, DETAIL_TIMEOUT, GitHubClient, STARS_TIMEOUT};
pub use reference::RepositoryRef;
pub use source::RepoSource;
pub use types::*;
