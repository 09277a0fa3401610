//! # starboard
//!
//! Plugin directory service that enriches a static plugin catalog with live
//! GitHub popularity metrics.
//!
//! Star counts are resolved through a TTL cache; misses are fetched from the
//! GitHub API in paced batches of concurrent requests, and every failure is
//! reported per repository instead of failing the request.

pub mod api;
pub mod app;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod details;
pub mod error;
pub mod github;
pub mod stars;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use error::{Result, StarboardError};
