// Cache module for star counts.
// Stores upstream lookup outcomes behind a pluggable key-value backend.

pub mod backend;
pub mod paths;
pub mod store;

pub use backend::{CacheBackend, CacheError, FileBackend, MemoryBackend};
pub use paths::{STARS_NAMESPACE, namespace_dir};
pub use store::{CacheEntry, Clock, STARS_TTL, StarCache, SystemClock, cache_key};
