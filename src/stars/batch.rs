// Batch configuration for upstream star lookups.
// Controls how many lookups run concurrently and the pause between batches.

use std::time::Duration;

/// Default number of lookups in flight at once.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default pause between consecutive batches.
pub const DEFAULT_PACING: Duration = Duration::from_millis(100);

/// Configuration for batched star lookups.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// The number of lookups dispatched concurrently in each batch.
    ///
    /// This also bounds the number of requests in flight against the upstream API.
    pub batch_size: usize,
    /// Delay inserted after every batch except the last.
    pub pacing: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            pacing: DEFAULT_PACING,
        }
    }
}

impl BatchConfig {
    /// Split `items` into batches. A zero batch size is treated as one.
    pub fn batches<'a, T>(&self, items: &'a [T]) -> std::slice::Chunks<'a, T> {
        items.chunks(self.batch_size.max(1))
    }
}
