//! Common utilities shared across CLI commands.

use std::io::{self, Write};

use anyhow::Result;
use crossbeam::queue::SegQueue;

use crate::config::SiteConfig;
use crate::content::{CachedRepository, EntityCache, JsonRepository};

/// Lock-free parallel result collector using `SegQueue`
pub struct ParallelCollector<T> {
    queue: SegQueue<T>,
}

impl<T> ParallelCollector<T> {
    /// Create a new empty collector.
    #[inline]
    pub fn new() -> Self {
        Self {
            queue: SegQueue::new(),
        }
    }

    /// Push an item (lock-free, wait-free).
    #[inline]
    pub fn push(&self, item: T) {
        self.queue.push(item);
    }

    /// Drain all items with pre-allocated capacity.
    pub fn drain_with_capacity(self, capacity: usize) -> Vec<T> {
        let mut results = Vec::with_capacity(capacity);
        while let Some(item) = self.queue.pop() {
            results.push(item);
        }
        results
    }
}

impl<T> Default for ParallelCollector<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The repository cache of one command run, sized by `[content.cache]`.
pub fn entity_cache(config: &SiteConfig) -> EntityCache {
    EntityCache::from_config(&config.content.cache)
}

/// JSON export repository reading through `cache`.
pub fn repository<'a>(
    config: &SiteConfig,
    cache: &'a EntityCache,
) -> CachedRepository<'a, JsonRepository> {
    CachedRepository::new(JsonRepository::new(config.content_dir()), cache)
}

/// Ask a yes/no question on stderr. Default is no.
pub fn prompt_confirm(question: &str) -> Result<bool> {
    eprint!("{} [y/N] ", question);
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}
