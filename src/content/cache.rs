//! Explicit repository cache.
//!
//! One [`TtlCache`] is built from `[content.cache]` per command and lent to
//! every consumer through [`CachedRepository`]. There is no global instance.

use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::{ContentError, ContentRepository, Entity, SlugWriter};
use crate::config::CacheConfig;
use crate::core::ContentType;

/// Bounded map whose entries expire after `ttl`.
///
/// When full, expired entries are purged first, then the oldest entry is
/// evicted. `max_size == 0` disables storage entirely.
pub struct TtlCache<K, V> {
    max_size: usize,
    ttl: Duration,
    entries: DashMap<K, (Instant, V)>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            max_size,
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_size, config.ttl())
    }

    /// Fresh value for `key`. Expired entries are dropped on access.
    pub fn get(&self, key: &K) -> Option<V> {
        let value = {
            let entry = self.entries.get(key)?;
            let (at, value) = entry.value();
            (at.elapsed() < self.ttl).then(|| value.clone())
        };
        if value.is_none() {
            self.entries.remove(key);
        }
        value
    }

    pub fn set(&self, key: K, value: V) {
        if self.max_size == 0 {
            return;
        }
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_size {
            self.make_room();
        }
        self.entries.insert(key, (Instant::now(), value));
    }

    /// Cached value or the result of `load`, which is stored on success.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: K,
        load: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = load()?;
        self.set(key, value.clone());
        Ok(value)
    }

    pub fn invalidate(&self, key: &K) {
        self.entries.remove(key);
    }

    #[cfg(test)]
    pub fn clear(&self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn make_room(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, (at, _)| at.elapsed() < ttl);
        if self.entries.len() < self.max_size {
            return;
        }
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().0)
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

/// Entity lists per content type.
pub type EntityCache = TtlCache<ContentType, Arc<Vec<Entity>>>;

/// A repository reading through a borrowed [`EntityCache`].
pub struct CachedRepository<'a, R> {
    inner: R,
    cache: &'a EntityCache,
}

impl<'a, R> CachedRepository<'a, R> {
    pub const fn new(inner: R, cache: &'a EntityCache) -> Self {
        Self { inner, cache }
    }
}

impl<R: ContentRepository> ContentRepository for CachedRepository<'_, R> {
    fn list_entities(&self, content_type: ContentType) -> Result<Vec<Entity>, ContentError> {
        let entities = self.cache.get_or_try_insert_with(content_type, || {
            self.inner.list_entities(content_type).map(Arc::new)
        })?;
        Ok(entities.as_ref().clone())
    }
}

impl<R: SlugWriter> SlugWriter for CachedRepository<'_, R> {
    fn write_slugs(
        &self,
        content_type: ContentType,
        updates: &[(String, String)],
    ) -> Result<usize, ContentError> {
        let result = self.inner.write_slugs(content_type, updates);
        self.cache.invalidate(&content_type);
        result
    }
}
