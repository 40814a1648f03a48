//! In-memory repository for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::{ContentError, ContentRepository, Entity, SlugWriter};
use crate::core::ContentType;

#[derive(Default)]
pub struct MemoryRepository {
    entities: Mutex<FxHashMap<ContentType, Vec<Entity>>>,
    loads: AtomicUsize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, entity: Entity) -> Self {
        self.entities
            .lock()
            .entry(entity.content_type())
            .or_default()
            .push(entity);
        self
    }

    /// Number of `list_entities` calls served.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ContentRepository for MemoryRepository {
    fn list_entities(&self, content_type: ContentType) -> Result<Vec<Entity>, ContentError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .entities
            .lock()
            .get(&content_type)
            .cloned()
            .unwrap_or_default())
    }
}

impl SlugWriter for MemoryRepository {
    fn write_slugs(
        &self,
        content_type: ContentType,
        updates: &[(String, String)],
    ) -> Result<usize, ContentError> {
        let mut entities = self.entities.lock();
        let list = entities.entry(content_type).or_default();
        for (id, slug) in updates {
            let entity = list
                .iter_mut()
                .find(|e| e.id() == id)
                .ok_or_else(|| ContentError::UnknownEntity {
                    content_type,
                    id: id.clone(),
                })?;
            entity.set_slug(slug);
        }
        Ok(updates.len())
    }
}
