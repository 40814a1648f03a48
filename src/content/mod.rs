//! Content repository boundary.
//!
//! The CMS is an external collaborator. Everything the engine needs from it
//! goes through [`ContentRepository`] (read-only) and, for the audited repair
//! command only, [`SlugWriter`].
//!
//! | Module   | Purpose                                           |
//! |----------|---------------------------------------------------|
//! | `entity` | One typed variant per content type                |
//! | `json`   | Repository over exported JSON documents           |
//! | `cache`  | Explicit TTL cache and the caching repository     |
//! | `memory` | In-memory repository for tests                    |

mod cache;
mod entity;
mod json;
#[cfg(test)]
mod memory;

pub use cache::{CachedRepository, EntityCache};
pub use entity::Entity;
pub use json::JsonRepository;
#[cfg(test)]
pub use memory::MemoryRepository;

use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::ContentType;
use crate::log;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("`{0}` is not a valid content export")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("`{path}` document #{index}: {message}")]
    Invalid {
        path: PathBuf,
        index: usize,
        message: String,
    },

    #[error("no {content_type} with id `{id}`")]
    UnknownEntity {
        content_type: ContentType,
        id: String,
    },
}

/// Read access to CMS content.
pub trait ContentRepository: Send + Sync {
    /// All entities of one type, in repository order.
    fn list_entities(&self, content_type: ContentType) -> Result<Vec<Entity>, ContentError>;

    /// Cleaned slugs of every brand, sorted and deduplicated.
    ///
    /// Brands whose slug cleans to empty are skipped with a warning.
    fn known_brand_slugs(&self) -> Result<Vec<String>, ContentError> {
        let mut slugs = BTreeSet::new();
        for entity in self.list_entities(ContentType::Brand)? {
            let record = entity.slug_record();
            if record.is_routable() {
                slugs.insert(record.cleaned);
            } else {
                log!("degraded"; "brand `{}` has no usable slug, skipped", entity.id());
            }
        }
        Ok(slugs.into_iter().collect())
    }
}

impl<R: ContentRepository + ?Sized> ContentRepository for &R {
    fn list_entities(&self, content_type: ContentType) -> Result<Vec<Entity>, ContentError> {
        (**self).list_entities(content_type)
    }

    fn known_brand_slugs(&self) -> Result<Vec<String>, ContentError> {
        (**self).known_brand_slugs()
    }
}

/// Write access used by the audited slug repair.
pub trait SlugWriter {
    /// Replace the slug of each `(id, slug)` pair. Returns the number of
    /// documents changed; an unknown id fails the whole batch.
    fn write_slugs(
        &self,
        content_type: ContentType,
        updates: &[(String, String)],
    ) -> Result<usize, ContentError>;
}

impl<W: SlugWriter + ?Sized> SlugWriter for &W {
    fn write_slugs(
        &self,
        content_type: ContentType,
        updates: &[(String, String)],
    ) -> Result<usize, ContentError> {
        (**self).write_slugs(content_type, updates)
    }
}
