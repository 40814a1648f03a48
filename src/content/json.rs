//! Repository over exported JSON documents.
//!
//! ```text
//! content/
//! ├── brands.json      [{ "_id": "...", "slug": { "current": "..." } }, ...]
//! ├── products.json
//! ├── solutions.json
//! ├── articles.json
//! └── support.json
//! ```
//!
//! A missing file means the type has no entities.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde_json::Value;

use super::{ContentError, ContentRepository, Entity, SlugWriter, entity::RawDocument};
use crate::core::ContentType;
use crate::debug;

#[derive(Debug, Clone)]
pub struct JsonRepository {
    dir: PathBuf,
}

impl JsonRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Export file for a content type (`products.json`).
    pub fn path_for(&self, content_type: ContentType) -> PathBuf {
        self.dir.join(format!("{}.json", content_type.segment()))
    }

    /// Raw file contents, `None` when the export does not exist.
    fn read(path: &Path) -> Result<Option<String>, ContentError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ContentError::Io(path.to_path_buf(), e)),
        }
    }
}

impl ContentRepository for JsonRepository {
    fn list_entities(&self, content_type: ContentType) -> Result<Vec<Entity>, ContentError> {
        let path = self.path_for(content_type);
        let Some(content) = Self::read(&path)? else {
            debug!("content"; "{} not found, no {} entities", path.display(), content_type);
            return Ok(Vec::new());
        };

        let docs: Vec<RawDocument> =
            serde_json::from_str(&content).map_err(|e| ContentError::Json(path.clone(), e))?;

        docs.into_iter()
            .enumerate()
            .map(|(index, doc)| {
                Entity::from_document(content_type, doc).map_err(|message| ContentError::Invalid {
                    path: path.clone(),
                    index,
                    message,
                })
            })
            .collect()
    }
}

impl SlugWriter for JsonRepository {
    fn write_slugs(
        &self,
        content_type: ContentType,
        updates: &[(String, String)],
    ) -> Result<usize, ContentError> {
        if updates.is_empty() {
            return Ok(0);
        }

        let path = self.path_for(content_type);
        let content = Self::read(&path)?.ok_or_else(|| ContentError::UnknownEntity {
            content_type,
            id: updates[0].0.clone(),
        })?;
        let mut docs: Vec<Value> =
            serde_json::from_str(&content).map_err(|e| ContentError::Json(path.clone(), e))?;

        // First document wins when an export repeats an id
        let positions: FxHashMap<String, usize> = docs
            .iter()
            .enumerate()
            .rev()
            .filter_map(|(i, doc)| document_id(doc).map(|id| (id.to_string(), i)))
            .collect();

        let mut changed = 0;
        for (id, slug) in updates {
            let &position = positions.get(id).ok_or_else(|| ContentError::UnknownEntity {
                content_type,
                id: id.clone(),
            })?;
            set_slug(&mut docs[position], slug);
            changed += 1;
        }

        let mut output =
            serde_json::to_string_pretty(&docs).map_err(|e| ContentError::Json(path.clone(), e))?;
        output.push('\n');
        fs::write(&path, output).map_err(|e| ContentError::Io(path.clone(), e))?;
        Ok(changed)
    }
}

fn document_id(doc: &Value) -> Option<&str> {
    doc.get("_id")
        .or_else(|| doc.get("id"))
        .and_then(Value::as_str)
        .map(str::trim)
}

/// Keep the document's slug shape: objects get `current`, anything else
/// becomes a plain string.
fn set_slug(doc: &mut Value, slug: &str) {
    let Some(obj) = doc.as_object_mut() else {
        return;
    };
    match obj.get_mut("slug") {
        Some(Value::Object(slug_obj)) => {
            slug_obj.insert("current".into(), Value::String(slug.into()));
        }
        _ => {
            obj.insert("slug".into(), Value::String(slug.into()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo_with(files: &[(&str, &str)]) -> (TempDir, JsonRepository) {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let repo = JsonRepository::new(dir.path());
        (dir, repo)
    }

    #[test]
    fn test_missing_export_is_empty() {
        let (_dir, repo) = repo_with(&[]);
        assert!(repo.list_entities(ContentType::Article).unwrap().is_empty());
        assert!(repo.known_brand_slugs().unwrap().is_empty());
    }

    #[test]
    fn test_list_entities() {
        let (_dir, repo) = repo_with(&[(
            "products.json",
            r#"[{"_id":"p1","slug":{"current":"55555"}},{"id":"p2","slug":"a b"}]"#,
        )]);
        let items = repo.list_entities(ContentType::Product).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].raw_slug(), Some("a b"));
    }

    #[test]
    fn test_invalid_document_reports_index() {
        let (_dir, repo) = repo_with(&[("brands.json", r#"[{"_id":"b1"},{"slug":"x"}]"#)]);
        let err = repo.list_entities(ContentType::Brand).unwrap_err();
        assert!(matches!(err, ContentError::Invalid { index: 1, .. }));
    }

    #[test]
    fn test_malformed_json() {
        let (_dir, repo) = repo_with(&[("support.json", "{not json")]);
        assert!(matches!(
            repo.list_entities(ContentType::Support),
            Err(ContentError::Json(..))
        ));
    }

    #[test]
    fn test_write_slugs_keeps_shape_and_fields() {
        let (dir, repo) = repo_with(&[(
            "products.json",
            r#"[{"_id":"p1","title":"X","slug":{"_type":"slug","current":"A B"}},{"_id":"p2","slug":"c.pdf"}]"#,
        )]);
        let updates = vec![("p1".to_string(), "a-b".to_string()), ("p2".to_string(), "c".to_string())];
        assert_eq!(repo.write_slugs(ContentType::Product, &updates).unwrap(), 2);

        let items = repo.list_entities(ContentType::Product).unwrap();
        assert_eq!(items[0].raw_slug(), Some("a-b"));
        assert_eq!(items[1].raw_slug(), Some("c"));

        let written = fs::read_to_string(dir.path().join("products.json")).unwrap();
        assert!(written.contains("\"_type\": \"slug\""));
        assert!(written.contains("\"title\": \"X\""));
        // preserve_order keeps `_id` first
        assert!(written.trim_start().starts_with("[\n  {\n    \"_id\""));
    }

    #[test]
    fn test_write_slugs_unknown_id() {
        let (_dir, repo) = repo_with(&[("brands.json", r#"[{"_id":"b1","slug":"x"}]"#)]);
        let err = repo
            .write_slugs(ContentType::Brand, &[("nope".into(), "y".into())])
            .unwrap_err();
        assert!(matches!(err, ContentError::UnknownEntity { .. }));
    }
}
