//! Synthesis input (`locales × brands × items`) and the artifact manifest.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::SynthError;
use crate::content::{ContentError, ContentRepository};
use crate::core::{ContentKey, ContentType, Locales};

/// Cross-product input of the synthesizer.
///
/// Sets, so duplicate tuples cannot exist. Only brand-scoped item types
/// (`product`, `solution`, `support`) are synthesized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub locales: BTreeSet<String>,
    pub brands: BTreeSet<String>,
    #[serde(default)]
    pub items: BTreeMap<ContentType, BTreeSet<String>>,
}

impl Manifest {
    /// Load a JSON manifest file.
    pub fn load(path: &Path) -> Result<Self, SynthError> {
        let content = fs::read_to_string(path).map_err(|e| SynthError::ManifestUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| SynthError::ManifestUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Derive the manifest from content: configured locales, known brand
    /// slugs and entity ids of every brand section.
    pub fn from_repository(
        repo: &impl ContentRepository,
        locales: &Locales,
    ) -> Result<Self, ContentError> {
        let mut items = BTreeMap::new();
        for ty in ContentType::BRAND_SECTIONS {
            let ids: BTreeSet<String> = repo
                .list_entities(ty)?
                .iter()
                .map(|e| e.id().to_string())
                .collect();
            items.insert(ty, ids);
        }

        Ok(Self {
            locales: locales.supported().iter().cloned().collect(),
            brands: repo.known_brand_slugs()?.into_iter().collect(),
            items,
        })
    }

    /// Every tuple as a content key, in a stable order
    /// (locale, brand, type, id).
    pub fn keys(&self) -> impl Iterator<Item = ContentKey> + '_ {
        self.locales.iter().flat_map(move |locale| {
            self.brands.iter().flat_map(move |brand| {
                self.section_items().flat_map(move |(ty, ids)| {
                    ids.iter()
                        .map(move |id| ContentKey::new(locale.as_str(), ty, Some(brand.as_str()), id.as_str()))
                })
            })
        })
    }

    /// Keys of one locale.
    pub fn keys_for<'a>(&'a self, locale: &'a str) -> impl Iterator<Item = ContentKey> + 'a {
        self.keys().filter(move |k| k.locale == locale)
    }

    /// Number of tuples.
    pub fn len(&self) -> usize {
        let per_brand: usize = self.section_items().map(|(_, ids)| ids.len()).sum();
        self.locales.len() * self.brands.len() * per_brand
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn section_items(&self) -> impl Iterator<Item = (ContentType, &BTreeSet<String>)> {
        self.items
            .iter()
            .filter(|(ty, _)| ty.is_brand_scoped())
            .map(|(ty, ids)| (*ty, ids))
    }
}

/// Where an artifact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Produced by the framework build, left untouched.
    Build,
    /// Written by the synthesizer.
    Synthesized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactEntry {
    pub content_key: ContentKey,
    /// Path relative to the output root, `/`-separated.
    pub file_path: String,
    pub origin: Origin,
}

/// Serializable record of one synthesis run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactManifest<'a> {
    pub template: String,
    pub template_digest: &'a str,
    pub entries: &'a [ArtifactEntry],
}

impl ArtifactManifest<'_> {
    pub fn write(&self, path: &Path) -> Result<(), SynthError> {
        let io_err = |e| SynthError::Io(path.to_path_buf(), e);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SynthError::Io(path.to_path_buf(), e.into()))?;
        fs::write(path, json + "\n").map_err(io_err)
    }
}

/// `/`-separated display of `path` below `root`.
pub(super) fn relative_url_path(path: &Path, root: &Path) -> String {
    let rel: PathBuf = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Entity, MemoryRepository};

    fn manifest(json: &str) -> Manifest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_duplicates_removed_by_construction() {
        let m = manifest(
            r#"{"locales":["en","en","zh-CN"],"brands":["cree","cree"],"items":{"product":["1","1","2"]}}"#,
        );
        assert_eq!(m.len(), 4);
        assert_eq!(m.keys().count(), 4);
    }

    #[test]
    fn test_non_section_items_ignored() {
        let m = manifest(
            r#"{"locales":["en"],"brands":["cree"],"items":{"article":["a"],"brand":["b"],"support":["faq"]}}"#,
        );
        let keys: Vec<_> = m.keys().collect();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].content_type, ContentType::Support);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_keys_order_and_filter() {
        let m = manifest(r#"{"locales":["zh-CN","en"],"brands":["cree"],"items":{"product":["55555"]}}"#);
        let locales: Vec<_> = m.keys().map(|k| k.locale).collect();
        assert_eq!(locales, ["en", "zh-CN"]);
        assert_eq!(m.keys_for("zh-CN").count(), 1);
        assert_eq!(m.keys_for("fr").count(), 0);
    }

    #[test]
    fn test_missing_manifest_is_configuration_error() {
        let err = Manifest::load(Path::new("/nonexistent/manifest.json")).unwrap_err();
        assert!(matches!(err, SynthError::ManifestUnavailable { .. }));
    }

    #[test]
    fn test_from_repository() {
        let repo = MemoryRepository::new()
            .with(Entity::brand("b1", Some("cree")))
            .with(Entity::product("p1", Some("x"), Some("b1")))
            .with(Entity::product("p1", Some("x"), Some("b1")));
        let locales = Locales::new(vec!["zh-CN".into(), "en".into()], "zh-CN");
        let m = Manifest::from_repository(&repo, &locales).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.items[&ContentType::Product].len(), 1);
        assert!(m.items[&ContentType::Solution].is_empty());
    }

    #[test]
    fn test_relative_url_path() {
        let root = Path::new("/site/out");
        let file = root.join("en").join("brands").join("index.html");
        assert_eq!(relative_url_path(&file, root), "en/brands/index.html");
    }
}
