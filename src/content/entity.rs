//! Typed CMS entities.
//!
//! Export documents are loosely shaped (`_id` or `id`, slug as a string or a
//! `{ "current": ... }` object, brand as an id or a `{ "_ref": ... }`
//! reference). They are read into [`RawDocument`] and validated into one
//! typed variant per content type; anything else is rejected on read.

use serde::{Deserialize, Serialize};

use crate::core::ContentType;
use crate::slug::SlugRecord;

/// A brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Brand {
    pub id: String,
    pub slug: Option<String>,
    pub locale: Option<String>,
}

/// A product, solution or support entry. Lives under a brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandItem {
    pub id: String,
    pub slug: Option<String>,
    pub locale: Option<String>,
    /// Referenced brand id, when set.
    pub brand: Option<String>,
}

/// An article. Not brand scoped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: String,
    pub slug: Option<String>,
    pub locale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entity {
    Brand(Brand),
    Product(BrandItem),
    Solution(BrandItem),
    Article(Article),
    Support(BrandItem),
}

impl Entity {
    pub const fn content_type(&self) -> ContentType {
        match self {
            Self::Brand(_) => ContentType::Brand,
            Self::Product(_) => ContentType::Product,
            Self::Solution(_) => ContentType::Solution,
            Self::Article(_) => ContentType::Article,
            Self::Support(_) => ContentType::Support,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Brand(b) => &b.id,
            Self::Article(a) => &a.id,
            Self::Product(i) | Self::Solution(i) | Self::Support(i) => &i.id,
        }
    }

    /// Slug exactly as stored, `None` when absent.
    pub fn raw_slug(&self) -> Option<&str> {
        match self {
            Self::Brand(b) => b.slug.as_deref(),
            Self::Article(a) => a.slug.as_deref(),
            Self::Product(i) | Self::Solution(i) | Self::Support(i) => i.slug.as_deref(),
        }
    }

    pub fn locale(&self) -> Option<&str> {
        match self {
            Self::Brand(b) => b.locale.as_deref(),
            Self::Article(a) => a.locale.as_deref(),
            Self::Product(i) | Self::Solution(i) | Self::Support(i) => i.locale.as_deref(),
        }
    }

    /// Brand reference of a brand-scoped item.
    pub fn brand_ref(&self) -> Option<&str> {
        match self {
            Self::Product(i) | Self::Solution(i) | Self::Support(i) => i.brand.as_deref(),
            Self::Brand(_) | Self::Article(_) => None,
        }
    }

    /// Derived slug record (never cached, never persisted).
    pub fn slug_record(&self) -> SlugRecord {
        SlugRecord::derive(self.raw_slug())
    }

    /// Validate a raw export document into the variant for `content_type`.
    pub fn from_document(content_type: ContentType, doc: RawDocument) -> Result<Self, String> {
        let id = doc
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or("missing required `_id`/`id`")?;
        let slug = doc.slug.and_then(RawSlug::into_value);
        let locale = doc.locale.filter(|l| !l.trim().is_empty());

        Ok(match content_type {
            ContentType::Brand => Self::Brand(Brand { id, slug, locale }),
            ContentType::Article => Self::Article(Article { id, slug, locale }),
            section => {
                let item = BrandItem {
                    id,
                    slug,
                    locale,
                    brand: doc.brand.map(RawRef::into_id),
                };
                match section {
                    ContentType::Product => Self::Product(item),
                    ContentType::Solution => Self::Solution(item),
                    _ => Self::Support(item),
                }
            }
        })
    }

    #[cfg(test)]
    pub fn set_slug(&mut self, slug: &str) {
        let slot = match self {
            Self::Brand(b) => &mut b.slug,
            Self::Article(a) => &mut a.slug,
            Self::Product(i) | Self::Solution(i) | Self::Support(i) => &mut i.slug,
        };
        *slot = Some(slug.to_string());
    }

    #[cfg(test)]
    pub fn brand(id: &str, slug: Option<&str>) -> Self {
        Self::Brand(Brand {
            id: id.into(),
            slug: slug.map(Into::into),
            locale: None,
        })
    }

    #[cfg(test)]
    pub fn product(id: &str, slug: Option<&str>, brand: Option<&str>) -> Self {
        Self::Product(BrandItem {
            id: id.into(),
            slug: slug.map(Into::into),
            locale: None,
            brand: brand.map(Into::into),
        })
    }
}

/// One document of an export file, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct RawDocument {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    pub slug: Option<RawSlug>,
    #[serde(alias = "language")]
    pub locale: Option<String>,
    pub brand: Option<RawRef>,
}

/// `"slug"` or `{ "current": "slug" }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawSlug {
    Plain(String),
    Object {
        #[serde(default)]
        current: Option<String>,
    },
}

impl RawSlug {
    fn into_value(self) -> Option<String> {
        match self {
            Self::Plain(s) => Some(s),
            Self::Object { current } => current,
        }
    }
}

/// `"brand-id"` or `{ "_ref": "brand-id" }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawRef {
    Id(String),
    Ref {
        #[serde(rename = "_ref")]
        reference: String,
    },
}

impl RawRef {
    fn into_id(self) -> String {
        match self {
            Self::Id(id) | Self::Ref { reference: id } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(ty: ContentType, json: &str) -> Result<Entity, String> {
        let doc: RawDocument = serde_json::from_str(json).unwrap();
        Entity::from_document(ty, doc)
    }

    #[test]
    fn test_sanity_shape() {
        let e = parse(
            ContentType::Product,
            r#"{"_id":"p1","_type":"product","slug":{"_type":"slug","current":"55555"},"language":"en","brand":{"_ref":"b1"}}"#,
        )
        .unwrap();
        assert_eq!(e.content_type(), ContentType::Product);
        assert_eq!(e.id(), "p1");
        assert_eq!(e.raw_slug(), Some("55555"));
        assert_eq!(e.locale(), Some("en"));
        assert_eq!(e.brand_ref(), Some("b1"));
    }

    #[test]
    fn test_plain_shape() {
        let e = parse(ContentType::Support, r#"{"id":"s1","slug":"faq","brand":"b2"}"#).unwrap();
        assert!(matches!(e, Entity::Support(_)));
        assert_eq!(e.brand_ref(), Some("b2"));
    }

    #[test]
    fn test_missing_slug_kept_as_none() {
        let e = parse(ContentType::Brand, r#"{"_id":"b1","slug":{"current":null}}"#).unwrap();
        assert_eq!(e.raw_slug(), None);
        let e = parse(ContentType::Article, r#"{"_id":"a1","slug":null}"#).unwrap();
        assert_eq!(e.raw_slug(), None);
        assert_eq!(e.brand_ref(), None);
    }

    #[test]
    fn test_id_required() {
        assert!(parse(ContentType::Brand, r#"{"slug":"cree"}"#).is_err());
        assert!(parse(ContentType::Brand, r#"{"_id":"  ","slug":"cree"}"#).is_err());
    }

    #[test]
    fn test_slug_record() {
        let e = Entity::brand("b1", Some(" Cree.pdf"));
        let record = e.slug_record();
        assert_eq!(record.cleaned, "Cree");
        assert!(record.is_routable());
    }
}
