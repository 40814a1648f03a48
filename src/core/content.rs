//! Content keys and the canonical routes derived from them.
//!
//! ```text
//! brand     /{locale}/brands/{brand}/
//! product   /{locale}/brands/{brand}/products/{id}/
//! solution  /{locale}/brands/{brand}/solutions/{id}/
//! support   /{locale}/brands/{brand}/support/{id}/
//! article   /{locale}/articles/{id}/
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::slug::{clean_slug, encode_segments};

/// Kind of CMS entity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Brand,
    Product,
    Solution,
    Article,
    Support,
}

impl ContentType {
    pub const ALL: [Self; 5] = [
        Self::Brand,
        Self::Product,
        Self::Solution,
        Self::Article,
        Self::Support,
    ];

    /// Types that live under `/brands/{brand}/{section}/`.
    pub const BRAND_SECTIONS: [Self; 3] = [Self::Product, Self::Solution, Self::Support];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Product => "product",
            Self::Solution => "solution",
            Self::Article => "article",
            Self::Support => "support",
        }
    }

    /// URL path segment naming the collection.
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Brand => "brands",
            Self::Product => "products",
            Self::Solution => "solutions",
            Self::Article => "articles",
            Self::Support => "support",
        }
    }

    /// Parse a collection segment (`products` -> `Product`).
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.segment() == segment)
    }

    /// Whether items of this type are scoped by a brand.
    #[inline]
    pub const fn is_brand_scoped(self) -> bool {
        matches!(self, Self::Product | Self::Solution | Self::Support)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one logical page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentKey {
    pub locale: String,
    pub content_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_slug: Option<String>,
    pub item_id: String,
}

impl ContentKey {
    pub fn new(
        locale: impl Into<String>,
        content_type: ContentType,
        brand_slug: Option<&str>,
        item_id: impl Into<String>,
    ) -> Self {
        Self {
            locale: locale.into(),
            content_type,
            brand_slug: brand_slug.map(str::to_string),
            item_id: item_id.into(),
        }
    }

    /// Derive the canonical route, `None` when the key is not routable.
    ///
    /// Every slug segment goes through `clean_slug`; a segment that cleans to
    /// empty or is not a single safe path component makes the key unroutable.
    pub fn canonical_route(&self) -> Option<CanonicalRoute> {
        let locale = safe_segment(self.locale.trim().to_string())?;
        let brand = || {
            self.brand_slug
                .as_deref()
                .map(clean_slug)
                .and_then(safe_segment)
        };
        let item = || safe_segment(clean_slug(&self.item_id));

        let segments = match self.content_type {
            ContentType::Brand => {
                let brand = brand().or_else(item)?;
                vec![locale, "brands".into(), brand]
            }
            ContentType::Article => vec![locale, "articles".into(), item()?],
            section => vec![
                locale,
                "brands".into(),
                brand()?,
                section.segment().into(),
                item()?,
            ],
        };

        Some(CanonicalRoute {
            segments,
            trailing_slash: true,
        })
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.brand_slug {
            Some(brand) => write!(
                f,
                "{}:{}:{}:{}",
                self.locale, self.content_type, brand, self.item_id
            ),
            None => write!(f, "{}:{}:{}", self.locale, self.content_type, self.item_id),
        }
    }
}

/// Keep only segments that map to exactly one directory component.
fn safe_segment(segment: String) -> Option<String> {
    let unsafe_segment = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\']);
    (!unsafe_segment).then_some(segment)
}

/// Normalized URL path of a page. Computed, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalRoute {
    /// Decoded path segments.
    pub segments: Vec<String>,
    /// Always `true` for navigable pages.
    pub trailing_slash: bool,
}

impl CanonicalRoute {
    /// Encoded URL (`/en/brands/cree/`).
    pub fn to_url(&self) -> String {
        let url = encode_segments(&self.segments);
        if self.trailing_slash || url == "/" {
            url
        } else {
            url.trim_end_matches('/').to_string()
        }
    }

    /// Directory holding the page inside an export tree.
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        let mut dir = root.to_path_buf();
        dir.extend(&self.segments);
        dir
    }

    /// `index.html` of the page inside an export tree.
    pub fn output_file(&self, root: &Path) -> PathBuf {
        self.output_dir(root).join("index.html")
    }

    /// Locale segment.
    pub fn locale(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for CanonicalRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}
