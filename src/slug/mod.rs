//! Slug normalization.
//!
//! The single place that knows what a slug may contain:
//!
//! - [`clean_slug`] trims and strips document-extension suffixes, nothing more
//! - [`classify`] reports defects against the *raw* value
//! - [`compose_url`] builds canonical, percent-encoded page URLs
//! - [`SlugPolicy`] is the repair policy, applied only by `repair`
//!
//! Character class: ASCII letters, ASCII digits, `-`, `_` and CJK ideographs.
//! Anything else is flagged (`hasSpecialChars`), never silently removed on read.

mod issue;
mod policy;

pub use issue::IssueTag;
pub use policy::SlugPolicy;

use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use serde::Serialize;

use crate::core::{ContentKey, ContentType};

/// Recognized document/image/archive extension, suffix-anchored.
static EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\.(?:txt|html?|pdf|docx?|xlsx?|pptx?|csv|json|xml|md|rtf|png|jpe?g|gif|webp|svg|bmp|tiff?|ico|avif|zip|rar|7z|tar|gz|tgz)$",
    )
    .unwrap()
});

/// Path segment encode set: everything except RFC 3986 unreserved characters.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Clean a CMS-authored slug.
///
/// Trims whitespace and strips recognized extension suffixes until neither
/// applies, so `clean_slug(clean_slug(x)) == clean_slug(x)`. Case and
/// character class are left alone.
pub fn clean_slug(raw: &str) -> String {
    let mut current = raw.trim();
    while let Some(m) = EXTENSION.find(current) {
        current = current[..m.start()].trim();
    }
    current.to_string()
}

/// Whether `raw` (after trimming) ends in a recognized extension.
#[inline]
pub fn has_extension(raw: &str) -> bool {
    EXTENSION.is_match(raw.trim())
}

/// Classify defects of a raw slug. `None` means the field is absent.
///
/// Returned tags are ordered by [`IssueTag`] declaration order.
pub fn classify(raw: Option<&str>) -> Vec<IssueTag> {
    let Some(raw) = raw else {
        return vec![IssueTag::Missing];
    };
    if raw.trim().is_empty() {
        return vec![IssueTag::Empty];
    }

    let mut issues = Vec::new();

    // Nothing left once extensions are stripped: never routable.
    if clean_slug(raw).is_empty() {
        issues.push(IssueTag::Empty);
    }

    if has_extension(raw) {
        issues.push(IssueTag::HasExtension);
    }

    // The extension dot is already reported above.
    let body = match EXTENSION.find(raw.trim()) {
        Some(m) => &raw.trim()[..m.start()],
        None => raw,
    };
    if body
        .chars()
        .any(|c| !c.is_whitespace() && !is_allowed_char(c))
    {
        issues.push(IssueTag::HasSpecialChars);
    }

    if raw.chars().any(char::is_whitespace) {
        issues.push(IssueTag::HasWhitespace);
    }

    if raw.chars().any(char::is_uppercase) {
        issues.push(IssueTag::HasUpperCase);
    }

    issues
}

/// Whether `c` belongs to the slug character class.
#[inline]
pub fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || is_cjk_ideograph(c)
}

/// CJK unified ideographs (incl. extension A/B) and compatibility ideographs.
#[inline]
pub fn is_cjk_ideograph(c: char) -> bool {
    matches!(c,
        '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2A6DF}')
}

/// A slug as authored plus everything derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlugRecord {
    /// Value as stored in the CMS (`None` when the field is absent).
    pub raw: Option<String>,
    /// `clean_slug(raw)`, empty when the entity is not routable.
    pub cleaned: String,
    /// Defects of `raw`.
    pub issues: Vec<IssueTag>,
}

impl SlugRecord {
    /// Derive the record for a raw value. Re-derived on every read.
    pub fn derive(raw: Option<&str>) -> Self {
        Self {
            raw: raw.map(str::to_string),
            cleaned: raw.map(clean_slug).unwrap_or_default(),
            issues: classify(raw),
        }
    }

    /// Whether the cleaned slug can form a URL segment.
    #[inline]
    pub fn is_routable(&self) -> bool {
        !self.cleaned.is_empty()
    }
}

/// Percent-encode a single path segment.
#[inline]
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Join segments into a page URL: leading slash, each segment encoded
/// independently, always a trailing slash.
pub fn encode_segments<S: AsRef<str>>(segments: &[S]) -> String {
    let mut url = String::from("/");
    for segment in segments {
        url.push_str(&encode_segment(segment.as_ref()));
        url.push('/');
    }
    url
}

/// Compose the canonical URL of a page, the link form the UI renders.
///
/// Same route as [`ContentKey::canonical_route`], so every composed link
/// names the file the synthesizer writes. Brand pages take the brand slug
/// (or `item_slug` when `brand_slug` is `None`); articles ignore the brand.
/// Returns `None` when a required segment cleans to empty: the entity is not
/// routable and no URL with an empty segment is ever produced.
pub fn compose_url(
    locale: &str,
    content_type: ContentType,
    brand_slug: Option<&str>,
    item_slug: &str,
) -> Option<String> {
    let brand_slug = brand_slug.filter(|_| content_type != ContentType::Article);
    ContentKey::new(locale, content_type, brand_slug, item_slug)
        .canonical_route()
        .map(|route| route.to_url())
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    fn decode_segments(url: &str) -> Vec<String> {
        url.split('/')
            .filter(|s| !s.is_empty())
            .map(|s| percent_decode_str(s).decode_utf8().unwrap().into_owned())
            .collect()
    }

    #[test]
    fn test_clean_slug_strips_extension() {
        assert_eq!(clean_slug("intel.txt"), "intel");
        assert_eq!(clean_slug("cree.PDF"), "cree");
        assert_eq!(clean_slug("catalog.Docx"), "catalog");
    }

    #[test]
    fn test_clean_slug_trims() {
        assert_eq!(clean_slug("  intel "), "intel");
        assert_eq!(clean_slug("intel .html "), "intel");
    }

    #[test]
    fn test_clean_slug_keeps_case_and_inner_chars() {
        assert_eq!(clean_slug("Intel Corp"), "Intel Corp");
        assert_eq!(clean_slug("a&b"), "a&b");
        assert_eq!(clean_slug("v1.2"), "v1.2");
    }

    #[test]
    fn test_clean_slug_extension_only_in_suffix() {
        assert_eq!(clean_slug("pdf-guide"), "pdf-guide");
        assert_eq!(clean_slug("txt"), "txt");
        assert_eq!(clean_slug(".txt"), "");
    }

    #[test]
    fn test_clean_slug_idempotent() {
        for input in [
            "intel.txt",
            "a.txt.pdf",
            "x .png .zip",
            "  Intel Corp  ",
            "",
            "   ",
            ".txt",
            "中文.html",
            "cree.PDF ",
            "a.b.c",
            "tar.gz.tgz",
        ] {
            let once = clean_slug(input);
            assert_eq!(clean_slug(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_classify_clean() {
        assert!(classify(Some("cree")).is_empty());
        assert!(classify(Some("cree-led_2024")).is_empty());
        assert!(classify(Some("科锐")).is_empty());
    }

    #[test]
    fn test_classify_whitespace_and_case() {
        let issues = classify(Some("Intel Corp"));
        assert!(issues.contains(&IssueTag::HasWhitespace));
        assert!(issues.contains(&IssueTag::HasUpperCase));
        assert!(!issues.contains(&IssueTag::HasSpecialChars));
    }

    #[test]
    fn test_classify_missing_and_empty() {
        assert_eq!(classify(None), vec![IssueTag::Missing]);
        assert_eq!(classify(Some("")), vec![IssueTag::Empty]);
        assert_eq!(classify(Some("   ")), vec![IssueTag::Empty]);
    }

    #[test]
    fn test_classify_extension_only_is_empty() {
        assert_eq!(
            classify(Some(".pdf")),
            vec![IssueTag::Empty, IssueTag::HasExtension]
        );
        assert_eq!(
            classify(Some(".txt.PDF ")),
            vec![
                IssueTag::Empty,
                IssueTag::HasExtension,
                IssueTag::HasWhitespace,
                IssueTag::HasUpperCase
            ]
        );
        assert!(!SlugRecord::derive(Some(".pdf")).is_routable());
    }

    #[test]
    fn test_classify_extension_not_double_counted() {
        assert_eq!(classify(Some("intel.txt")), vec![IssueTag::HasExtension]);
    }

    #[test]
    fn test_classify_special_chars() {
        assert_eq!(classify(Some("a&b")), vec![IssueTag::HasSpecialChars]);
        assert_eq!(classify(Some("café")), vec![IssueTag::HasSpecialChars]);
        assert_eq!(classify(Some("v1.2")), vec![IssueTag::HasSpecialChars]);
    }

    #[test]
    fn test_slug_record_derive() {
        let record = SlugRecord::derive(Some("intel "));
        assert_eq!(record.cleaned, "intel");
        assert_eq!(record.issues, vec![IssueTag::HasWhitespace]);
        assert!(record.is_routable());

        let missing = SlugRecord::derive(None);
        assert_eq!(missing.cleaned, "");
        assert!(!missing.is_routable());
    }

    #[test]
    fn test_compose_url() {
        assert_eq!(
            compose_url("en", ContentType::Product, Some("cree"), "xlamp").as_deref(),
            Some("/en/brands/cree/products/xlamp/")
        );
        assert_eq!(
            compose_url("en", ContentType::Brand, Some("cree"), "").as_deref(),
            Some("/en/brands/cree/")
        );
        assert_eq!(
            compose_url("zh-CN", ContentType::Support, Some("科锐"), "a b").as_deref(),
            Some("/zh-CN/brands/%E7%A7%91%E9%94%90/support/a%20b/")
        );
        assert_eq!(
            compose_url("en", ContentType::Article, Some("cree"), "launch").as_deref(),
            Some("/en/articles/launch/")
        );
    }

    #[test]
    fn test_compose_url_matches_synthesized_files() {
        let root = std::path::Path::new("out");
        for ty in ContentType::ALL {
            let key = ContentKey::new("zh-CN", ty, Some("cree"), "55555");
            let route = key.canonical_route().unwrap();
            let url = compose_url("zh-CN", ty, Some("cree"), "55555").unwrap();
            assert_eq!(url, route.to_url(), "{ty}");

            let file = url
                .trim_matches('/')
                .split('/')
                .fold(root.to_path_buf(), |p, s| p.join(s))
                .join("index.html");
            assert_eq!(file, route.output_file(root), "{ty}");
        }
    }

    #[test]
    fn test_compose_url_not_routable() {
        assert_eq!(compose_url("en", ContentType::Product, Some("  "), "x"), None);
        assert_eq!(compose_url("en", ContentType::Product, Some(".pdf"), "x"), None);
        assert_eq!(compose_url("en", ContentType::Product, Some("cree"), ".pdf"), None);
        assert_eq!(compose_url("en", ContentType::Solution, None, "x"), None);
        assert_eq!(compose_url("", ContentType::Article, None, "x"), None);
    }

    #[test]
    fn test_compose_url_encodes_per_segment() {
        assert_eq!(
            compose_url("en", ContentType::Article, None, "x?y#z").as_deref(),
            Some("/en/articles/x%3Fy%23z/")
        );
    }

    #[test]
    fn test_compose_url_round_trip() {
        for (locale, ty, brand, item) in [
            ("en", ContentType::Product, "cree", "55555"),
            ("zh-CN", ContentType::Solution, "科锐", "a b"),
            ("en", ContentType::Support, "cree", "x?y#z"),
            ("en", ContentType::Product, "100%", "~tilde"),
        ] {
            let url = compose_url(locale, ty, Some(brand), item).unwrap();
            let segments = decode_segments(&url);
            assert_eq!(encode_segments(&segments), url, "unstable for {url}");
        }
    }
}
