//! URL path type for request targets.
//!
//! - Internal representation: Always decoded (human-readable)
//! - Browser boundary: normalize and decode on input

use std::sync::{Arc, OnceLock};

use percent_encoding::percent_decode_str;

/// Decoded URL path (internal representation)
///
/// Invariants:
/// - Always decoded when the bytes are valid UTF-8
/// - Always starts with `/`
/// - No `.`/`..` segments from the request itself (an encoded separator
///   may still decode into one, callers touching the filesystem check)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UrlPath(Arc<str>);

impl UrlPath {
    /// Create from a browser request target: resolve dot segments, strip
    /// query string and fragment, then decode. Trailing slash is kept as sent.
    pub fn from_browser(target: &str) -> Self {
        static BASE: OnceLock<Option<url::Url>> = OnceLock::new();
        let base = BASE.get_or_init(|| url::Url::parse("http://localhost").ok());

        let path = match base.as_ref().and_then(|b| b.join(target.trim()).ok()) {
            Some(parsed) => parsed.path().to_string(),
            None => target.split(['?', '#']).next().unwrap_or(target).to_string(),
        };

        // Invalid UTF-8 stays percent-encoded
        let decoded = percent_decode_str(&path)
            .decode_utf8()
            .ok()
            .map(|s| s.into_owned());
        let decoded = decoded.unwrap_or(path);

        if decoded.starts_with('/') {
            Self(Arc::from(decoded))
        } else {
            Self(Arc::from(format!("/{decoded}")))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty decoded segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl std::fmt::Display for UrlPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UrlPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_browser_chinese() {
        let url = UrlPath::from_browser("/zh-CN/brands/%E7%A7%91%E9%94%90/");
        assert_eq!(url.as_str(), "/zh-CN/brands/科锐/");
    }

    #[test]
    fn test_from_browser_strips_query_keeps_slash_state() {
        assert_eq!(UrlPath::from_browser("/en/brands?x=1").as_str(), "/en/brands");
        assert_eq!(UrlPath::from_browser("/en/brands/#top").as_str(), "/en/brands/");
        assert_eq!(UrlPath::from_browser("").as_str(), "/");
    }

    #[test]
    fn test_from_browser_resolves_dot_segments() {
        assert_eq!(UrlPath::from_browser("/../secret.txt").as_str(), "/secret.txt");
        assert_eq!(UrlPath::from_browser("/en/./a/../b/").as_str(), "/en/b/");
        assert_eq!(UrlPath::from_browser("/%2e%2e/secret.txt").as_str(), "/secret.txt");
    }

    #[test]
    fn test_from_browser_encoded_separator_decodes() {
        let url = UrlPath::from_browser("/en%2F..%2Fx");
        assert_eq!(url.segments().collect::<Vec<_>>(), ["en", "..", "x"]);
    }

    #[test]
    fn test_from_browser_invalid_utf8() {
        let url = UrlPath::from_browser("/en/%FF/");
        assert_eq!(url.as_str(), "/en/%FF/");
    }

    #[test]
    fn test_segments() {
        let url = UrlPath::from_browser("/en/brands/cree/");
        assert_eq!(url.segments().collect::<Vec<_>>(), ["en", "brands", "cree"]);
    }
}
