//! HTML escaping for embedded pages.

use std::borrow::Cow;

/// Escape HTML special characters in text content and attribute values.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_borrowed_when_clean() {
        assert!(matches!(escape("Catalog"), Cow::Borrowed("Catalog")));
    }

    #[test]
    fn test_escape_specials() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
