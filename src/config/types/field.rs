//! Type-safe config field path.

use owo_colors::OwoColorize;
use std::fmt;

/// A type-safe wrapper for config field paths.
///
/// Each section declares its paths as associated constants so diagnostics
/// never carry a misspelled key.
///
/// # Example
///
/// ```ignore
/// impl SiteSectionConfig {
///     const DEFAULT_LOCALE: FieldPath = FieldPath::new("site.default_locale");
/// }
///
/// diag.error(SiteSectionConfig::DEFAULT_LOCALE, "not a supported locale");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}
