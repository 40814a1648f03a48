//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "Catalog"
//! locales = ["zh-CN", "en"]      # Supported locales, first-class URL prefixes
//! default_locale = "zh-CN"       # Used when negotiation finds nothing
//! locale_cookie = "NEXT_LOCALE"  # Cookie carrying the user's locale choice
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::Locales;

/// Site-wide locale settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Site title (used by the embedded shell page).
    pub title: String,

    /// Supported locale codes, in preference order.
    pub locales: Vec<String>,

    /// Default locale. Must be one of `locales`.
    pub default_locale: String,

    /// Name of the locale hint cookie.
    pub locale_cookie: String,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            title: "Catalog".into(),
            locales: vec!["zh-CN".into(), "en".into()],
            default_locale: "zh-CN".into(),
            locale_cookie: "NEXT_LOCALE".into(),
        }
    }
}

impl SiteSectionConfig {
    const LOCALES: FieldPath = FieldPath::new("site.locales");
    const DEFAULT_LOCALE: FieldPath = FieldPath::new("site.default_locale");
    const LOCALE_COOKIE: FieldPath = FieldPath::new("site.locale_cookie");

    /// Supported locales with their default.
    pub fn locales(&self) -> Locales {
        Locales::new(self.locales.clone(), self.default_locale.clone())
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.locales.is_empty() {
            diag.error(Self::LOCALES, "at least one locale is required");
        }

        let mut seen = Vec::with_capacity(self.locales.len());
        for locale in &self.locales {
            let trimmed = locale.trim();
            if trimmed.is_empty() || trimmed != locale || trimmed.contains(['/', '?', '#', '.']) {
                diag.error_with_hint(
                    Self::LOCALES,
                    format!("`{locale}` is not a valid locale code"),
                    "use a plain language tag such as `en` or `zh-CN`",
                );
            }
            if seen.contains(&locale) {
                diag.error(Self::LOCALES, format!("`{locale}` is listed twice"));
            }
            seen.push(locale);
        }

        if !self.locales.is_empty() && !self.locales.contains(&self.default_locale) {
            diag.error_with_hint(
                Self::DEFAULT_LOCALE,
                format!("`{}` is not one of site.locales", self.default_locale),
                format!("add it to site.locales or pick one of {:?}", self.locales),
            );
        }

        if self.locale_cookie.trim().is_empty() {
            diag.error(Self::LOCALE_COOKIE, "cookie name must not be empty");
        }
    }
}
