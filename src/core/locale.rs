//! Supported locales and request-time locale negotiation.
//!
//! Resolution order: cookie hint, then `Accept-Language` (by q-value, exact
//! tag before primary subtag), then the default locale.

/// Locale hints taken from a request. Only hints, never trusted as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleHints<'a> {
    /// Value of the locale cookie.
    pub cookie: Option<&'a str>,
    /// Raw `Accept-Language` header.
    pub accept_language: Option<&'a str>,
}

/// The ordered set of supported locale codes plus the default.
///
/// Invariant: `default` is one of `supported` (checked by config validation,
/// re-established by [`Locales::new`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locales {
    supported: Vec<String>,
    default: String,
}

impl Locales {
    pub fn new(supported: Vec<String>, default: impl Into<String>) -> Self {
        let default = default.into();
        let mut supported = supported;
        if !supported.contains(&default) {
            supported.insert(0, default.clone());
        }
        Self { supported, default }
    }

    pub fn supported(&self) -> &[String] {
        &self.supported
    }

    #[cfg(test)]
    pub fn default_locale(&self) -> &str {
        &self.default
    }

    /// Exact, case-sensitive membership (used for path prefixes).
    #[inline]
    pub fn contains(&self, segment: &str) -> bool {
        self.supported.iter().any(|l| l == segment)
    }

    /// Case-insensitive exact match, returning the canonical spelling.
    pub fn canonical(&self, tag: &str) -> Option<&str> {
        let tag = tag.trim();
        self.supported
            .iter()
            .find(|l| l.eq_ignore_ascii_case(tag))
            .map(String::as_str)
    }

    /// First supported locale sharing the primary subtag (`zh-TW` -> `zh-CN`).
    fn by_primary(&self, tag: &str) -> Option<&str> {
        let primary = primary_subtag(tag);
        self.supported
            .iter()
            .find(|l| primary_subtag(l).eq_ignore_ascii_case(primary))
            .map(String::as_str)
    }

    /// Resolve the locale to serve for a request.
    pub fn negotiate(&self, hints: LocaleHints<'_>) -> &str {
        if let Some(locale) = hints.cookie.and_then(|c| self.canonical(c)) {
            return locale;
        }

        if let Some(header) = hints.accept_language {
            for (tag, _) in parse_accept_language(header) {
                if tag == "*" {
                    return &self.default;
                }
                if let Some(locale) = self.canonical(&tag).or_else(|| self.by_primary(&tag)) {
                    return locale;
                }
            }
        }

        &self.default
    }
}

fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag).trim()
}

/// Parse an `Accept-Language` header into `(tag, q)` pairs, highest q first.
///
/// Entries with `q=0` or an unparsable q are dropped. Ties keep header order.
pub fn parse_accept_language(header: &str) -> Vec<(String, f32)> {
    let mut entries: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim();
            if tag.is_empty() {
                return None;
            }
            let mut q = 1.0_f32;
            for param in pieces {
                if let Some(value) = param.trim().strip_prefix("q=") {
                    q = value.trim().parse().ok()?;
                }
            }
            (q > 0.0 && q <= 1.0).then(|| (tag.to_string(), q))
        })
        .collect();

    // Stable sort keeps header order for equal weights.
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries
}
