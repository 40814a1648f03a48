//! The canonical slug repair policy.
//!
//! Applied only by the audited `repair` command, never on read.

use super::{clean_slug, is_allowed_char};

/// How a defective slug is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlugPolicy {
    /// Lower-case the repaired slug.
    pub lowercase: bool,
}

impl Default for SlugPolicy {
    fn default() -> Self {
        Self { lowercase: true }
    }
}

impl SlugPolicy {
    /// Repair a raw slug.
    ///
    /// Returns `None` when nothing usable remains: a missing or empty slug is
    /// never invented from other fields.
    pub fn repair(&self, raw: Option<&str>) -> Option<String> {
        let cleaned = clean_slug(raw?);

        let mut out = String::with_capacity(cleaned.len());
        for c in cleaned.chars() {
            if c.is_whitespace() || c == '-' {
                if !out.ends_with('-') {
                    out.push('-');
                }
            } else if is_allowed_char(c) {
                if self.lowercase {
                    out.extend(c.to_lowercase());
                } else {
                    out.push(c);
                }
            }
        }

        let trimmed = out.trim_matches(['-', '_']);
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}
