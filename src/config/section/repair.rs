//! `[repair]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [repair]
//! lowercase = true                          # Lower-case repaired slugs
//! audit_log = ".catalog/repair-audit.jsonl" # Append-only change log
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::slug::SlugPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    pub lowercase: bool,
    pub audit_log: PathBuf,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            audit_log: ".catalog/repair-audit.jsonl".into(),
        }
    }
}

impl RepairConfig {
    pub const fn policy(&self) -> SlugPolicy {
        SlugPolicy {
            lowercase: self.lowercase,
        }
    }
}
