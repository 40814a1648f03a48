//! `[content]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [content]
//! dir = "content"     # Directory holding brands.json, products.json, ...
//!
//! [content.cache]
//! max_size = 64       # Entries kept per process
//! ttl = 300           # Seconds before an entry is re-read
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Content export directory (relative to project root).
    pub dir: PathBuf,

    /// Repository read cache.
    pub cache: CacheConfig,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: "content".into(),
            cache: CacheConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached entries. `0` disables caching.
    pub max_size: usize,

    /// Entry lifetime in seconds.
    pub ttl: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 64,
            ttl: 300,
        }
    }
}

impl CacheConfig {
    const TTL: FieldPath = FieldPath::new("content.cache.ttl");

    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl)
    }
}

impl ContentConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.cache.max_size > 0 && self.cache.ttl == 0 {
            diag.error_with_hint(
                CacheConfig::TTL,
                "ttl of 0 expires every entry immediately",
                "set content.cache.max_size = 0 to disable the cache instead",
            );
        }
    }
}
