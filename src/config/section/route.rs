//! `[route]` section configuration.
//!
//! Prefixes the router lets through untouched.
//!
//! # Example
//!
//! ```toml
//! [route]
//! admin_root = "/studio"      # Embedded admin tool (single-page app)
//! back_office = ["/admin"]    # Back-office areas
//! api_prefix = "/api"
//! asset_prefix = "/_next"     # Framework asset directory
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    pub admin_root: String,
    pub back_office: Vec<String>,
    pub api_prefix: String,
    pub asset_prefix: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            admin_root: "/studio".into(),
            back_office: vec!["/admin".into()],
            api_prefix: "/api".into(),
            asset_prefix: "/_next".into(),
        }
    }
}

impl RouteConfig {
    const ADMIN_ROOT: FieldPath = FieldPath::new("route.admin_root");
    const BACK_OFFICE: FieldPath = FieldPath::new("route.back_office");
    const API_PREFIX: FieldPath = FieldPath::new("route.api_prefix");
    const ASSET_PREFIX: FieldPath = FieldPath::new("route.asset_prefix");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let single = [
            (Self::ADMIN_ROOT, &self.admin_root),
            (Self::API_PREFIX, &self.api_prefix),
            (Self::ASSET_PREFIX, &self.asset_prefix),
        ];
        for (field, prefix) in single {
            Self::check_prefix(field, prefix, diag);
        }
        for prefix in &self.back_office {
            Self::check_prefix(Self::BACK_OFFICE, prefix, diag);
        }
    }

    fn check_prefix(field: FieldPath, prefix: &str, diag: &mut ConfigDiagnostics) {
        if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
            diag.error_with_hint(
                field,
                format!("`{prefix}` is not a path prefix"),
                "use a leading slash and no trailing slash, e.g. `/studio`",
            );
        }
    }
}
