//! Route taxonomy inputs: exempt prefixes and supported locales.

use crate::config::SiteConfig;
use crate::core::Locales;

/// Everything the router needs to know about a deployment.
#[derive(Debug, Clone)]
pub struct RouteRules {
    /// Admin tool root, e.g. `/studio`.
    pub admin_root: String,
    /// Back-office prefixes, e.g. `/admin`.
    pub back_office: Vec<String>,
    pub api_prefix: String,
    /// Framework asset prefix, e.g. `/_next`.
    pub asset_prefix: String,
    pub locales: Locales,
}

impl RouteRules {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            admin_root: config.route.admin_root.clone(),
            back_office: config.route.back_office.clone(),
            api_prefix: config.route.api_prefix.clone(),
            asset_prefix: config.route.asset_prefix.clone(),
            locales: config.site.locales(),
        }
    }

    pub(super) fn is_admin_root(&self, path: &str) -> bool {
        path == self.admin_root
    }

    pub(super) fn is_admin_tool(&self, path: &str) -> bool {
        under(path, &self.admin_root) && path != self.admin_root
    }

    pub(super) fn is_back_office(&self, path: &str) -> bool {
        self.back_office.iter().any(|p| under(path, p))
    }

    pub(super) fn is_api(&self, path: &str) -> bool {
        under(path, &self.api_prefix)
    }

    pub(super) fn is_asset(&self, path: &str) -> bool {
        let last = path.rsplit('/').next().unwrap_or_default();
        last.contains('.') || under(path, &self.asset_prefix)
    }
}

impl Default for RouteRules {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

/// `path` equals `prefix` or continues it with a `/`.
#[inline]
pub(super) fn under(path: &str, prefix: &str) -> bool {
    !prefix.is_empty()
        && path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
