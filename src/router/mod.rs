//! Request-time locale and route normalization.
//!
//! [`route`] classifies a request path against the fixed taxonomy (first
//! match wins) and [`EdgeRouter`] adds locale-prefix enforcement on top.
//!
//! | # | Match                                              | Action            |
//! |---|----------------------------------------------------|-------------------|
//! | 1 | exact admin root (`/studio`)                       | redirect, add `/` |
//! | 2 | under the admin root                               | allow             |
//! | 3 | under a back-office prefix                         | allow             |
//! | 4 | under the API prefix                               | allow             |
//! | 5 | dot in the final segment, or under the asset prefix| allow             |
//! | 6 | `[/{locale}]/brands/{slug}/{section}` without `/`  | redirect, add `/` |
//! | 7 | under `/brands/`                                   | allow             |
//! | 8 | anything else                                      | allow             |
//!
//! Both entry points are total (never panic) and redirect targets are fixed
//! points: routing a target again always yields `allow`.

mod rules;

pub use rules::RouteRules;

use std::fmt;

use serde::Serialize;

use crate::core::{ContentType, LocaleHints};

/// What the edge should do with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteAction {
    Allow,
    Redirect,
    Rewrite,
}

/// Which taxonomy entry produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteRule {
    AdminRoot,
    AdminTool,
    BackOffice,
    Api,
    Asset,
    BrandSection,
    Brands,
    Locale,
    Fallthrough,
}

impl RouteRule {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdminRoot => "admin-root",
            Self::AdminTool => "admin-tool",
            Self::BackOffice => "back-office",
            Self::Api => "api",
            Self::Asset => "asset",
            Self::BrandSection => "brand-section",
            Self::Brands => "brands",
            Self::Locale => "locale",
            Self::Fallthrough => "fallthrough",
        }
    }

    /// Rules 1-5: never locale-prefixed.
    pub const fn is_exempt(self) -> bool {
        matches!(
            self,
            Self::AdminRoot | Self::AdminTool | Self::BackOffice | Self::Api | Self::Asset
        )
    }
}

impl fmt::Display for RouteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDecision {
    pub action: RouteAction,
    /// Redirect location or rewrite target.
    pub target: Option<String>,
    pub rule: RouteRule,
}

impl RouteDecision {
    const fn allow(rule: RouteRule) -> Self {
        Self {
            action: RouteAction::Allow,
            target: None,
            rule,
        }
    }

    fn redirect(target: String, rule: RouteRule) -> Self {
        Self {
            action: RouteAction::Redirect,
            target: Some(target),
            rule,
        }
    }

    fn rewrite(target: String, rule: RouteRule) -> Self {
        Self {
            action: RouteAction::Rewrite,
            target: Some(target),
            rule,
        }
    }

    #[inline]
    pub const fn is_allow(&self) -> bool {
        matches!(self.action, RouteAction::Allow)
    }
}

impl fmt::Display for RouteDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.action, &self.target) {
            (RouteAction::Allow, _) | (_, None) => write!(f, "allow ({})", self.rule),
            (RouteAction::Redirect, Some(t)) => write!(f, "redirect -> {t} ({})", self.rule),
            (RouteAction::Rewrite, Some(t)) => write!(f, "rewrite -> {t} ({})", self.rule),
        }
    }
}

/// Split a request target into path and the `?query#fragment` suffix.
///
/// An empty path becomes `/`, a relative one gains a leading `/`.
fn split_target(raw: &str) -> (String, &str) {
    let cut = raw.find(['?', '#']).unwrap_or(raw.len());
    let (path, suffix) = raw.split_at(cut);
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    (path, suffix)
}

/// Rule 6 shape: `[/{locale}]/brands/{slug}/{section}` without trailing slash.
fn is_brand_section(path: &str, rules: &RouteRules) -> bool {
    if path.ends_with('/') {
        return false;
    }
    let segments: Vec<&str> = path.split('/').skip(1).collect();
    let rest = match segments.as_slice() {
        [first, rest @ ..] if rules.locales.contains(first) => rest,
        all => all,
    };
    match rest {
        ["brands", slug, section] => {
            !slug.is_empty()
                && *slug != "."
                && *slug != ".."
                && ContentType::from_segment(section).is_some_and(ContentType::is_brand_scoped)
        }
        _ => false,
    }
}

/// Whether `path` sits under `/brands/`, optionally after a locale segment.
fn is_under_brands(path: &str, rules: &RouteRules) -> bool {
    let rest = path.strip_prefix('/').unwrap_or(path);
    let rest = match rest.split_once('/') {
        Some((first, tail)) if rules.locales.contains(first) => tail,
        _ => rest,
    };
    rest.starts_with("brands/")
}

/// Classify a request path. First match wins; the fallthrough is `allow`.
pub fn route(raw: &str, rules: &RouteRules) -> RouteDecision {
    let (path, suffix) = split_target(raw);
    let path = path.as_str();

    if rules.is_admin_root(path) {
        return RouteDecision::redirect(format!("{path}/{suffix}"), RouteRule::AdminRoot);
    }
    if rules.is_admin_tool(path) {
        return RouteDecision::allow(RouteRule::AdminTool);
    }
    if rules.is_back_office(path) {
        return RouteDecision::allow(RouteRule::BackOffice);
    }
    if rules.is_api(path) {
        return RouteDecision::allow(RouteRule::Api);
    }
    if rules.is_asset(path) {
        return RouteDecision::allow(RouteRule::Asset);
    }
    if suffix.is_empty() && is_brand_section(path, rules) {
        return RouteDecision::redirect(format!("{path}/"), RouteRule::BrandSection);
    }
    if is_under_brands(path, rules) {
        return RouteDecision::allow(RouteRule::Brands);
    }
    RouteDecision::allow(RouteRule::Fallthrough)
}

/// Router plus locale-prefix enforcement, as run at the edge.
#[derive(Debug, Clone)]
pub struct EdgeRouter {
    rules: RouteRules,
}

impl EdgeRouter {
    pub const fn new(rules: RouteRules) -> Self {
        Self { rules }
    }

    /// Route a request, redirecting unprefixed pages to a locale.
    ///
    /// The target is already canonical (brand sections get their trailing
    /// slash, the query is kept), so it routes to `allow`.
    pub fn decide(&self, raw: &str, hints: LocaleHints<'_>) -> RouteDecision {
        let decision = route(raw, &self.rules);
        if decision.rule.is_exempt() {
            return decision;
        }

        let (path, suffix) = split_target(raw);
        let first = path.split('/').nth(1).unwrap_or_default();
        if self.rules.locales.contains(first) {
            return decision;
        }

        let locale = self.rules.locales.negotiate(hints);
        let mut target = format!("/{locale}{path}");
        if is_brand_section(&target, &self.rules) {
            target.push('/');
        }
        target.push_str(suffix);
        RouteDecision::redirect(target, RouteRule::Locale)
    }

    /// Single-page fallback for the admin tool: a path under the admin root
    /// with no file behind it is served from the admin root's `index.html`.
    pub fn rewrite_missing(&self, raw: &str) -> Option<RouteDecision> {
        let decision = route(raw, &self.rules);
        (decision.rule == RouteRule::AdminTool).then(|| {
            RouteDecision::rewrite(
                format!("{}/index.html", self.rules.admin_root),
                RouteRule::AdminTool,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RouteRules {
        RouteRules::default()
    }

    fn edge() -> EdgeRouter {
        EdgeRouter::new(rules())
    }

    fn target(d: &RouteDecision) -> &str {
        d.target.as_deref().unwrap_or_default()
    }

    #[test]
    fn test_admin_root_redirect() {
        let d = route("/studio", &rules());
        assert_eq!(d.action, RouteAction::Redirect);
        assert_eq!(target(&d), "/studio/");
        assert_eq!(d.rule, RouteRule::AdminRoot);

        assert_eq!(route("/studio/", &rules()).rule, RouteRule::AdminTool);
        assert_eq!(route("/studio/desk/x", &rules()).rule, RouteRule::AdminTool);
        assert_eq!(route("/studios", &rules()).rule, RouteRule::Fallthrough);
    }

    #[test]
    fn test_exempt_prefixes() {
        let r = rules();
        assert_eq!(route("/admin", &r).rule, RouteRule::BackOffice);
        assert_eq!(route("/admin/users", &r).rule, RouteRule::BackOffice);
        assert_eq!(route("/api/search?q=1", &r).rule, RouteRule::Api);
        assert_eq!(route("/_next/static/app", &r).rule, RouteRule::Asset);
        assert_eq!(route("/robots.txt", &r).rule, RouteRule::Asset);
        assert!(route("/api/x", &r).is_allow());
    }

    #[test]
    fn test_brand_subpath_trailing_slash() {
        let r = rules();
        for (path, expected) in [
            ("/brands/cree/products", "/brands/cree/products/"),
            ("/zh-CN/brands/cree/solutions", "/zh-CN/brands/cree/solutions/"),
            ("/en/brands/%E7%A7%91%E9%94%90/support", "/en/brands/%E7%A7%91%E9%94%90/support/"),
        ] {
            let d = route(path, &r);
            assert_eq!(d.action, RouteAction::Redirect, "{path}");
            assert_eq!(target(&d), expected);
            assert_eq!(d.rule, RouteRule::BrandSection);
        }

        let d = route("/brands/cree/products/", &r);
        assert_eq!(d.action, RouteAction::Allow);
        assert_eq!(d.rule, RouteRule::Brands);
    }

    #[test]
    fn test_brand_subpath_shapes_not_redirected() {
        let r = rules();
        // query present, unknown section, empty slug, unsupported locale, deeper path
        for path in [
            "/brands/cree/products?page=2",
            "/brands/cree/articles",
            "/brands//products",
            "/fr/brands/cree/products",
            "/brands/cree/products/55555",
            "/brands/../products",
        ] {
            assert!(route(path, &r).is_allow(), "{path}");
        }
    }

    #[test]
    fn test_fallthrough() {
        let r = rules();
        assert_eq!(route("/", &r).rule, RouteRule::Fallthrough);
        assert_eq!(route("/en/articles/x/", &r).rule, RouteRule::Fallthrough);
        assert_eq!(route("/brands", &r).rule, RouteRule::Fallthrough);
    }

    #[test]
    fn test_malformed_input_never_panics() {
        let r = rules();
        let e = edge();
        for path in [
            "", "?", "#", "%", "/%zz/%", "//", "///brands", "relative/path", "/%E7%A7",
            "/\u{0}", "/中文/brands/科锐/products", "?/studio", "/studio?", "/en?",
        ] {
            let _ = route(path, &r);
            let _ = e.decide(path, LocaleHints::default());
            let _ = e.rewrite_missing(path);
        }
        assert_eq!(route("", &r).rule, RouteRule::Fallthrough);
    }

    #[test]
    fn test_fixed_point() {
        let r = rules();
        let e = edge();
        let hints = [
            LocaleHints::default(),
            LocaleHints {
                cookie: Some("en"),
                accept_language: None,
            },
            LocaleHints {
                cookie: None,
                accept_language: Some("en-US,en;q=0.8"),
            },
        ];
        for path in [
            "/", "", "/studio", "/studio?x=1", "/brands/cree/products", "/brands/cree/products?a=b",
            "/en/brands/cree/support", "/brands", "/about", "/about?x#y", "relative",
            "//x", "/EN/brands/cree/products", "/brands/科锐/solutions",
        ] {
            let d = route(path, &r);
            if let Some(t) = &d.target {
                assert!(route(t, &r).is_allow(), "route({path}) -> {t}");
            }
            for h in hints {
                let d = e.decide(path, h);
                if let Some(t) = &d.target {
                    let again = e.decide(t, h);
                    assert!(again.is_allow(), "decide({path}) -> {t} -> {again}");
                }
            }
        }
    }

    #[test]
    fn test_edge_locale_prefix() {
        let e = edge();
        let d = e.decide("/brands/cree/", LocaleHints::default());
        assert_eq!(d.rule, RouteRule::Locale);
        assert_eq!(target(&d), "/zh-CN/brands/cree/");

        let d = e.decide("/", LocaleHints::default());
        assert_eq!(target(&d), "/zh-CN/");

        let d = e.decide(
            "/brands/cree/products?page=2",
            LocaleHints {
                cookie: Some("en"),
                accept_language: None,
            },
        );
        assert_eq!(target(&d), "/en/brands/cree/products/?page=2");
    }

    #[test]
    fn test_edge_default_locale_never_unprefixed() {
        let e = edge();
        let d = e.decide("/about", LocaleHints::default());
        assert_eq!(d.action, RouteAction::Redirect);
        assert_eq!(target(&d), "/zh-CN/about");
    }

    #[test]
    fn test_edge_prefixed_and_exempt_pass_through() {
        let e = edge();
        assert!(e.decide("/en/brands/cree/", LocaleHints::default()).is_allow());
        assert!(e.decide("/api/x", LocaleHints::default()).is_allow());
        assert!(e.decide("/logo.png", LocaleHints::default()).is_allow());

        let d = e.decide("/en/brands/cree/products", LocaleHints::default());
        assert_eq!(d.rule, RouteRule::BrandSection);
        assert_eq!(target(&d), "/en/brands/cree/products/");

        let d = e.decide("/studio", LocaleHints::default());
        assert_eq!(d.rule, RouteRule::AdminRoot);
    }

    #[test]
    fn test_rewrite_missing() {
        let e = edge();
        let d = e.rewrite_missing("/studio/desk/product").unwrap();
        assert_eq!(d.action, RouteAction::Rewrite);
        assert_eq!(target(&d), "/studio/index.html");
        assert!(e.rewrite_missing("/en/brands/").is_none());
        assert!(e.rewrite_missing("/studio").is_none());
    }

    #[test]
    fn test_decision_display() {
        let d = route("/studio", &rules());
        assert_eq!(d.to_string(), "redirect -> /studio/ (admin-root)");
        assert_eq!(route("/", &rules()).to_string(), "allow (fallthrough)");
    }
}
