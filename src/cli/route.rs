//! Route inspection commands: `route` and `compose`.

use anyhow::{Result, bail};
use owo_colors::OwoColorize;

use super::RouteArgs;
use crate::config::SiteConfig;
use crate::core::{ContentType, LocaleHints};
use crate::router::{EdgeRouter, RouteAction, RouteDecision, RouteRules, route};
use crate::slug::compose_url;

/// Print the decision for every path of `args`.
pub fn route_paths(config: &SiteConfig, args: &RouteArgs) -> Result<()> {
    let rules = RouteRules::from_config(config);
    let edge = args.is_edge().then(|| EdgeRouter::new(rules.clone()));
    let hints = LocaleHints {
        cookie: args.cookie.as_deref(),
        accept_language: args.accept_language.as_deref(),
    };

    let width = args.paths.iter().map(|p| p.chars().count()).max().unwrap_or(0);
    for path in &args.paths {
        let decision = match &edge {
            Some(edge) => edge.decide(path, hints),
            None => route(path, &rules),
        };
        println!("{:width$}  {}", path, format_decision(&decision));
    }
    Ok(())
}

fn format_decision(decision: &RouteDecision) -> String {
    let rule = format!("({})", decision.rule).dimmed().to_string();
    let target = match &decision.target {
        Some(target) if !decision.is_allow() => target,
        _ => return format!("{} {}", "allow".green(), rule),
    };
    match decision.action {
        RouteAction::Redirect => format!("{} {} {}", "redirect ->".yellow(), target, rule),
        _ => format!("{} {} {}", "rewrite ->".cyan(), target, rule),
    }
}

/// Print the canonical URL of a page.
pub fn compose(
    config: &SiteConfig,
    locale: &str,
    content_type: ContentType,
    slug: &str,
    brand: Option<&str>,
) -> Result<()> {
    let url = compose_checked(config, locale, content_type, slug, brand)?;
    println!("{url}");
    Ok(())
}

fn compose_checked(
    config: &SiteConfig,
    locale: &str,
    content_type: ContentType,
    slug: &str,
    brand: Option<&str>,
) -> Result<String> {
    let locales = config.site.locales();
    let Some(locale) = locales.canonical(locale) else {
        bail!(
            "unsupported locale `{locale}` (supported: {})",
            locales.supported().join(", ")
        );
    };

    let (brand, item) = match content_type {
        ContentType::Brand => (Some(slug), ""),
        ContentType::Article => {
            if brand.is_some() {
                bail!("articles are not brand scoped, drop --brand");
            }
            (None, slug)
        }
        _ => {
            let Some(brand) = brand else {
                bail!("{content_type} pages need --brand");
            };
            (Some(brand), slug)
        }
    };

    match compose_url(locale, content_type, brand, item) {
        Some(url) => Ok(url),
        None => bail!("not routable: a slug cleans to an empty string"),
    }
}
