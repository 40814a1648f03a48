//! Deploy build orchestration.
//!
//! Build pipeline phases:
//! - **Validate** - Slug consistency gate over every content type
//! - **Synthesize** - Fill missing canonical pages, copy the redirect rules
//!   and verify required files (see [`synthesize::run`])
//!
//! All phases share one repository cache.

use anyhow::Result;

use super::SynthArgs;
use super::common::{entity_cache, repository};
use super::{synthesize, validate};
use crate::config::SiteConfig;
use crate::core::ContentType;
use crate::log;
use crate::utils::{path::relative_display, plural_count};

/// Run the `build` command.
pub fn build_site(config: &SiteConfig, args: &SynthArgs) -> Result<()> {
    let cache = entity_cache(config);
    let repo = repository(config, &cache);

    validate::check(&repo, &ContentType::ALL)?;

    let report = synthesize::run(config, args, &repo)?;

    log!("build"; "done, {} in {}",
        plural_count(report.entries.len(), "canonical page"),
        relative_display(config.output_dir(), config.get_root()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use std::fs;
    use tempfile::TempDir;

    const CONTENT: &[(&str, &str)] = &[
        ("brands.json", r#"[{"_id": "b1", "slug": {"current": "cree"}}]"#),
        (
            "products.json",
            r#"[{"_id": "55555", "slug": "led", "brand": {"_ref": "b1"}}]"#,
        ),
    ];

    fn project(content: &[(&str, &str)]) -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let content_dir = dir.path().join("content");
        fs::create_dir_all(&content_dir).unwrap();
        for (name, body) in content {
            fs::write(content_dir.join(name), body).unwrap();
        }
        let out = dir.path().join("out");
        for rel in ["index.html", "zh-CN/index.html", "en/index.html"] {
            let path = out.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "<html></html>").unwrap();
        }
        let config = test_config_at(dir.path(), "");
        (dir, config)
    }

    fn args() -> SynthArgs {
        SynthArgs {
            manifest: None,
            manifest_out: None,
        }
    }

    #[test]
    fn test_build_passes() {
        let (dir, config) = project(CONTENT);
        fs::create_dir_all(dir.path().join("public")).unwrap();
        fs::write(dir.path().join("public/_redirects"), "/ /zh-CN/ 302\n").unwrap();

        build_site(&config, &args()).unwrap();

        let out = config.output_dir();
        assert!(out.join("zh-CN/brands/cree/products/55555/index.html").is_file());
        assert!(out.join("en/brands/cree/products/55555/index.html").is_file());
        assert!(out.join("_redirects").is_file());
    }

    #[test]
    fn test_build_blocked_by_hard_issue() {
        let (_dir, config) = project(&[(
            "brands.json",
            r#"[{"_id": "b1", "slug": "Intel"}, {"_id": "b2", "slug": "intel "}]"#,
        )]);
        assert!(build_site(&config, &args()).is_err());
        assert!(!config.output_dir().join("zh-CN/brands").exists());
    }

    #[test]
    fn test_build_fails_verification() {
        let (_dir, config) = project(CONTENT);
        fs::remove_file(config.output_dir().join("en/index.html")).unwrap();

        let err = build_site(&config, &args()).unwrap_err();
        assert!(err.to_string().contains("verification failed"));
    }
}
