//! Slug consistency validation command.
//!
//! Read-only: classifies every entity's raw slug, groups duplicates per
//! `(type, brand scope)` and fails when any hard issue (`missing`, `empty`,
//! `duplicate`) exists. Soft issues are reported as warnings only.

mod report;
mod scan;

pub use report::ValidationReport;

use anyhow::{Context, Result};

use super::ValidateArgs;
use super::common::{entity_cache, repository};
use crate::config::SiteConfig;
use crate::content::{ContentError, ContentRepository};
use crate::core::ContentType;
use crate::log;
use crate::utils::plural_count;

/// Scan `types` and build the report.
pub fn validate_content(
    repo: &impl ContentRepository,
    types: &[ContentType],
) -> Result<ValidationReport, ContentError> {
    let scanned = scan::scan_entities(repo, types)?;
    Ok(ValidationReport::from_scan(scanned))
}

/// Run the `validate` command.
pub fn validate_site(config: &SiteConfig, args: &ValidateArgs) -> Result<()> {
    let cache = entity_cache(config);
    let repo = repository(config, &cache);
    let types = selected_types(args.content_type);

    if args.json {
        let report = validate_content(&repo, &types).context("failed to load content")?;
        println!("{}", report.to_json()?);
        return into_result(&report);
    }

    check(&repo, &types)
}

/// Validate, print the report and fail on hard issues.
///
/// Shared with `build`, which runs it as its first gate.
pub fn check(repo: &impl ContentRepository, types: &[ContentType]) -> Result<()> {
    let names: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
    log!("validate"; "scanning {}", names.join(", "));

    let report = validate_content(repo, types).context("failed to load content")?;
    log!("validate"; "checked {}", plural_count(report.scanned, "entity"));

    report.print();
    log!("validate"; "{}", report);

    into_result(&report)
}

fn into_result(report: &ValidationReport) -> Result<()> {
    if report.has_hard_issues() {
        anyhow::bail!(
            "validation failed: {} with hard issues",
            plural_count(report.hard_count(), "entity")
        );
    }
    Ok(())
}

fn selected_types(content_type: Option<ContentType>) -> Vec<ContentType> {
    match content_type {
        Some(ty) => vec![ty],
        None => ContentType::ALL.to_vec(),
    }
}
