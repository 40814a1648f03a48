//! Audited slug repair command.
//!
//! Dry run by default: prints the plan and records the proposals in the
//! audit log. `--apply` writes the renames back through the repository's
//! [`SlugWriter`] after confirmation, then records them as applied.

mod audit;
mod plan;

pub use plan::{RepairAction, RepairPlan};

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::RepairArgs;
use super::common::{entity_cache, prompt_confirm, repository};
use crate::config::SiteConfig;
use crate::content::{ContentRepository, SlugWriter};
use crate::core::ContentType;
use crate::log;
use crate::slug::SlugPolicy;
use crate::utils::{path::relative_display, plural_count};
use audit::AuditEntry;

/// Run the `repair` command.
pub fn repair_content(config: &SiteConfig, args: &RepairArgs) -> Result<()> {
    let cache = entity_cache(config);
    let repo = repository(config, &cache);
    let audit_log = &config.repair.audit_log;

    let plan = plan_repairs(&repo, args.content_type, config.repair.policy())?;
    print_plan(&plan);

    if plan.renames() == 0 {
        log!("repair"; "nothing to rename");
        return Ok(());
    }

    if !args.apply {
        record(&plan, audit_log, false)?;
        log!("repair"; "dry run, pass --apply to write {}", plural_count(plan.renames(), "rename"));
        return Ok(());
    }

    let question = format!(
        "Write {} to {}?",
        plural_count(plan.renames(), "slug"),
        relative_display(config.content_dir(), config.get_root())
    );
    if !args.yes && !prompt_confirm(&question)? {
        log!("repair"; "aborted, nothing written");
        return Ok(());
    }

    let written = apply(&repo, &plan, audit_log)?;
    log!("repair"; "{} rewritten, audit log {}",
        plural_count(written, "slug"), relative_display(audit_log, config.get_root()));
    Ok(())
}

/// Build the plan for one content type.
pub fn plan_repairs(
    repo: &impl ContentRepository,
    content_type: ContentType,
    policy: SlugPolicy,
) -> Result<RepairPlan> {
    let entities = repo
        .list_entities(content_type)
        .with_context(|| format!("failed to load {content_type} entities"))?;
    Ok(RepairPlan::build(content_type, &entities, policy))
}

/// Write every rename of `plan`, then log them as applied.
pub fn apply(writer: &impl SlugWriter, plan: &RepairPlan, audit_log: &Path) -> Result<usize> {
    let updates = plan.updates();
    let written = writer
        .write_slugs(plan.content_type, &updates)
        .context("failed to write repaired slugs")?;
    record(plan, audit_log, true)?;
    Ok(written)
}

fn record(plan: &RepairPlan, audit_log: &Path, applied: bool) -> Result<()> {
    let entries: Vec<AuditEntry<'_>> = plan
        .items
        .iter()
        .filter_map(|item| match &item.action {
            RepairAction::Rename { after } => Some(AuditEntry::new(
                plan.content_type,
                &item.id,
                item.before.as_deref(),
                after,
                applied,
            )),
            _ => None,
        })
        .collect();
    audit::append(audit_log, &entries)
        .with_context(|| format!("failed to append to {}", audit_log.display()))
}

fn print_plan(plan: &RepairPlan) {
    if plan.is_empty() {
        log!("repair"; "every {} slug satisfies the policy", plan.content_type);
        return;
    }

    let manual = plan.count(|a| matches!(a, RepairAction::NeedsManual));
    let refused = plan.count(|a| matches!(a, RepairAction::Refused { .. }));
    log!("repair"; "{}: {}, {} needing a manual slug, {} refused",
        plan.content_type, plural_count(plan.renames(), "rename"), manual, refused);

    for item in &plan.items {
        let before = match &item.before {
            Some(raw) => format!("{raw:?}"),
            None => "<none>".to_string(),
        };
        let id = format!("{}{}{}", "[".dimmed(), item.id.cyan(), "]".dimmed());
        match &item.action {
            RepairAction::Rename { after } => {
                println!("{id} {before} {} {after:?}", "→".green());
            }
            RepairAction::NeedsManual => {
                println!("{id} {before} {} {}", "→".red(), "needs a manual slug".red());
            }
            RepairAction::Refused { after, conflicts } => {
                println!(
                    "{id} {before} {} {after:?} {}",
                    "→".yellow(),
                    format!("refused, collides with {}", conflicts.join(", ")).yellow()
                );
            }
        }
    }
}
