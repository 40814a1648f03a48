//! Artifact synthesis command.
//!
//! Pipeline: manifest -> template probe -> fill missing pages -> report ->
//! redirect rules copy -> verify. Any missing required file fails the command.

use std::path::Path;

use anyhow::{Context, Result};

use super::SynthArgs;
use super::common::{entity_cache, repository};
use crate::config::SiteConfig;
use crate::content::ContentRepository;
use crate::log;
use crate::synth::{self, ArtifactManifest, Manifest, RedirectCopy, SynthReport};
use crate::utils::{hash, path::relative_display, plural_count};

/// Run the `synthesize` command.
pub fn synthesize_site(config: &SiteConfig, args: &SynthArgs) -> Result<()> {
    let cache = entity_cache(config);
    let repo = repository(config, &cache);
    run(config, args, &repo).map(|_| ())
}

/// Synthesize every missing page of the manifest, then verify the tree.
pub fn run(
    config: &SiteConfig,
    args: &SynthArgs,
    repo: &impl ContentRepository,
) -> Result<SynthReport> {
    let manifest = load_manifest(config, args.manifest.as_deref(), repo)?;
    let output = config.output_dir();

    if manifest.is_empty() {
        log!("warn"; "manifest has no tuples, nothing to synthesize");
    } else {
        log!("synth"; "{} from {} x {} x {}",
            plural_count(manifest.len(), "tuple"),
            plural_count(manifest.locales.len(), "locale"),
            plural_count(manifest.brands.len(), "brand"),
            plural_count(manifest.items.values().map(|ids| ids.len()).sum(), "item"));
    }

    let template = synth::probe_template(
        output,
        &config.synth.template_candidates,
        config.synth.fallback_shell,
        &config.site.title,
    )?;
    if !template.is_degraded() {
        log!("synth"; "template {} ({})", template.source, hash::fingerprint(&template.bytes));
    }

    let report = synth::synthesize(&manifest, &template, output, config.synth.workers)?;
    log_report(&report);

    if let Some(path) = &args.manifest_out {
        ArtifactManifest {
            template: template.source.to_string(),
            template_digest: &template.digest,
            entries: &report.entries,
        }
        .write(path)?;
        log!("synth"; "artifact manifest written to {}", relative_display(path, config.get_root()));
    }

    copy_redirects(config)?;
    verify(config, &manifest)?;

    Ok(report)
}

fn load_manifest(
    config: &SiteConfig,
    path: Option<&Path>,
    repo: &impl ContentRepository,
) -> Result<Manifest> {
    match path {
        Some(path) => Ok(Manifest::load(path)?),
        None => Manifest::from_repository(repo, &config.site.locales())
            .context("failed to derive the manifest from content"),
    }
}

fn copy_redirects(config: &SiteConfig) -> Result<()> {
    let source = &config.synth.redirects;
    match synth::copy_redirects(source, config.output_dir())? {
        RedirectCopy::Copied(dest) => {
            log!("synth"; "redirect rules copied to {}", relative_display(&dest, config.get_root()));
        }
        RedirectCopy::Unchanged(_) => {
            crate::debug!("synth"; "redirect rules unchanged");
        }
        RedirectCopy::MissingSource => {
            log!("warn"; "redirect rules {} not found, skipped",
                relative_display(source, config.get_root()));
        }
    }
    Ok(())
}

fn verify(config: &SiteConfig, manifest: &Manifest) -> Result<()> {
    let output = config.output_dir();
    let missing = synth::missing_files(output, manifest, &config.synth.must_exist);
    if missing.is_empty() {
        log!("verify"; "all required files present");
        return Ok(());
    }

    for path in &missing {
        log!("error"; "missing {}", relative_display(path, output));
    }
    anyhow::bail!(
        "verification failed: {} missing",
        plural_count(missing.len(), "required file")
    );
}

fn log_report(report: &SynthReport) {
    for (locale, counts) in &report.per_locale {
        log!("synth"; "{}: {} created, {} already present",
            locale, counts.created, counts.already_present);
    }
    if !report.skipped.is_empty() {
        log!("degraded"; "{} without a canonical route",
            plural_count(report.skipped.len(), "tuple"));
    }
    log!("synth"; "done: {} created, {} already present",
        plural_count(report.created(), "page"), report.already_present());
}
