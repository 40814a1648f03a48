//! Static artifact synthesis.
//!
//! The framework build exports only part of the `locale × brand × item`
//! page space. Synthesis fills the gaps with the template artifact so every
//! canonical route has a file:
//!
//! ```text
//! {output}/{locale}/brands/{brand}/{section}/{id}/index.html
//! ```
//!
//! Existing files are never touched (`create_new` per path), so a second run
//! creates nothing.

mod manifest;
mod redirects;
mod template;
mod verify;

pub use manifest::{ArtifactEntry, ArtifactManifest, Manifest, Origin};
pub use redirects::{RedirectCopy, copy_redirects};
pub use template::{TemplateArtifact, probe_template};
pub use verify::missing_files;

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::cli::common::ParallelCollector;
use crate::content::ContentError;
use crate::core::{ContentKey, is_shutdown};
use crate::logger::ProgressLine;
use crate::{debug, log};
use manifest::relative_url_path;

/// Synthesis failures. All are configuration errors: fatal, non-zero exit.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("manifest `{path}` unavailable: {reason}")]
    ManifestUnavailable { path: PathBuf, reason: String },

    #[error("cannot derive manifest from content")]
    Content(#[from] ContentError),

    #[error(
        "no template artifact in `{}` (tried {:?}) and synth.fallback_shell is disabled",
        output.display(),
        candidates
    )]
    NoTemplate {
        output: PathBuf,
        candidates: Vec<PathBuf>,
    },

    #[error("failed to write `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to start synthesis workers")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("synthesis aborted")]
    Aborted,
}

/// Per-locale outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleCounts {
    pub created: usize,
    pub already_present: usize,
}

#[derive(Debug, Default)]
pub struct SynthReport {
    pub per_locale: BTreeMap<String, LocaleCounts>,
    /// Keys without a canonical route (NormalizationDegradation).
    pub skipped: Vec<ContentKey>,
    /// Sorted by file path.
    pub entries: Vec<ArtifactEntry>,
}

impl SynthReport {
    pub fn created(&self) -> usize {
        self.per_locale.values().map(|c| c.created).sum()
    }

    pub fn already_present(&self) -> usize {
        self.per_locale.values().map(|c| c.already_present).sum()
    }
}

/// Fill every missing page of `manifest` under `output` with `template`.
///
/// `workers == 0` uses the rayon default pool size.
pub fn synthesize(
    manifest: &Manifest,
    template: &TemplateArtifact,
    output: &Path,
    workers: usize,
) -> Result<SynthReport, SynthError> {
    let mut report = SynthReport::default();
    for locale in &manifest.locales {
        report.per_locale.insert(locale.clone(), LocaleCounts::default());
    }

    // One target per file: keys that clean to the same route collapse.
    let mut targets: BTreeMap<PathBuf, ContentKey> = BTreeMap::new();
    for key in manifest.keys() {
        match key.canonical_route() {
            Some(route) => {
                let path = route.output_file(output);
                if let Some(first) = targets.get(&path) {
                    debug!("synth"; "{} shares {} with {}", key, route, first);
                } else {
                    targets.insert(path, key);
                }
            }
            None => {
                log!("degraded"; "{} is not routable, skipped", key);
                report.skipped.push(key);
            }
        }
    }

    let counters: Vec<(String, usize)> = manifest
        .locales
        .iter()
        .map(|l| (l.clone(), targets.values().filter(|k| &k.locale == l).count()))
        .collect();
    let progress = ProgressLine::new("synth", &counters);

    let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;
    let collector = ParallelCollector::new();
    let has_error = AtomicBool::new(false);

    let result = pool.install(|| {
        targets.par_iter().try_for_each(|(path, key)| {
            if is_shutdown() || has_error.load(Ordering::Relaxed) {
                return Err(SynthError::Aborted);
            }
            let origin = write_if_absent(path, &template.bytes).inspect_err(|_| {
                has_error.store(true, Ordering::Relaxed);
            })?;
            progress.inc(&key.locale);
            collector.push(ArtifactEntry {
                content_key: key.clone(),
                file_path: relative_url_path(path, output),
                origin,
            });
            Ok(())
        })
    });
    progress.finish();
    result?;

    let mut entries = collector.drain_with_capacity(targets.len());
    entries.sort_by(|a, b| a.file_path.cmp(&b.file_path));

    for entry in &entries {
        let counts = report
            .per_locale
            .entry(entry.content_key.locale.clone())
            .or_default();
        match entry.origin {
            Origin::Build => counts.already_present += 1,
            Origin::Synthesized => counts.created += 1,
        }
    }
    report.entries = entries;

    Ok(report)
}

/// Write `bytes` to `path` unless something is already there.
///
/// The existence check and the write are one `create_new` open, so two
/// writers racing for a path cannot both win and nothing is overwritten.
fn write_if_absent(path: &Path, bytes: &[u8]) -> Result<Origin, SynthError> {
    let io_err = |e| SynthError::Io(path.to_path_buf(), e);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(Origin::Build),
        Err(e) => return Err(io_err(e)),
    };

    if let Err(e) = file.write_all(bytes) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(io_err(e));
    }
    Ok(Origin::Synthesized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::hash;
    use tempfile::TempDir;

    fn manifest(json: &str) -> Manifest {
        serde_json::from_str(json).unwrap()
    }

    fn template() -> TemplateArtifact {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<html>shell</html>").unwrap();
        probe_template(dir.path(), &["index.html".into()], false, "t").unwrap()
    }

    #[test]
    fn test_idempotent_two_locales() {
        let dir = TempDir::new().unwrap();
        let out = dir.path();
        let m = manifest(r#"{"locales":["zh-CN","en"],"brands":["cree"],"items":{"product":["55555"]}}"#);
        let t = template();

        let first = synthesize(&m, &t, out, 2).unwrap();
        assert_eq!(first.created(), 2);
        assert_eq!(first.already_present(), 0);
        assert!(out.join("zh-CN/brands/cree/products/55555/index.html").is_file());
        assert!(out.join("en/brands/cree/products/55555/index.html").is_file());

        let second = synthesize(&m, &t, out, 2).unwrap();
        assert_eq!(second.created(), 0);
        assert_eq!(second.already_present(), 2);
        for counts in second.per_locale.values() {
            assert_eq!(*counts, LocaleCounts { created: 0, already_present: 1 });
        }
    }

    #[test]
    fn test_existing_build_output_untouched() {
        let dir = TempDir::new().unwrap();
        let out = dir.path();
        let built = out.join("en/brands/cree/products/1/index.html");
        fs::create_dir_all(built.parent().unwrap()).unwrap();
        fs::write(&built, "real page").unwrap();

        let m = manifest(r#"{"locales":["en"],"brands":["cree"],"items":{"product":["1","2"]}}"#);
        let report = synthesize(&m, &template(), out, 0).unwrap();

        assert_eq!(fs::read_to_string(&built).unwrap(), "real page");
        let origins: Vec<_> = report.entries.iter().map(|e| (e.file_path.as_str(), e.origin)).collect();
        assert_eq!(
            origins,
            [
                ("en/brands/cree/products/1/index.html", Origin::Build),
                ("en/brands/cree/products/2/index.html", Origin::Synthesized),
            ]
        );
        let written = fs::read(out.join("en/brands/cree/products/2/index.html")).unwrap();
        assert_eq!(hash::digest(&written), template().digest);
    }

    #[test]
    fn test_unroutable_keys_skipped() {
        let dir = TempDir::new().unwrap();
        let m = manifest(
            r#"{"locales":["en"],"brands":["cree"," .pdf"],"items":{"support":["faq",""," "]}}"#,
        );
        let report = synthesize(&m, &template(), dir.path(), 1).unwrap();
        assert_eq!(report.created(), 1);
        // 2 unroutable ids under cree, 3 under the empty brand
        assert_eq!(report.skipped.len(), 5);
        assert!(dir.path().join("en/brands/cree/support/faq/index.html").is_file());
    }

    #[test]
    fn test_colliding_keys_write_once() {
        let dir = TempDir::new().unwrap();
        let m = manifest(r#"{"locales":["en"],"brands":["cree"],"items":{"product":["7","7.html"]}}"#);
        let report = synthesize(&m, &template(), dir.path(), 2).unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.created(), 1);
    }

    #[test]
    fn test_cjk_segments() {
        let dir = TempDir::new().unwrap();
        let m = manifest(r#"{"locales":["zh-CN"],"brands":["科锐"],"items":{"solution":["照明"]}}"#);
        synthesize(&m, &template(), dir.path(), 1).unwrap();
        assert!(dir.path().join("zh-CN/brands/科锐/solutions/照明/index.html").is_file());
    }

    #[test]
    fn test_empty_manifest() {
        let dir = TempDir::new().unwrap();
        let report = synthesize(&Manifest::default(), &template(), dir.path(), 1).unwrap();
        assert!(report.entries.is_empty());
        assert!(report.per_locale.is_empty());
    }
}
