//! Post-synthesis verification of the output tree.

use std::path::{Path, PathBuf};

use super::Manifest;

/// Files that must exist after synthesis, relative paths made absolute.
///
/// - `index.html` at the root
/// - `{locale}/index.html` for every locale
/// - the first routable tuple's page for every locale
/// - every `must_exist` extra
pub fn required_files(output: &Path, manifest: &Manifest, must_exist: &[PathBuf]) -> Vec<PathBuf> {
    let mut required = vec![output.join("index.html")];

    for locale in &manifest.locales {
        required.push(output.join(locale).join("index.html"));
        if let Some(route) = manifest
            .keys_for(locale)
            .find_map(|key| key.canonical_route())
        {
            required.push(route.output_file(output));
        }
    }

    required.extend(must_exist.iter().map(|p| output.join(p)));
    required
}

/// Required files that are missing.
pub fn missing_files(output: &Path, manifest: &Manifest, must_exist: &[PathBuf]) -> Vec<PathBuf> {
    required_files(output, manifest, must_exist)
        .into_iter()
        .filter(|p| !p.is_file())
        .collect()
}
