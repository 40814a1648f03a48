//! URL to filesystem path resolution.

use std::path::{Path, PathBuf};

use crate::core::UrlPath;

/// Resolve a decoded request path to a file under `serve_root`.
///
/// Directories resolve to their `index.html`. Anything that escapes the
/// root (`..` smuggled through encoded separators, symlinks) resolves to `None`.
pub fn resolve_path(url: &UrlPath, serve_root: &Path) -> Option<PathBuf> {
    if url
        .segments()
        .any(|s| s == ".." || s == "." || s.contains(['\\', '\0']))
    {
        return None;
    }

    let local = url.segments().fold(serve_root.to_path_buf(), |p, s| p.join(s));

    let canonical = local.canonicalize().ok()?;
    let root_canonical = serve_root.canonicalize().ok()?;
    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("out");
        for rel in [
            "index.html",
            "zh-CN/brands/cree/products/55555/index.html",
            "zh-CN/brands/科锐/index.html",
            "_next/app.js",
        ] {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, rel).unwrap();
        }
        fs::write(dir.path().join("secret.txt"), "secret").unwrap();
        (dir, root)
    }

    fn resolve(target: &str, root: &Path) -> Option<PathBuf> {
        resolve_path(&UrlPath::from_browser(target), root)
    }

    #[test]
    fn test_resolve_file_and_index() {
        let (_dir, root) = site();
        assert!(resolve("/_next/app.js", &root).unwrap().ends_with("app.js"));
        assert!(resolve("/", &root).unwrap().ends_with("index.html"));

        let page = resolve("/zh-CN/brands/cree/products/55555/?ref=x", &root).unwrap();
        assert!(page.ends_with("55555/index.html"));
    }

    #[test]
    fn test_resolve_percent_encoded() {
        let (_dir, root) = site();
        let encoded = "/zh-CN/brands/%E7%A7%91%E9%94%90/";
        assert!(resolve(encoded, &root).is_some());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let (_dir, root) = site();
        assert!(resolve("/../secret.txt", &root).is_none());
        assert!(resolve("/%2e%2e/secret.txt", &root).is_none());
        assert!(resolve("/zh-CN%2F..%2F..%2Fsecret.txt", &root).is_none());
    }

    #[test]
    fn test_resolve_missing() {
        let (_dir, root) = site();
        assert!(resolve("/en/brands/cree/", &root).is_none());
        assert!(resolve("/zh-CN/brands/", &root).is_none());
    }
}
