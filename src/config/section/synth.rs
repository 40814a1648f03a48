//! `[synth]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [synth]
//! output = "out"
//! template_candidates = ["_shell.html", "404.html", "index.html"]
//! fallback_shell = true          # Embedded shell when no candidate exists
//! redirects = "public/_redirects"
//! must_exist = ["zh-CN/brands/index.html"]
//! workers = 0                    # 0 = one per core
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Exported static tree (relative to project root).
    pub output: PathBuf,

    /// Template artifact candidates, relative to `output`, probed in order.
    pub template_candidates: Vec<PathBuf>,

    /// Use the embedded shell page when no candidate exists.
    pub fallback_shell: bool,

    /// Redirect rules copied to the output root (relative to project root).
    pub redirects: PathBuf,

    /// Extra files (relative to `output`) that must exist after synthesis.
    pub must_exist: Vec<PathBuf>,

    /// Worker threads for synthesis. `0` uses the rayon default.
    pub workers: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            output: "out".into(),
            template_candidates: vec!["_shell.html".into(), "404.html".into(), "index.html".into()],
            fallback_shell: true,
            redirects: "public/_redirects".into(),
            must_exist: Vec::new(),
            workers: 0,
        }
    }
}

impl SynthConfig {
    const TEMPLATE_CANDIDATES: FieldPath = FieldPath::new("synth.template_candidates");
    const MUST_EXIST: FieldPath = FieldPath::new("synth.must_exist");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.template_candidates.is_empty() && !self.fallback_shell {
            diag.error_with_hint(
                Self::TEMPLATE_CANDIDATES,
                "no template candidates and fallback_shell is disabled",
                "list at least one candidate or set synth.fallback_shell = true",
            );
        }
        for path in &self.template_candidates {
            if path.is_absolute() {
                diag.error(
                    Self::TEMPLATE_CANDIDATES,
                    format!("`{}` must be relative to synth.output", path.display()),
                );
            }
        }
        for path in &self.must_exist {
            if path.is_absolute() {
                diag.error(
                    Self::MUST_EXIST,
                    format!("`{}` must be relative to synth.output", path.display()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_synth_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.synth.output, PathBuf::from("out"));
        assert_eq!(config.synth.template_candidates.len(), 3);
        assert!(config.synth.fallback_shell);
        assert_eq!(config.synth.redirects, PathBuf::from("public/_redirects"));
        assert!(config.synth.must_exist.is_empty());
        assert_eq!(config.synth.workers, 0);
    }

    #[test]
    fn test_synth_requires_template_source() {
        let config = test_parse_config("[synth]\ntemplate_candidates = []\nfallback_shell = false");
        let mut diag = ConfigDiagnostics::new();
        config.synth.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_synth_absolute_must_exist() {
        let config = test_parse_config("[synth]\nmust_exist = [\"/etc/passwd\"]");
        let mut diag = ConfigDiagnostics::new();
        config.synth.validate(&mut diag);
        assert!(!diag.is_empty());
    }
}
