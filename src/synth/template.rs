//! Template artifact probe.
//!
//! Candidates are checked in order, relative to the output root. The first
//! non-empty regular file wins; otherwise the embedded shell is used when
//! allowed. The probe is bounded by the candidate list and never retries.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::SynthError;
use crate::embed::synth::{SHELL_HTML, ShellVars};
use crate::utils::hash;
use crate::{debug, log};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(PathBuf),
    Embedded,
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Embedded => f.write_str("<embedded shell>"),
        }
    }
}

/// Bytes written for every missing page.
#[derive(Debug, Clone)]
pub struct TemplateArtifact {
    pub bytes: Vec<u8>,
    pub source: TemplateSource,
    /// blake3 hex digest of `bytes`.
    pub digest: String,
}

impl TemplateArtifact {
    fn new(bytes: Vec<u8>, source: TemplateSource) -> Self {
        let digest = hash::digest(&bytes);
        Self {
            bytes,
            source,
            digest,
        }
    }

    /// Whether the embedded fallback is in use (degraded mode).
    pub fn is_degraded(&self) -> bool {
        self.source == TemplateSource::Embedded
    }
}

/// Find the template artifact.
pub fn probe_template(
    output: &Path,
    candidates: &[PathBuf],
    fallback_shell: bool,
    title: &str,
) -> Result<TemplateArtifact, SynthError> {
    for candidate in candidates {
        let path = output.join(candidate);
        match fs::read(&path) {
            Ok(bytes) if !bytes.is_empty() => {
                debug!("synth"; "template: {}", path.display());
                return Ok(TemplateArtifact::new(bytes, TemplateSource::File(path)));
            }
            Ok(_) => debug!("synth"; "template candidate {} is empty", path.display()),
            Err(_) => debug!("synth"; "template candidate {} not found", path.display()),
        }
    }

    if !fallback_shell {
        return Err(SynthError::NoTemplate {
            output: output.to_path_buf(),
            candidates: candidates.to_vec(),
        });
    }

    log!("degraded"; "no template artifact in {}, using embedded shell", output.display());
    let html = SHELL_HTML.render(&ShellVars { title });
    Ok(TemplateArtifact::new(html.into_bytes(), TemplateSource::Embedded))
}
