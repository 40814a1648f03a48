//! Redirect rules copy into the output root.

use std::fs;
use std::path::{Path, PathBuf};

use super::SynthError;
use crate::utils::hash::digest_file;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectCopy {
    Copied(PathBuf),
    /// Destination already byte-identical.
    Unchanged(PathBuf),
    /// No rules file to copy.
    MissingSource,
}

/// Copy `source` into `output` under the same file name.
pub fn copy_redirects(source: &Path, output: &Path) -> Result<RedirectCopy, SynthError> {
    let Some(name) = source.file_name() else {
        return Ok(RedirectCopy::MissingSource);
    };
    let io_err = |path: &Path, e| SynthError::Io(path.to_path_buf(), e);

    let Some(src_digest) = digest_file(source).map_err(|e| io_err(source, e))? else {
        return Ok(RedirectCopy::MissingSource);
    };

    let dest = output.join(name);
    if digest_file(&dest).map_err(|e| io_err(&dest, e))? == Some(src_digest) {
        return Ok(RedirectCopy::Unchanged(dest));
    }

    fs::create_dir_all(output).map_err(|e| io_err(output, e))?;
    fs::copy(source, &dest).map_err(|e| io_err(&dest, e))?;
    Ok(RedirectCopy::Copied(dest))
}
