//! Content digests.
//!
//! `blake3` digests are used wherever the engine needs to know whether two
//! byte sequences are identical without keeping both around: the redirect
//! rules copy and the template fingerprint in the artifact manifest.

use std::fs;
use std::io;
use std::path::Path;

/// Hex-encoded blake3 digest of `data`.
#[inline]
pub fn digest<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    hex::encode(blake3::hash(data.as_ref()).as_bytes())
}

/// Digest of a file's content, `None` if the file cannot be read.
pub fn digest_file(path: &Path) -> io::Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(digest(&bytes))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Short 8-char fingerprint for log lines.
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    digest(data)[..8].to_string()
}
