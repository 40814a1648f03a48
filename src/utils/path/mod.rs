//! Path utilities.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `resolve_in_root`)

pub mod fs;

pub use fs::{normalize_path, relative_display, resolve_in_root};
