//! Small helpers shared by the commands.

pub mod date;
pub mod hash;
pub mod html;
pub mod mime;
pub mod path;

/// Return "s" suffix for plural counts
///
/// - `plural_s(0)` -> `"s"` (0 files)
/// - `plural_s(1)` -> `""` (1 file)
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization
///
/// - `plural_count(1, "entity")` -> `"1 entity"`
/// - `plural_count(3, "artifact")` -> `"3 artifacts"`
///
/// Nouns ending in `y` after a consonant take `ies`.
pub fn plural_count(count: usize, noun: &str) -> String {
    if count == 1 {
        return format!("{count} {noun}");
    }
    match noun.strip_suffix('y') {
        Some(stem) if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) => format!("{count} {stem}ies"),
        _ => format!("{count} {noun}s"),
    }
}
