//! Append-only JSON lines audit log of slug repairs.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::core::ContentType;
use crate::utils::date::DateTimeUtc;

#[derive(Debug, Serialize)]
pub struct AuditEntry<'a> {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub id: &'a str,
    pub before: Option<&'a str>,
    pub after: &'a str,
    pub applied: bool,
}

impl<'a> AuditEntry<'a> {
    pub fn new(
        content_type: ContentType,
        id: &'a str,
        before: Option<&'a str>,
        after: &'a str,
        applied: bool,
    ) -> Self {
        Self {
            timestamp: DateTimeUtc::now().to_rfc3339(),
            content_type,
            id,
            before,
            after,
            applied,
        }
    }
}

/// Append one line per entry, creating the log and its directory on demand.
pub fn append(path: &Path, entries: &[AuditEntry<'_>]) -> io::Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut buf = String::new();
    for entry in entries {
        buf.push_str(&serde_json::to_string(entry)?);
        buf.push('\n');
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(buf.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_append_jsonl() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".catalog/repair-audit.jsonl");

        append(
            &path,
            &[AuditEntry::new(ContentType::Brand, "b1", Some("Intel Corp"), "intel-corp", false)],
        )
        .unwrap();
        append(
            &path,
            &[AuditEntry::new(ContentType::Brand, "b1", Some("Intel Corp"), "intel-corp", true)],
        )
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "brand");
        assert_eq!(lines[0]["before"], "Intel Corp");
        assert_eq!(lines[0]["applied"], false);
        assert_eq!(lines[1]["applied"], true);
        assert!(lines[1]["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_append_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.jsonl");
        append(&path, &[]).unwrap();
        assert!(!path.exists());
    }
}
