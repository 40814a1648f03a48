//! Slug issue categories and their severity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A slug defect category.
///
/// `classify` produces every tag except [`IssueTag::Duplicate`], which only
/// the validator's grouping pass can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueTag {
    Missing,
    Empty,
    HasExtension,
    HasSpecialChars,
    HasWhitespace,
    HasUpperCase,
    Duplicate,
}

/// Whether an issue blocks deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hard,
    Soft,
}

impl IssueTag {
    /// All categories in report order.
    pub const ALL: [Self; 7] = [
        Self::Missing,
        Self::Empty,
        Self::HasExtension,
        Self::HasSpecialChars,
        Self::HasWhitespace,
        Self::HasUpperCase,
        Self::Duplicate,
    ];

    pub const fn severity(self) -> Severity {
        match self {
            Self::Missing | Self::Empty | Self::Duplicate => Severity::Hard,
            Self::HasExtension | Self::HasSpecialChars | Self::HasWhitespace | Self::HasUpperCase => {
                Severity::Soft
            }
        }
    }

    #[inline]
    pub const fn is_hard(self) -> bool {
        matches!(self.severity(), Severity::Hard)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Empty => "empty",
            Self::HasExtension => "hasExtension",
            Self::HasSpecialChars => "hasSpecialChars",
            Self::HasWhitespace => "hasWhitespace",
            Self::HasUpperCase => "hasUpperCase",
            Self::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for IssueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
