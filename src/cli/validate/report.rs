//! Validation report types and formatting.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;
use serde::Serialize;

use super::scan::ScannedEntity;
use crate::core::ContentType;
use crate::slug::IssueTag;
use crate::utils::{plural_count, plural_s};

/// Issues of a single entity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityIssues {
    pub content_type: ContentType,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub raw: Option<String>,
    pub cleaned: String,
    pub issues: Vec<IssueTag>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub duplicate_of: Vec<String>,
}

impl EntityIssues {
    pub fn has_hard(&self) -> bool {
        self.issues.iter().any(|t| t.is_hard())
    }
}

impl From<ScannedEntity> for EntityIssues {
    fn from(e: ScannedEntity) -> Self {
        Self {
            content_type: e.content_type,
            id: e.id,
            locale: e.locale,
            raw: e.record.raw,
            cleaned: e.record.cleaned,
            issues: e.record.issues,
            duplicate_of: e.duplicate_of,
        }
    }
}

/// Structured outcome of one validation run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Number of entities scanned.
    pub scanned: usize,
    /// Entities per category; every category is present.
    pub counts: BTreeMap<IssueTag, usize>,
    /// Entities with at least one issue, ordered by type then id.
    pub entities: Vec<EntityIssues>,
}

impl ValidationReport {
    pub fn from_scan(scanned: Vec<ScannedEntity>) -> Self {
        let total = scanned.len();
        let mut counts: BTreeMap<IssueTag, usize> =
            IssueTag::ALL.iter().map(|&tag| (tag, 0)).collect();

        let mut entities: Vec<EntityIssues> = scanned
            .into_iter()
            .filter(ScannedEntity::has_issues)
            .map(EntityIssues::from)
            .collect();
        entities.sort_by(|a, b| (a.content_type, &a.id).cmp(&(b.content_type, &b.id)));

        for entity in &entities {
            for tag in &entity.issues {
                *counts.entry(*tag).or_default() += 1;
            }
        }

        Self {
            scanned: total,
            counts,
            entities,
        }
    }

    /// Entities carrying at least one hard issue.
    pub fn hard_count(&self) -> usize {
        self.entities.iter().filter(|e| e.has_hard()).count()
    }

    /// Entities carrying only soft issues.
    pub fn soft_count(&self) -> usize {
        self.entities.len() - self.hard_count()
    }

    /// Whether the report blocks deployment.
    pub fn has_hard_issues(&self) -> bool {
        self.hard_count() > 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Print the full report to stdout, grouped by content type.
    pub fn print(&self) {
        let mut sections: BTreeMap<ContentType, Vec<&EntityIssues>> = BTreeMap::new();
        for entity in &self.entities {
            sections.entry(entity.content_type).or_default().push(entity);
        }

        for (ty, entities) in &sections {
            println!();
            let hard = entities.iter().filter(|e| e.has_hard()).count();
            let header = format!(
                "({}, {} hard)",
                plural_count(entities.len(), "entity"),
                hard
            );
            if hard > 0 {
                println!("{} {}", ty.as_str().red().bold(), header.dimmed());
            } else {
                println!("{} {}", ty.as_str().yellow().bold(), header.dimmed());
            }

            for entity in entities {
                print_entity(entity);
            }
        }

        if !self.entities.is_empty() {
            println!();
            self.print_counts();
        }
    }

    fn print_counts(&self) {
        let parts: Vec<String> = self
            .counts
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(tag, n)| format!("{tag} {n}"))
            .collect();
        println!("{} {}", "counts".dimmed(), parts.join(", "));
    }
}

fn print_entity(entity: &EntityIssues) {
    let raw = match &entity.raw {
        Some(raw) => format!("{raw:?}"),
        None => "<none>".to_string(),
    };
    match &entity.locale {
        Some(locale) => println!(
            "{}{}{} {} {}",
            "[".dimmed(),
            entity.id.cyan(),
            "]".dimmed(),
            locale.dimmed(),
            raw
        ),
        None => println!("{}{}{} {}", "[".dimmed(), entity.id.cyan(), "]".dimmed(), raw),
    }

    for tag in &entity.issues {
        let detail = match tag {
            IssueTag::Duplicate => format!("(with {})", entity.duplicate_of.join(", ")),
            IssueTag::HasExtension | IssueTag::HasWhitespace => {
                format!("(cleans to {:?})", entity.cleaned)
            }
            _ => String::new(),
        };
        let arrow = if tag.is_hard() {
            "→".red().to_string()
        } else {
            "→".yellow().to_string()
        };
        if detail.is_empty() {
            println!("{} {}", arrow, tag);
        } else {
            println!("{} {} {}", arrow, tag, detail.dimmed());
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hard = self.hard_count();
        let soft = self.soft_count();

        if hard == 0 && soft == 0 {
            write!(f, "{}", "all slugs valid".green())
        } else if hard == 0 {
            write!(
                f,
                "{} {} {}",
                "found".dimmed(),
                soft.to_string().yellow().bold(),
                format!("entit{} with warnings only", if soft == 1 { "y" } else { "ies" })
                    .dimmed()
            )
        } else {
            write!(
                f,
                "{} {} {}{}",
                "found".dimmed(),
                hard.to_string().red().bold(),
                format!("entit{} with hard issues", if hard == 1 { "y" } else { "ies" }).dimmed(),
                format!(", {soft} with warning{}", plural_s(soft)).dimmed()
            )
        }
    }
}
