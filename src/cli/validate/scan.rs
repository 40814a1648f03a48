//! Entity scan: per-entity classification and duplicate grouping.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;

use crate::content::{ContentError, ContentRepository, Entity};
use crate::core::ContentType;
use crate::slug::{IssueTag, SlugRecord};

/// One classified entity.
#[derive(Debug, Clone)]
pub struct ScannedEntity {
    pub content_type: ContentType,
    pub id: String,
    pub locale: Option<String>,
    /// Brand reference for brand-scoped types, `None` otherwise.
    pub scope: Option<String>,
    pub record: SlugRecord,
    /// Other ids sharing the cleaned slug within the same scope, sorted.
    pub duplicate_of: Vec<String>,
}

impl ScannedEntity {
    fn classify(entity: &Entity) -> Self {
        let content_type = entity.content_type();
        Self {
            content_type,
            id: entity.id().to_string(),
            locale: entity.locale().map(str::to_string),
            scope: content_type
                .is_brand_scoped()
                .then(|| entity.brand_ref().map(str::to_string))
                .flatten(),
            record: entity.slug_record(),
            duplicate_of: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn issues(&self) -> &[IssueTag] {
        &self.record.issues
    }

    pub fn has_issues(&self) -> bool {
        !self.record.issues.is_empty()
    }
}

/// Duplicate grouping key: `(type, brand scope, cleaned slug)`.
/// The slug part is lower-cased.
type GroupKey = (ContentType, Option<String>, String);

/// Load and classify every entity of `types`.
pub fn scan_entities(
    repo: &impl ContentRepository,
    types: &[ContentType],
) -> Result<Vec<ScannedEntity>, ContentError> {
    let mut scanned = Vec::new();
    for &ty in types {
        let entities = repo.list_entities(ty)?;
        let classified: Vec<ScannedEntity> =
            entities.par_iter().map(ScannedEntity::classify).collect();
        scanned.extend(classified);
    }
    mark_duplicates(&mut scanned);
    Ok(scanned)
}

/// Flag every member of a group with more than one distinct id.
///
/// Entities whose slug cleans to empty never group.
pub fn mark_duplicates(scanned: &mut [ScannedEntity]) {
    let mut groups: BTreeMap<GroupKey, BTreeSet<String>> = BTreeMap::new();
    for entity in scanned.iter().filter(|e| e.record.is_routable()) {
        groups
            .entry(group_key(entity))
            .or_default()
            .insert(entity.id.clone());
    }

    for entity in scanned.iter_mut().filter(|e| e.record.is_routable()) {
        let Some(ids) = groups.get(&group_key(entity)) else {
            continue;
        };
        if ids.len() < 2 {
            continue;
        }
        entity.duplicate_of = ids.iter().filter(|id| **id != entity.id).cloned().collect();
        if !entity.record.issues.contains(&IssueTag::Duplicate) {
            entity.record.issues.push(IssueTag::Duplicate);
        }
    }
}

fn group_key(entity: &ScannedEntity) -> GroupKey {
    (
        entity.content_type,
        entity.scope.clone(),
        entity.record.cleaned.to_lowercase(),
    )
}
