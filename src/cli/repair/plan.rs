//! Repair plan: what the slug policy would change, and what it must not.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::content::Entity;
use crate::core::ContentType;
use crate::slug::SlugPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RepairAction {
    /// Rewrite the slug.
    Rename { after: String },
    /// Nothing usable to repair from; an editor has to author a slug.
    NeedsManual,
    /// The repaired slug would collide within its scope.
    Refused {
        after: String,
        conflicts: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairItem {
    pub id: String,
    pub before: Option<String>,
    #[serde(flatten)]
    pub action: RepairAction,
}

#[derive(Debug, Clone)]
pub struct RepairPlan {
    pub content_type: ContentType,
    /// Sorted by id.
    pub items: Vec<RepairItem>,
}

/// `(brand scope, lower-cased slug)`, matching the validator's grouping.
type ScopeKey = (Option<String>, String);

impl RepairPlan {
    /// Plan repairs for every entity the policy does not accept.
    ///
    /// Entities keep their slug unless renamed, so a proposal is refused when
    /// any other entity of the scope would end up with the same slug.
    pub fn build(content_type: ContentType, entities: &[Entity], policy: SlugPolicy) -> Self {
        let mut items = Vec::new();
        let mut proposals = Vec::new();
        let mut finals: BTreeMap<ScopeKey, Vec<String>> = BTreeMap::new();

        for entity in entities {
            let scope = scope_of(entity);
            let raw = entity.raw_slug();
            match policy.repair(raw) {
                Some(after) if raw == Some(after.as_str()) => {
                    finals
                        .entry((scope, after.to_lowercase()))
                        .or_default()
                        .push(entity.id().to_string());
                }
                Some(after) => {
                    finals
                        .entry((scope.clone(), after.to_lowercase()))
                        .or_default()
                        .push(entity.id().to_string());
                    proposals.push((entity, scope, after));
                }
                None => {
                    let record = entity.slug_record();
                    if record.is_routable() {
                        finals
                            .entry((scope, record.cleaned.to_lowercase()))
                            .or_default()
                            .push(entity.id().to_string());
                    }
                    items.push(RepairItem {
                        id: entity.id().to_string(),
                        before: raw.map(str::to_string),
                        action: RepairAction::NeedsManual,
                    });
                }
            }
        }

        for (entity, scope, after) in proposals {
            let id = entity.id();
            let mut conflicts: Vec<String> = finals
                .get(&(scope, after.to_lowercase()))
                .into_iter()
                .flatten()
                .filter(|other| *other != id)
                .cloned()
                .collect();
            conflicts.sort();
            conflicts.dedup();

            let action = if conflicts.is_empty() {
                RepairAction::Rename { after }
            } else {
                RepairAction::Refused { after, conflicts }
            };
            items.push(RepairItem {
                id: id.to_string(),
                before: entity.raw_slug().map(str::to_string),
                action,
            });
        }

        items.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            content_type,
            items,
        }
    }

    /// `(id, new slug)` pairs to write.
    pub fn updates(&self) -> Vec<(String, String)> {
        self.items
            .iter()
            .filter_map(|item| match &item.action {
                RepairAction::Rename { after } => Some((item.id.clone(), after.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&RepairAction) -> bool) -> usize {
        self.items.iter().filter(|i| pred(&i.action)).count()
    }

    pub fn renames(&self) -> usize {
        self.count(|a| matches!(a, RepairAction::Rename { .. }))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn scope_of(entity: &Entity) -> Option<String> {
    entity
        .content_type()
        .is_brand_scoped()
        .then(|| entity.brand_ref().map(str::to_string))
        .flatten()
}
