use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Criterion, EvidenceCategory};
use crate::identity::item_identity;

/// Behaviour shared by every evidence item struct.
///
/// `key_fields` is the small category-specific subset hashed into the
/// identity token; every other field is descriptive only.
pub trait EvidenceItem {
    const CATEGORY: EvidenceCategory;

    fn key_fields(&self) -> Vec<String>;
    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: String);
    fn mapped_criteria(&self) -> &BTreeSet<Criterion>;
    fn mapped_criteria_mut(&mut self) -> &mut BTreeSet<Criterion>;

    /// Identity computed from the key fields, ignoring any stored token.
    fn computed_identity(&self) -> String {
        item_identity(Self::CATEGORY, &self.key_fields())
    }

    /// Assign the content-hash identity if the item has none. Returns the token.
    fn ensure_identity(&mut self) -> String {
        if let Some(id) = self.id().filter(|id| !id.is_empty()) {
            return id.to_string();
        }
        let id = self.computed_identity();
        self.set_id(id.clone());
        id
    }
}

/// Render a key field as text for hashing.
trait KeyPart {
    fn key_part(&self) -> String;
}

impl KeyPart for String {
    fn key_part(&self) -> String {
        self.clone()
    }
}

impl KeyPart for Option<String> {
    fn key_part(&self) -> String {
        self.clone().unwrap_or_default()
    }
}

impl KeyPart for Option<i32> {
    fn key_part(&self) -> String {
        self.map(|v| v.to_string()).unwrap_or_default()
    }
}

macro_rules! evidence_item {
    ($ty:ty, $category:expr, [$($field:ident),+ $(,)?]) => {
        impl EvidenceItem for $ty {
            const CATEGORY: EvidenceCategory = $category;

            fn key_fields(&self) -> Vec<String> {
                vec![$(self.$field.key_part()),+]
            }

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn set_id(&mut self, id: String) {
                self.id = Some(id);
            }

            fn mapped_criteria(&self) -> &BTreeSet<Criterion> {
                &self.mapped_criteria
            }

            fn mapped_criteria_mut(&mut self) -> &mut BTreeSet<Criterion> {
                &mut self.mapped_criteria
            }
        }
    };
}

/// A prize or award received by the applicant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Award {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    /// National, international, institutional, ...
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mapped_criteria: BTreeSet<Criterion>,
}

/// A scholarly or professional publication authored by the applicant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Publication {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub citations: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mapped_criteria: BTreeSet<Criterion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Membership {
    #[serde(default)]
    pub id: Option<String>,
    pub organization: String,
    #[serde(default)]
    pub role: Option<String>,
    /// What the association requires of its members.
    #[serde(default)]
    pub admission_requirements: Option<String>,
    #[serde(default)]
    pub since_year: Option<i32>,
    #[serde(default)]
    pub mapped_criteria: BTreeSet<Criterion>,
}

/// Published material about the applicant in press or trade media.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MediaMention {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub outlet: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mapped_criteria: BTreeSet<Criterion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct JudgingActivity {
    #[serde(default)]
    pub id: Option<String>,
    pub event: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mapped_criteria: BTreeSet<Criterion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Grant {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub funder: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub mapped_criteria: BTreeSet<Criterion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LeadershipRole {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub end_year: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mapped_criteria: BTreeSet<Criterion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompensationRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub employer: String,
    #[serde(default)]
    pub year: Option<i32>,
    /// Amount as stated in the source, e.g. `"USD 310,000"`.
    #[serde(default)]
    pub amount: Option<String>,
    /// Comparison against field or regional benchmarks, if given.
    #[serde(default)]
    pub benchmark: Option<String>,
    #[serde(default)]
    pub mapped_criteria: BTreeSet<Criterion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Exhibition {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mapped_criteria: BTreeSet<Criterion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CommercialSuccess {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    /// Box office, sales, streams, ...
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mapped_criteria: BTreeSet<Criterion>,
}

/// Free-form contribution of major significance to the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OriginalContribution {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub mapped_criteria: BTreeSet<Criterion>,
}

evidence_item!(Award, EvidenceCategory::Award, [name, issuer, year]);
evidence_item!(Publication, EvidenceCategory::Publication, [title, venue, year]);
evidence_item!(Membership, EvidenceCategory::Membership, [organization, role]);
evidence_item!(MediaMention, EvidenceCategory::MediaMention, [title, outlet, date]);
evidence_item!(
    JudgingActivity,
    EvidenceCategory::JudgingActivity,
    [event, organization, year]
);
evidence_item!(Grant, EvidenceCategory::Grant, [title, funder, year]);
evidence_item!(
    LeadershipRole,
    EvidenceCategory::LeadershipRole,
    [title, organization]
);
evidence_item!(
    CompensationRecord,
    EvidenceCategory::CompensationRecord,
    [employer, year, amount]
);
evidence_item!(Exhibition, EvidenceCategory::Exhibition, [title, venue, year]);
evidence_item!(
    CommercialSuccess,
    EvidenceCategory::CommercialSuccess,
    [title, metric]
);
evidence_item!(
    OriginalContribution,
    EvidenceCategory::OriginalContribution,
    [title, description]
);

/// Every evidence collection of a case, one vector per category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EvidenceCollections {
    #[serde(default)]
    pub awards: Vec<Award>,
    #[serde(default)]
    pub publications: Vec<Publication>,
    #[serde(default)]
    pub memberships: Vec<Membership>,
    #[serde(default)]
    pub media_mentions: Vec<MediaMention>,
    #[serde(default)]
    pub judging_activities: Vec<JudgingActivity>,
    #[serde(default)]
    pub grants: Vec<Grant>,
    #[serde(default)]
    pub leadership_roles: Vec<LeadershipRole>,
    #[serde(default)]
    pub compensation_records: Vec<CompensationRecord>,
    #[serde(default)]
    pub exhibitions: Vec<Exhibition>,
    #[serde(default)]
    pub commercial_successes: Vec<CommercialSuccess>,
    #[serde(default)]
    pub original_contributions: Vec<OriginalContribution>,
}

/// Append `incoming` items to `target`, collapsing items that share an
/// identity: the first occurrence is kept and later duplicates only
/// contribute their mapped criteria.
pub fn merge_items<T: EvidenceItem>(target: &mut Vec<T>, incoming: Vec<T>) {
    for mut item in incoming {
        let id = item.ensure_identity();
        match target.iter_mut().find(|existing| existing.id() == Some(id.as_str())) {
            Some(existing) => {
                let tags = item.mapped_criteria().clone();
                existing.mapped_criteria_mut().extend(tags);
            }
            None => target.push(item),
        }
    }
}

fn assign_identities<T: EvidenceItem>(items: &mut [T]) -> usize {
    let mut assigned = 0;
    for item in items {
        if item.id().is_none_or(str::is_empty) {
            item.ensure_identity();
            assigned += 1;
        }
    }
    assigned
}

impl EvidenceCollections {
    /// Merge another set of collections into this one (dedup + tag union).
    pub fn absorb(&mut self, other: Self) {
        merge_items(&mut self.awards, other.awards);
        merge_items(&mut self.publications, other.publications);
        merge_items(&mut self.memberships, other.memberships);
        merge_items(&mut self.media_mentions, other.media_mentions);
        merge_items(&mut self.judging_activities, other.judging_activities);
        merge_items(&mut self.grants, other.grants);
        merge_items(&mut self.leadership_roles, other.leadership_roles);
        merge_items(&mut self.compensation_records, other.compensation_records);
        merge_items(&mut self.exhibitions, other.exhibitions);
        merge_items(&mut self.commercial_successes, other.commercial_successes);
        merge_items(&mut self.original_contributions, other.original_contributions);
    }

    /// Assign identities to every item still missing one. Returns how many
    /// tokens were assigned.
    pub fn assign_missing_identities(&mut self) -> usize {
        assign_identities(&mut self.awards)
            + assign_identities(&mut self.publications)
            + assign_identities(&mut self.memberships)
            + assign_identities(&mut self.media_mentions)
            + assign_identities(&mut self.judging_activities)
            + assign_identities(&mut self.grants)
            + assign_identities(&mut self.leadership_roles)
            + assign_identities(&mut self.compensation_records)
            + assign_identities(&mut self.exhibitions)
            + assign_identities(&mut self.commercial_successes)
            + assign_identities(&mut self.original_contributions)
    }

    /// Drop any identity tokens carried in from outside so they are
    /// recomputed from key fields.
    pub fn strip_identities(&mut self) {
        fn strip<T: EvidenceItem>(items: &mut [T]) {
            for item in items {
                item.set_id(String::new());
            }
        }
        strip(&mut self.awards);
        strip(&mut self.publications);
        strip(&mut self.memberships);
        strip(&mut self.media_mentions);
        strip(&mut self.judging_activities);
        strip(&mut self.grants);
        strip(&mut self.leadership_roles);
        strip(&mut self.compensation_records);
        strip(&mut self.exhibitions);
        strip(&mut self.commercial_successes);
        strip(&mut self.original_contributions);
    }

    /// Tag every item in these collections as supporting `criterion`.
    pub fn tag_all(&mut self, criterion: Criterion) {
        fn tag<T: EvidenceItem>(items: &mut [T], criterion: Criterion) {
            for item in items {
                item.mapped_criteria_mut().insert(criterion);
            }
        }
        tag(&mut self.awards, criterion);
        tag(&mut self.publications, criterion);
        tag(&mut self.memberships, criterion);
        tag(&mut self.media_mentions, criterion);
        tag(&mut self.judging_activities, criterion);
        tag(&mut self.grants, criterion);
        tag(&mut self.leadership_roles, criterion);
        tag(&mut self.compensation_records, criterion);
        tag(&mut self.exhibitions, criterion);
        tag(&mut self.commercial_successes, criterion);
        tag(&mut self.original_contributions, criterion);
    }

    /// Total number of items across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.awards.len()
            + self.publications.len()
            + self.memberships.len()
            + self.media_mentions.len()
            + self.judging_activities.len()
            + self.grants.len()
            + self.leadership_roles.len()
            + self.compensation_records.len()
            + self.exhibitions.len()
            + self.commercial_successes.len()
            + self.original_contributions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every identity token currently present, sorted.
    #[must_use]
    pub fn identities(&self) -> Vec<String> {
        fn ids<T: EvidenceItem>(items: &[T], out: &mut Vec<String>) {
            out.extend(items.iter().filter_map(|i| i.id().map(String::from)));
        }
        let mut out = Vec::with_capacity(self.len());
        ids(&self.awards, &mut out);
        ids(&self.publications, &mut out);
        ids(&self.memberships, &mut out);
        ids(&self.media_mentions, &mut out);
        ids(&self.judging_activities, &mut out);
        ids(&self.grants, &mut out);
        ids(&self.leadership_roles, &mut out);
        ids(&self.compensation_records, &mut out);
        ids(&self.exhibitions, &mut out);
        ids(&self.commercial_successes, &mut out);
        ids(&self.original_contributions, &mut out);
        out.sort_unstable();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn publication(title: &str, tags: &[Criterion]) -> Publication {
        Publication {
            title: title.into(),
            venue: Some("Nature".into()),
            year: Some(2022),
            mapped_criteria: tags.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn ensure_identity_is_idempotent() {
        let mut item = publication("Protein folding", &[]);
        let first = item.ensure_identity();
        let second = item.ensure_identity();
        assert_eq!(first, second);
        assert_eq!(item.id.as_deref(), Some(first.as_str()));
    }

    #[test]
    fn ensure_identity_keeps_existing_token() {
        let mut item = publication("Protein folding", &[]);
        item.id = Some("pub-custom".into());
        assert_eq!(item.ensure_identity(), "pub-custom");
    }

    #[test]
    fn descriptive_fields_do_not_affect_identity() {
        let mut a = publication("Protein folding", &[]);
        let mut b = publication("Protein folding", &[]);
        b.citations = Some(1200);
        b.authors = vec!["A. Author".into()];
        assert_eq!(a.ensure_identity(), b.ensure_identity());
    }

    #[test]
    fn merge_items_unions_mapped_criteria() {
        let mut target = vec![publication("Protein folding", &[Criterion::ScholarlyArticles])];
        merge_items(
            &mut target,
            vec![
                publication("Protein folding", &[Criterion::OriginalContribution]),
                publication("Enzyme kinetics", &[Criterion::ScholarlyArticles]),
            ],
        );

        assert_eq!(target.len(), 2);
        let tags: Vec<Criterion> = target[0].mapped_criteria.iter().copied().collect();
        assert_eq!(
            tags,
            vec![Criterion::OriginalContribution, Criterion::ScholarlyArticles]
        );
    }

    #[test]
    fn absorb_and_assign_identities() {
        let mut aggregate = EvidenceCollections::default();
        let mut partial = EvidenceCollections {
            awards: vec![Award {
                name: "Gold Medal".into(),
                issuer: Some("Royal Society".into()),
                year: Some(2020),
                ..Default::default()
            }],
            ..Default::default()
        };
        partial.tag_all(Criterion::Awards);
        aggregate.absorb(partial.clone());
        aggregate.absorb(partial);

        assert_eq!(aggregate.len(), 1);
        assert_eq!(aggregate.assign_missing_identities(), 0);
        assert!(aggregate.awards[0].id.as_deref().unwrap().starts_with("awd-"));
        assert!(aggregate.awards[0].mapped_criteria.contains(&Criterion::Awards));
    }

    #[test]
    fn assign_missing_identities_counts_assignments() {
        let mut collections = EvidenceCollections {
            grants: vec![
                Grant {
                    title: "NSF CAREER".into(),
                    ..Default::default()
                },
                Grant {
                    id: Some("grt-preassigned".into()),
                    title: "ERC Starting".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(collections.assign_missing_identities(), 1);
        assert_eq!(collections.identities().len(), 2);
    }

    #[test]
    fn stripped_identities_are_recomputed_from_key_fields() {
        let mut collections = EvidenceCollections {
            publications: vec![Publication {
                id: Some("pub-spoofed".into()),
                ..publication("Protein folding", &[])
            }],
            ..Default::default()
        };
        collections.strip_identities();
        assert_eq!(collections.assign_missing_identities(), 1);
        assert_eq!(
            collections.publications[0].id.as_deref(),
            Some(publication("Protein folding", &[]).computed_identity().as_str())
        );
    }
}
