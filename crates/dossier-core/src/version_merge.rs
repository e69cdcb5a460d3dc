//! Upgrade-only merge of criterion updates onto an analysis version.
//!
//! The rules:
//! - Strength becomes `max(existing, proposed)` by rank; it never drops.
//! - The reason is replaced when the proposal ranks at least as high as the
//!   existing strength, and kept otherwise.
//! - Evidence excerpts are a case-sensitive set union: existing order is
//!   preserved, unseen excerpts are appended.
//! - Criteria without an update pass through unchanged; criteria missing from
//!   the previous version are seeded at `None`.
//!
//! Output is always all ten criteria in canonical order.

use crate::entities::{CriterionAssessment, CriterionSummary, CriterionUpdate};
use crate::enums::{Criterion, Strength};

/// All ten criteria at `None` with no reason or evidence.
#[must_use]
pub fn seed_assessments() -> Vec<CriterionAssessment> {
    Criterion::ALL
        .into_iter()
        .map(CriterionAssessment::seed)
        .collect()
}

/// Canonical-order copy of `existing`, seeding any missing criterion. When a
/// criterion appears more than once, the first entry wins.
#[must_use]
pub fn normalize(existing: &[CriterionAssessment]) -> Vec<CriterionAssessment> {
    Criterion::ALL
        .into_iter()
        .map(|criterion| {
            existing
                .iter()
                .find(|a| a.criterion == criterion)
                .cloned()
                .unwrap_or_else(|| CriterionAssessment::seed(criterion))
        })
        .collect()
}

/// Append excerpts from `incoming` that are not already in `existing`.
pub fn merge_evidence(existing: &mut Vec<String>, incoming: &[String]) {
    for excerpt in incoming {
        if !existing.iter().any(|e| e == excerpt) {
            existing.push(excerpt.clone());
        }
    }
}

/// Apply one update to one assessment in place.
pub fn apply_update(assessment: &mut CriterionAssessment, update: &CriterionUpdate) {
    if update.strength.rank() >= assessment.strength.rank() {
        assessment.reason.clone_from(&update.reason);
    }
    assessment.strength = assessment.strength.upgrade(update.strength);
    merge_evidence(&mut assessment.evidence, &update.evidence);
}

/// Merge a batch of updates onto the previous criteria set.
///
/// Updates targeting the same criterion are applied in the order given.
#[must_use]
pub fn apply_updates(
    previous: &[CriterionAssessment],
    updates: &[CriterionUpdate],
) -> Vec<CriterionAssessment> {
    let mut merged = normalize(previous);
    for update in updates {
        let assessment = &mut merged[update.criterion.ordinal()];
        apply_update(assessment, update);
    }
    merged
}

/// `(strong, weak)` counts for a criteria set.
#[must_use]
pub fn strength_counts(criteria: &[CriterionAssessment]) -> (u32, u32) {
    criteria
        .iter()
        .fold((0, 0), |(strong, weak), a| match a.strength {
            Strength::Strong => (strong + 1, weak),
            Strength::Weak => (strong, weak + 1),
            Strength::None => (strong, weak),
        })
}

/// Fresh criteria set built from extraction summaries. This is a reset, not
/// an upgrade: it does not look at any previous version.
#[must_use]
pub fn snapshot_from_summaries(summaries: &[CriterionSummary]) -> Vec<CriterionAssessment> {
    let assessments: Vec<CriterionAssessment> = summaries
        .iter()
        .map(|s| CriterionAssessment {
            criterion: s.criterion,
            strength: s.strength,
            reason: s.reason.clone(),
            evidence: s.evidence.clone(),
        })
        .collect();
    normalize(&assessments)
}

/// Convert extraction summaries into updates for the upgrade-only path.
#[must_use]
pub fn updates_from_summaries(summaries: &[CriterionSummary]) -> Vec<CriterionUpdate> {
    summaries
        .iter()
        .map(|s| CriterionUpdate {
            criterion: s.criterion,
            strength: s.strength,
            reason: s.reason.clone(),
            evidence: s.evidence.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn update(criterion: Criterion, strength: Strength, evidence: &[&str]) -> CriterionUpdate {
        CriterionUpdate {
            criterion,
            strength,
            reason: format!("proposed {strength}"),
            evidence: evidence.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn seed_has_all_ten_at_none() {
        let seed = seed_assessments();
        assert_eq!(seed.len(), 10);
        assert!(seed.iter().all(|a| a.strength == Strength::None));
        assert_eq!(seed[2].criterion, Criterion::PublishedMaterial);
    }

    #[test]
    fn weak_upgrades_to_strong_with_single_new_excerpt() {
        let mut previous = seed_assessments();
        previous[0].strength = Strength::Weak;
        previous[0].reason = "one regional award".into();
        previous[0].evidence = vec!["Regional prize 2019".into()];

        let merged = apply_updates(
            &previous,
            &[update(
                Criterion::Awards,
                Strength::Strong,
                &["Regional prize 2019", "National medal 2022"],
            )],
        );

        assert_eq!(merged[0].strength, Strength::Strong);
        assert_eq!(merged[0].reason, "proposed Strong");
        assert_eq!(
            merged[0].evidence,
            vec!["Regional prize 2019".to_string(), "National medal 2022".to_string()]
        );
    }

    #[test]
    fn strong_is_never_downgraded() {
        let mut previous = seed_assessments();
        previous[4].strength = Strength::Strong;
        previous[4].reason = "patented method adopted industry-wide".into();

        let merged = apply_updates(
            &previous,
            &[update(Criterion::OriginalContribution, Strength::Weak, &["new memo"])],
        );

        assert_eq!(merged[4].strength, Strength::Strong);
        assert_eq!(merged[4].reason, "patented method adopted industry-wide");
        assert_eq!(merged[4].evidence, vec!["new memo".to_string()]);
    }

    #[test]
    fn equal_strength_replaces_reason() {
        let mut previous = seed_assessments();
        previous[1].strength = Strength::Weak;
        previous[1].reason = "old".into();
        let merged = apply_updates(
            &previous,
            &[update(Criterion::Membership, Strength::Weak, &[])],
        );
        assert_eq!(merged[1].reason, "proposed Weak");
    }

    #[test]
    fn mixed_proposal_sequence_never_lowers_any_criterion() {
        const LEVELS: [Strength; 3] = [Strength::None, Strength::Weak, Strength::Strong];

        let mut current = seed_assessments();
        let mut best = [Strength::None; 10];
        for step in 0..24usize {
            let mut batch = Vec::new();
            for criterion in Criterion::ALL {
                let i = criterion.ordinal();
                let proposed = LEVELS[(step * 7 + i * 5 + step * i) % 3];
                let excerpt = format!("{}-{step}", criterion.code());
                batch.push(update(criterion, proposed, &[excerpt.as_str()]));
                if (step + i) % 4 == 0 {
                    batch.push(update(criterion, Strength::None, &[]));
                }
                best[i] = best[i].upgrade(proposed);
            }

            let next = apply_updates(&current, &batch);
            for (before, after) in current.iter().zip(&next) {
                assert_eq!(before.criterion, after.criterion);
                assert!(
                    after.strength.rank() >= before.strength.rank(),
                    "{} dropped from {} to {} at step {step}",
                    after.criterion,
                    before.strength,
                    after.strength
                );
                assert!(after.evidence.starts_with(&before.evidence));
            }
            current = next;
        }

        let finals: Vec<Strength> = current.iter().map(|a| a.strength).collect();
        assert_eq!(finals, best.to_vec());
        assert!(current.iter().all(|a| a.evidence.len() == 24));
    }

    #[test]
    fn reapplying_update_is_idempotent() {
        let updates = [update(Criterion::Judging, Strength::Weak, &["Reviewer for ICML"])];
        let once = apply_updates(&seed_assessments(), &updates);
        let twice = apply_updates(&once, &updates);
        assert_eq!(once, twice);
        assert_eq!(twice[3].evidence.len(), 1);
    }

    #[test]
    fn evidence_dedup_is_case_sensitive() {
        let mut evidence = vec!["Keynote".to_string()];
        merge_evidence(&mut evidence, &["keynote".into(), "Keynote".into()]);
        assert_eq!(evidence, vec!["Keynote".to_string(), "keynote".to_string()]);
    }

    #[test]
    fn missing_criteria_are_seeded() {
        let partial = vec![CriterionAssessment {
            criterion: Criterion::CommercialSuccess,
            strength: Strength::Strong,
            reason: "box office".into(),
            evidence: vec![],
        }];
        let merged = apply_updates(&partial, &[]);
        assert_eq!(merged.len(), 10);
        assert_eq!(merged[9].strength, Strength::Strong);
        assert!(merged[..9].iter().all(|a| a.strength == Strength::None));
    }

    #[test]
    fn untouched_criteria_pass_through() {
        let mut previous = seed_assessments();
        previous[7].strength = Strength::Weak;
        previous[7].evidence = vec!["CTO at startup".into()];
        let merged = apply_updates(
            &previous,
            &[update(Criterion::Awards, Strength::Strong, &[])],
        );
        assert_eq!(merged[7], previous[7]);
    }

    #[test]
    fn counts_follow_strengths() {
        let mut criteria = seed_assessments();
        criteria[0].strength = Strength::Strong;
        criteria[1].strength = Strength::Strong;
        criteria[2].strength = Strength::Weak;
        assert_eq!(strength_counts(&criteria), (2, 1));
    }

    #[test]
    fn snapshot_resets_to_summaries() {
        let summaries = vec![CriterionSummary {
            criterion: Criterion::ScholarlyArticles,
            evidence_count: 3,
            strength: Strength::Weak,
            reason: "three articles".into(),
            evidence: vec!["Paper A".into()],
        }];
        let snapshot = snapshot_from_summaries(&summaries);
        assert_eq!(snapshot.len(), 10);
        assert_eq!(snapshot[5].strength, Strength::Weak);
        assert_eq!(snapshot[0].strength, Strength::None);
    }
}
