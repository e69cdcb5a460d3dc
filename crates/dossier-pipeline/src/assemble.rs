//! Fan-in of extraction unit outcomes into one `ExtractionDocument`.
//!
//! [`assemble`] is a pure reduction over the outcome set. Successful
//! criterion units are folded in criterion order, not arrival order, so any
//! permutation of the same outcomes yields the same document. Criteria
//! without a successful unit get an empty `None` summary.

use std::fmt;

use dossier_core::entities::{Background, CriterionSummary, CriterionUnitOutput, ExtractionDocument};
use dossier_core::enums::Criterion;
use serde::Serialize;

/// One independently dispatched unit of extraction work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionUnit {
    Criterion(Criterion),
    Background,
}

impl ExtractionUnit {
    /// Every unit an extraction run dispatches: ten criteria, then background.
    #[must_use]
    pub fn all() -> Vec<Self> {
        Criterion::ALL
            .into_iter()
            .map(Self::Criterion)
            .chain(std::iter::once(Self::Background))
            .collect()
    }
}

impl fmt::Display for ExtractionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Criterion(criterion) => f.write_str(criterion.code()),
            Self::Background => f.write_str("background"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutput {
    Criterion(CriterionUnitOutput),
    Background(Background),
}

/// What one unit produced: a validated output or a failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    Succeeded(UnitOutput),
    Failed { unit: ExtractionUnit, error: String },
}

impl UnitOutcome {
    #[must_use]
    pub const fn unit(&self) -> ExtractionUnit {
        match self {
            Self::Succeeded(UnitOutput::Criterion(output)) => ExtractionUnit::Criterion(output.criterion),
            Self::Succeeded(UnitOutput::Background(_)) => ExtractionUnit::Background,
            Self::Failed { unit, .. } => *unit,
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// A unit that did not contribute to the assembled document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    pub unit: ExtractionUnit,
    pub error: String,
}

/// Reduce unit outcomes into a document. `max_excerpts` caps each
/// criterion summary's evidence list.
#[must_use]
pub fn assemble(outcomes: &[UnitOutcome], max_excerpts: usize) -> ExtractionDocument {
    let mut criterion_outputs: Vec<&CriterionUnitOutput> = Vec::new();
    let mut background: Option<&Background> = None;
    for outcome in outcomes {
        match outcome {
            UnitOutcome::Succeeded(UnitOutput::Criterion(output)) => criterion_outputs.push(output),
            UnitOutcome::Succeeded(UnitOutput::Background(b)) => background = Some(b),
            UnitOutcome::Failed { .. } => {}
        }
    }
    criterion_outputs.sort_by_key(|output| output.criterion.ordinal());

    let mut document = ExtractionDocument {
        background: background.cloned().unwrap_or_default(),
        ..ExtractionDocument::default()
    };
    let mut summaries: Vec<Option<CriterionSummary>> = vec![None; Criterion::ALL.len()];

    for output in criterion_outputs {
        let slot = &mut summaries[output.criterion.ordinal()];
        if slot.is_some() {
            continue;
        }
        let mut evidence = output.evidence.clone();
        evidence.strip_identities();
        evidence.tag_all(output.criterion);
        document.evidence.absorb(evidence);

        let mut summary = output.summary.clone();
        summary.criterion = output.criterion;
        summary.truncate_evidence(max_excerpts);
        *slot = Some(summary);
    }

    document.criteria_summary = Criterion::ALL
        .into_iter()
        .zip(summaries)
        .map(|(criterion, summary)| summary.unwrap_or_else(|| CriterionSummary::empty(criterion)))
        .collect();
    document.evidence.assign_missing_identities();
    document
}

/// Failures among `outcomes`, in unit order.
#[must_use]
pub fn failures(outcomes: &[UnitOutcome]) -> Vec<UnitFailure> {
    let mut failed: Vec<UnitFailure> = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            UnitOutcome::Failed { unit, error } => Some(UnitFailure {
                unit: *unit,
                error: error.clone(),
            }),
            UnitOutcome::Succeeded(_) => None,
        })
        .collect();
    failed.sort_by_key(|f| f.unit);
    failed
}

// ---------------------------------------------------------------------------
// Progressive mode
// ---------------------------------------------------------------------------

/// Re-assembles after every settled unit so callers can display partial
/// results. The final snapshot equals [`assemble`] over all outcomes.
#[derive(Debug)]
pub struct ProgressiveAssembler {
    outcomes: Vec<UnitOutcome>,
    total: usize,
    max_excerpts: usize,
}

impl ProgressiveAssembler {
    #[must_use]
    pub const fn new(total: usize, max_excerpts: usize) -> Self {
        Self {
            outcomes: Vec::new(),
            total,
            max_excerpts,
        }
    }

    /// Record one outcome and return the snapshot over everything so far.
    pub fn push(&mut self, outcome: UnitOutcome) -> ExtractionDocument {
        self.outcomes.push(outcome);
        self.snapshot()
    }

    #[must_use]
    pub fn snapshot(&self) -> ExtractionDocument {
        assemble(&self.outcomes, self.max_excerpts)
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn outcomes(&self) -> &[UnitOutcome] {
        &self.outcomes
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use dossier_core::entities::{Award, EvidenceCollections, Publication};
    use dossier_core::enums::Strength;
    use pretty_assertions::assert_eq;

    use super::*;

    fn summary(criterion: Criterion, strength: Strength, excerpts: usize) -> CriterionSummary {
        CriterionSummary {
            criterion,
            evidence_count: u32::try_from(excerpts).unwrap(),
            strength,
            reason: format!("{} looks {strength}", criterion.code()),
            evidence: (0..excerpts).map(|i| format!("excerpt {i}")).collect(),
        }
    }

    fn publication(title: &str, year: i32) -> Publication {
        Publication {
            title: title.into(),
            venue: Some("NeurIPS".into()),
            year: Some(year),
            ..Default::default()
        }
    }

    fn unit(criterion: Criterion, evidence: EvidenceCollections) -> UnitOutcome {
        UnitOutcome::Succeeded(UnitOutput::Criterion(CriterionUnitOutput {
            criterion,
            evidence,
            summary: summary(criterion, Strength::Weak, 1),
        }))
    }

    fn failed(criterion: Criterion) -> UnitOutcome {
        UnitOutcome::Failed {
            unit: ExtractionUnit::Criterion(criterion),
            error: "schema validation failed".into(),
        }
    }

    fn ten_units_with_failures(failing: &[Criterion]) -> Vec<UnitOutcome> {
        Criterion::ALL
            .into_iter()
            .map(|criterion| {
                if failing.contains(&criterion) {
                    failed(criterion)
                } else {
                    unit(criterion, EvidenceCollections::default())
                }
            })
            .collect()
    }

    #[test]
    fn failed_units_get_empty_none_summaries() {
        let outcomes =
            ten_units_with_failures(&[Criterion::PublishedMaterial, Criterion::Exhibitions]);
        let document = assemble(&outcomes, 5);

        assert_eq!(document.criteria_summary.len(), 10);
        for criterion in [Criterion::PublishedMaterial, Criterion::Exhibitions] {
            let s = document.summary_for(criterion).unwrap();
            assert_eq!(s.evidence_count, 0);
            assert_eq!(s.strength, Strength::None);
        }
        let populated = document
            .criteria_summary
            .iter()
            .filter(|s| s.strength == Strength::Weak)
            .count();
        assert_eq!(populated, 8);
        assert_eq!(
            failures(&outcomes)
                .iter()
                .map(|f| f.unit)
                .collect::<Vec<_>>(),
            vec![
                ExtractionUnit::Criterion(Criterion::PublishedMaterial),
                ExtractionUnit::Criterion(Criterion::Exhibitions)
            ]
        );
    }

    #[test]
    fn shared_items_merge_tags_instead_of_duplicating() {
        let scholarly = EvidenceCollections {
            publications: vec![publication("Sparse attention", 2022)],
            ..Default::default()
        };
        let contribution = EvidenceCollections {
            publications: vec![publication("Sparse attention", 2022)],
            ..Default::default()
        };
        let document = assemble(
            &[
                unit(Criterion::OriginalContribution, contribution),
                unit(Criterion::ScholarlyArticles, scholarly),
            ],
            5,
        );

        assert_eq!(document.evidence.publications.len(), 1);
        assert_eq!(
            document.evidence.publications[0].mapped_criteria,
            BTreeSet::from([Criterion::OriginalContribution, Criterion::ScholarlyArticles])
        );
        assert!(
            document.evidence.publications[0]
                .id
                .as_deref()
                .is_some_and(|id| id.starts_with("pub-"))
        );
    }

    #[test]
    fn every_arrival_order_assembles_identically() {
        let outcomes = vec![
            unit(
                Criterion::Awards,
                EvidenceCollections {
                    awards: vec![Award {
                        id: Some("model-made-up".into()),
                        name: "Gold Medal".into(),
                        issuer: Some("IEEE".into()),
                        year: Some(2020),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
            ),
            unit(
                Criterion::ScholarlyArticles,
                EvidenceCollections {
                    publications: vec![publication("Paper A", 2021), publication("Paper B", 2023)],
                    ..Default::default()
                },
            ),
            unit(
                Criterion::OriginalContribution,
                EvidenceCollections {
                    publications: vec![publication("Paper B", 2023)],
                    ..Default::default()
                },
            ),
            failed(Criterion::Judging),
        ];
        let expected = assemble(&outcomes, 5);

        // All 24 permutations of four outcomes.
        let mut indices = [0usize, 1, 2, 3];
        let mut permutations = vec![indices];
        while next_permutation(&mut indices) {
            permutations.push(indices);
        }
        assert_eq!(permutations.len(), 24);

        for order in permutations {
            let shuffled: Vec<UnitOutcome> = order.iter().map(|&i| outcomes[i].clone()).collect();
            assert_eq!(assemble(&shuffled, 5), expected, "order {order:?}");
        }
        assert!(
            expected.evidence.awards[0]
                .id
                .as_deref()
                .is_some_and(|id| id.starts_with("awd-"))
        );
    }

    fn next_permutation(items: &mut [usize]) -> bool {
        let Some(pivot) = items.windows(2).rposition(|w| w[0] < w[1]) else {
            return false;
        };
        let Some(swap) = items.iter().rposition(|&x| x > items[pivot]) else {
            return false;
        };
        items.swap(pivot, swap);
        items[pivot + 1..].reverse();
        true
    }

    #[test]
    fn summary_criterion_comes_from_the_unit() {
        let output = CriterionUnitOutput {
            criterion: Criterion::Judging,
            evidence: EvidenceCollections::default(),
            summary: summary(Criterion::Awards, Strength::Strong, 8),
        };
        let document = assemble(&[UnitOutcome::Succeeded(UnitOutput::Criterion(output))], 5);

        let judging = document.summary_for(Criterion::Judging).unwrap();
        assert_eq!(judging.strength, Strength::Strong);
        assert_eq!(judging.evidence.len(), 5);
        assert_eq!(document.summary_for(Criterion::Awards).unwrap().strength, Strength::None);
    }

    #[test]
    fn progressive_final_snapshot_matches_batch() {
        let mut outcomes = ten_units_with_failures(&[Criterion::HighRemuneration]);
        outcomes.push(UnitOutcome::Succeeded(UnitOutput::Background(Background::default())));
        let batch = assemble(&outcomes, 5);

        let mut progressive = ProgressiveAssembler::new(outcomes.len(), 5);
        let mut last = ExtractionDocument::default();
        for outcome in outcomes.iter().rev().cloned() {
            last = progressive.push(outcome);
        }
        assert_eq!(progressive.completed(), progressive.total());
        assert_eq!(last, batch);
    }

    #[test]
    fn partial_snapshot_already_has_ten_summaries() {
        let mut progressive = ProgressiveAssembler::new(11, 5);
        let snapshot = progressive.push(unit(Criterion::LeadingRole, EvidenceCollections::default()));
        assert_eq!(snapshot.criteria_summary.len(), 10);
        assert_eq!(snapshot.strong_count(), 0);
        assert_eq!(
            snapshot.summary_for(Criterion::LeadingRole).unwrap().strength,
            Strength::Weak
        );
    }

    #[test]
    fn unit_listing_covers_criteria_and_background() {
        let units = ExtractionUnit::all();
        assert_eq!(units.len(), 11);
        assert_eq!(units[10], ExtractionUnit::Background);
        assert_eq!(units[2].to_string(), "C3");
    }
}
