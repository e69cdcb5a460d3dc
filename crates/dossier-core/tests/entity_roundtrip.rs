//! Serde roundtrip and JsonSchema validation tests for model-facing entities.

use std::collections::BTreeSet;

use chrono::Utc;
use schemars::schema_for;
use serde_json::json;

use dossier_core::entities::*;
use dossier_core::enums::*;

fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(recovered, val, "serde roundtrip failed for {}", stringify!($ty));

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    extraction_document_roundtrip,
    ExtractionDocument,
    ExtractionDocument {
        evidence: EvidenceCollections {
            awards: vec![Award {
                id: Some("awd-0a1b2c3d4e5f".into()),
                name: "Turing Fellowship".into(),
                issuer: Some("ACM".into()),
                year: Some(2021),
                scope: Some("international".into()),
                description: None,
                mapped_criteria: BTreeSet::from([Criterion::Awards]),
            }],
            ..Default::default()
        },
        criteria_summary: vec![CriterionSummary {
            criterion: Criterion::Awards,
            evidence_count: 1,
            strength: Strength::Weak,
            reason: "single international award".into(),
            evidence: vec!["Turing Fellowship 2021".into()],
        }],
        background: Background {
            personal_info: PersonalInfo {
                full_name: Some("R. Okafor".into()),
                ..Default::default()
            },
            ..Default::default()
        },
    }
);

roundtrip_and_validate!(
    analysis_version_roundtrip,
    AnalysisVersion,
    AnalysisVersion {
        id: "anv-1f2e3d4c".into(),
        case_id: "case-42".into(),
        version: 3,
        criteria: dossier_core::version_merge::seed_assessments(),
        strong_count: 0,
        weak_count: 0,
        source: VersionSource::Incremental,
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    gap_analysis_roundtrip,
    GapAnalysis,
    GapAnalysis {
        gaps: vec![EvidenceGap {
            criterion: Criterion::HighRemuneration,
            severity: Severity::High,
            description: "no salary benchmark".into(),
            recommended_evidence: vec!["industry compensation survey".into()],
        }],
        priority_criteria: vec![Criterion::HighRemuneration],
        summary: "remuneration evidence is thin".into(),
    }
);

roundtrip_and_validate!(
    risk_findings_roundtrip,
    QualitativeRiskFindings,
    QualitativeRiskFindings {
        criterion_risks: vec![CriterionRisk {
            criterion: Criterion::Judging,
            level: RiskLevel::Moderate,
            rationale: "only peer review".into(),
        }],
        red_flags: vec![RedFlag {
            severity: Severity::Critical,
            title: "no recommenders identified".into(),
            detail: String::new(),
        }],
        strengths: vec![],
        letter_assessment: LetterPortfolioAssessment {
            adequacy: RiskLevel::Critical,
            summary: "no letters".into(),
            gaps: vec![],
        },
    }
);

#[test]
fn probability_draft_rejects_fractional_points() {
    let schema = serde_json::to_value(schema_for!(ProbabilityDraft)).unwrap();
    let instance = json!({
        "base_rate_pct": 30,
        "adjustments": [{"factor": "strong awards", "points": -2.5}],
        "summary": "ok"
    });
    assert!(!validate_against_schema(&schema, &instance).is_empty());
}

#[test]
fn unknown_criterion_code_fails_schema() {
    let schema = serde_json::to_value(schema_for!(CriterionUpdate)).unwrap();
    let instance = json!({"criterion": "C11", "strength": "Strong"});
    assert!(!validate_against_schema(&schema, &instance).is_empty());
}
