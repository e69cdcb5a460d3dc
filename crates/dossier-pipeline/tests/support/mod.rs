//! Shared fixtures: an in-memory store, a scripted completion client, and
//! canned model outputs that satisfy the registered schemas.

#![allow(dead_code)]

use std::sync::Arc;

use dossier_config::PipelineConfig;
use dossier_core::enums::Criterion;
use dossier_db::service::DossierStore;
use dossier_llm::testing::ScriptedCompletion;
use dossier_llm::{BuiltinPrompts, StructuredCompleter};
use dossier_pipeline::Pipeline;
use dossier_schema::{SchemaRegistry, names};
use serde_json::{Value, json};

pub const CASE: &str = "case-okafor";

pub const CASE_TEXT: &str = "Dr. R. Okafor received the IEEE Gold Medal in 2020, \
    published 'Sparse attention at scale' at NeurIPS 2022, and reviews for ICML.";

pub async fn pipeline(scripted: ScriptedCompletion) -> (Arc<Pipeline>, Arc<ScriptedCompletion>) {
    let scripted = Arc::new(scripted);
    let store = Arc::new(DossierStore::new_local(":memory:").await.unwrap());
    let completer = StructuredCompleter::new(
        Arc::clone(&scripted) as Arc<dyn dossier_llm::CompletionClient>,
        Arc::new(BuiltinPrompts),
        Arc::new(SchemaRegistry::new()),
    );
    let pipeline = Arc::new(Pipeline::new(store, completer, PipelineConfig::default()));
    (pipeline, scripted)
}

pub fn unit_output(criterion: Criterion, strength: &str) -> Value {
    let code = criterion.code();
    json!({
        "criterion": code,
        "evidence": {
            "publications": [{
                "title": "Sparse attention at scale",
                "venue": "NeurIPS",
                "year": 2022
            }]
        },
        "summary": {
            "criterion": code,
            "evidence_count": 1,
            "strength": strength,
            "reason": format!("{code} supported by one publication"),
            "evidence": [format!("{code}: Sparse attention at scale (NeurIPS 2022)")]
        }
    })
}

pub fn background() -> Value {
    json!({
        "personal_info": {"full_name": "R. Okafor", "field_of_expertise": "machine learning"},
        "education": [{"institution": "University of Lagos", "degree": "PhD", "year": 2015}],
        "work_experience": []
    })
}

/// Every extraction unit answers, except `failing`, which return a server
/// error.
pub fn extraction_script(failing: &[Criterion]) -> ScriptedCompletion {
    let mut scripted = ScriptedCompletion::new().with_response(names::BACKGROUND, background());
    for criterion in Criterion::ALL {
        scripted = if failing.contains(&criterion) {
            scripted.with_failure(names::extraction(criterion), "upstream timeout")
        } else {
            scripted.with_response(names::extraction(criterion), unit_output(criterion, "Weak"))
        };
    }
    scripted
}

pub fn strength_evaluation() -> Value {
    json!({
        "criteria": [{
            "criterion": "C1",
            "strength": "Strong",
            "score": 8,
            "rationale": "IEEE Gold Medal is internationally recognized",
            "key_evidence": ["IEEE Gold Medal 2020"]
        }],
        "overall_summary": "Awards and scholarship are the strongest criteria."
    })
}

pub fn gap_analysis() -> Value {
    json!({
        "gaps": [{
            "criterion": "C3",
            "severity": "high",
            "description": "no press coverage",
            "recommended_evidence": ["feature article"]
        }],
        "priority_criteria": ["C3"],
        "summary": "media coverage is missing"
    })
}

pub fn case_strategy() -> Value {
    json!({
        "target_criteria": ["C1", "C6", "C4"],
        "actions": [{
            "title": "Collect reviewer invitations",
            "criterion": "C4",
            "priority": 1,
            "description": "Gather ICML reviewer invitation emails"
        }],
        "narrative": "Lead with awards and publications."
    })
}

pub fn consolidation() -> Value {
    json!({
        "executive_summary": "Viable case once judging evidence is collected.",
        "strongest_criteria": ["C1", "C6"],
        "action_plan": ["collect reviewer invitations"],
        "open_risks": ["thin media coverage"]
    })
}

pub fn risk_findings() -> Value {
    json!({
        "criterion_risks": [{"criterion": "C3", "level": "high", "rationale": "no articles"}],
        "red_flags": [],
        "strengths": ["international award"],
        "letter_assessment": {"adequacy": "moderate", "summary": "two letters planned"}
    })
}

pub fn probability_draft(base: i32, points: &[i32]) -> Value {
    let adjustments: Vec<Value> = points
        .iter()
        .enumerate()
        .map(|(i, p)| json!({"factor": format!("factor {i}"), "points": p}))
        .collect();
    json!({
        "base_rate_pct": base,
        "adjustments": adjustments,
        "summary": "moderate risk"
    })
}
