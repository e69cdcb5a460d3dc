//! Central schema registry for all Dossier completion contracts.
//!
//! The `SchemaRegistry` builds JSON Schemas from dossier-core types at
//! construction time using [`schemars::schema_for!`] and provides validation
//! via `jsonschema`.

use std::collections::HashMap;

use dossier_core::entities::{
    AgentTurn, AnalysisVersion, Background, CaseStrategy, Consolidation, CriterionUnitOutput,
    CriterionUpdate, DocumentVerification, ExtractionDocument, GapAnalysis, ProbabilityDraft,
    QualitativeRiskFindings, RelevanceHint, RiskAssessment, StrengthEvaluation,
};
use dossier_core::enums::{Criterion, PipelineStage};
use schemars::schema_for;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::SchemaError;
use crate::names;

/// Central store of all JSON Schemas the pipeline binds completions to.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, Value>,
}

/// Insert a schema into the map, converting the `schemars` output to a
/// `serde_json::Value`. Panics if `serde_json::to_value` fails (infallible
/// for valid `schemars` output).
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::to_value(schema_for!($ty)).unwrap());
    };
}

impl SchemaRegistry {
    /// Build a registry containing every completion and record schema.
    ///
    /// # Panics
    ///
    /// Panics if `serde_json::to_value` fails on any `schemars`-generated
    /// schema. This is not expected in practice because `schemars` always
    /// produces valid JSON-serialisable output.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // --- Extraction units (10 + background) ---
        let unit = serde_json::to_value(schema_for!(CriterionUnitOutput)).unwrap();
        for criterion in Criterion::ALL {
            schemas.insert(names::extraction(criterion), pin_criterion(&unit, criterion));
        }
        register!(schemas, names::BACKGROUND, Background);

        // --- Cascade stages (4) ---
        register!(
            schemas,
            PipelineStage::StrengthEvaluation.schema_name(),
            StrengthEvaluation
        );
        register!(schemas, PipelineStage::GapAnalysis.schema_name(), GapAnalysis);
        register!(schemas, PipelineStage::CaseStrategy.schema_name(), CaseStrategy);
        register!(
            schemas,
            PipelineStage::Consolidation.schema_name(),
            Consolidation
        );

        // --- Risk passes + stored assessment (3) ---
        register!(schemas, names::RISK_FINDINGS, QualitativeRiskFindings);
        register!(schemas, names::PROBABILITY_DRAFT, ProbabilityDraft);
        register!(
            schemas,
            PipelineStage::RiskProbability.schema_name(),
            RiskAssessment
        );

        // --- Incremental paths (5) ---
        register!(schemas, names::RELEVANCE_HINT, RelevanceHint);
        register!(schemas, names::CRITERION_REEVALUATION, CriterionUpdate);
        register!(schemas, names::DOCUMENT_VERIFICATION, DocumentVerification);
        register!(schemas, names::AGENT_TURN, AgentTurn);
        register!(schemas, names::CRITERION_UPDATES, Vec<CriterionUpdate>);

        // --- Stored records (2) ---
        register!(schemas, names::EXTRACTION_DOCUMENT, ExtractionDocument);
        register!(schemas, names::ANALYSIS_VERSION, AnalysisVersion);

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// Validate `instance` against `name`, then decode it into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`Self::validate`] returns, plus `SchemaError::Decode` when
    /// the schema admits a value that `T` does not.
    pub fn decode<T: DeserializeOwned>(&self, name: &str, instance: Value) -> Result<T, SchemaError> {
        self.validate(name, &instance)?;
        serde_json::from_value(instance).map_err(|e| SchemaError::Decode(e.to_string()))
    }

    /// List all registered schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy of the unit schema that only admits `criterion` at the top level.
fn pin_criterion(unit: &Value, criterion: Criterion) -> Value {
    let mut schema = unit.clone();
    if let Some(properties) = schema.get_mut("properties").and_then(Value::as_object_mut) {
        properties.insert("criterion".into(), json!({ "const": criterion.code() }));
    }
    if let Some(title) = schema.get_mut("title") {
        *title = json!(format!("CriterionUnitOutput{}", criterion.code()));
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
    }

    fn unit_output(code: &str) -> Value {
        json!({
            "criterion": code,
            "evidence": {
                "awards": [{"name": "Gold Medal", "issuer": "Royal Society", "year": 2020}]
            },
            "summary": {
                "criterion": code,
                "evidence_count": 1,
                "strength": "Weak",
                "reason": "one award",
                "evidence": ["Gold Medal 2020"]
            }
        })
    }

    #[test]
    fn registry_has_expected_count() {
        // 10 units + background + 4 stages + 3 risk + 5 incremental + 2 records
        assert_eq!(registry().schema_count(), 25);
    }

    #[test]
    fn registry_list_is_sorted() {
        let names = registry().list();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn every_stage_has_a_schema() {
        let reg = registry();
        for stage in PipelineStage::ALL {
            assert!(reg.get(stage.schema_name()).is_some(), "{stage} missing");
        }
    }

    #[rstest]
    #[case(Criterion::Awards, "C1", true)]
    #[case(Criterion::Awards, "C2", false)]
    #[case(Criterion::CommercialSuccess, "C10", true)]
    fn unit_schema_pins_its_criterion(
        #[case] criterion: Criterion,
        #[case] code: &str,
        #[case] valid: bool,
    ) {
        let result = registry().validate(names::extraction(criterion), &unit_output(code));
        assert_eq!(result.is_ok(), valid);
    }

    #[test]
    fn bad_strength_label_fails_validation() {
        let mut value = unit_output("C1");
        value["summary"]["strength"] = json!("Excellent");
        let err = registry()
            .validate(names::extraction(Criterion::Awards), &value)
            .unwrap_err();
        assert!(matches!(err, SchemaError::ValidationFailed { .. }));
        assert!(!err.messages().is_empty());
    }

    #[test]
    fn unknown_schema_name() {
        let err = registry().validate("nope", &json!({})).unwrap_err();
        assert!(matches!(err, SchemaError::NotFound(_)));
    }

    #[test]
    fn decode_returns_typed_value() {
        let hint: RelevanceHint = registry()
            .decode(
                names::RELEVANCE_HINT,
                json!({"criteria": ["C4", "C6"], "rationale": "peer review invitation"}),
            )
            .unwrap();
        assert_eq!(hint.criteria, vec![Criterion::Judging, Criterion::ScholarlyArticles]);
    }

    #[test]
    fn agent_turn_rejects_unknown_action() {
        let value = json!({
            "message": "hi",
            "actions": [{"action": "delete_case"}]
        });
        assert!(registry().validate(names::AGENT_TURN, &value).is_err());
    }
}
