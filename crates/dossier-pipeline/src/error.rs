//! Pipeline error taxonomy.

use dossier_core::enums::{PipelineStage, Prerequisite};
use dossier_core::errors::CoreError;
use dossier_db::error::DatabaseError;
use dossier_llm::LlmError;
use thiserror::Error;

/// Errors surfaced by pipeline operations.
///
/// A failed extraction unit is not an error: it is reported in
/// [`crate::ExtractionReport::failed_units`] and assembly proceeds.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A completion's output did not conform to its schema.
    #[error("Output for {schema} failed validation: {errors:?}")]
    SchemaValidation { schema: String, errors: Vec<String> },

    /// A stage was invoked before its required upstream output was stored.
    #[error("run {missing} first ({stage} requires its output)")]
    PredecessorMissing {
        stage: PipelineStage,
        missing: Prerequisite,
    },

    /// Caller-supplied input was rejected before any work was done.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Completion(LlmError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<LlmError> for PipelineError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::SchemaValidation { schema, errors } => {
                Self::SchemaValidation { schema, errors }
            }
            other => Self::Completion(other),
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        Self::Core(CoreError::Validation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predecessor_missing_reads_as_remediation() {
        let err = PipelineError::PredecessorMissing {
            stage: PipelineStage::GapAnalysis,
            missing: Prerequisite::Stage(PipelineStage::StrengthEvaluation),
        };
        assert_eq!(
            err.to_string(),
            "run strength_evaluation first (gap_analysis requires its output)"
        );
    }

    #[test]
    fn schema_failures_keep_their_type() {
        let err: PipelineError = LlmError::SchemaValidation {
            schema: "gap_analysis".into(),
            errors: vec!["missing summary".into()],
        }
        .into();
        assert!(matches!(err, PipelineError::SchemaValidation { .. }));

        let err: PipelineError = LlmError::Refused("no".into()).into();
        assert!(matches!(err, PipelineError::Completion(_)));
    }
}
