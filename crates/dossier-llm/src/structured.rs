//! Schema-bound completion: prompt lookup, rendering, the call, validation.

use std::sync::Arc;

use dossier_schema::{SchemaError, SchemaRegistry};
use serde::de::DeserializeOwned;

use crate::client::{CompletionClient, CompletionRequest};
use crate::error::LlmError;
use crate::prompts::PromptSource;

/// Ties a completion client to the prompt source and schema registry.
///
/// Every call is bound to a registered schema; output that does not validate
/// is returned as [`LlmError::SchemaValidation`] and never decoded.
#[derive(Clone)]
pub struct StructuredCompleter {
    client: Arc<dyn CompletionClient>,
    prompts: Arc<dyn PromptSource>,
    schemas: Arc<SchemaRegistry>,
}

impl StructuredCompleter {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        prompts: Arc<dyn PromptSource>,
        schemas: Arc<SchemaRegistry>,
    ) -> Self {
        Self {
            client,
            prompts,
            schemas,
        }
    }

    #[must_use]
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Render prompt `slug` with `vars`, complete against `schema_name`, and
    /// decode the validated output.
    ///
    /// # Errors
    ///
    /// - `LlmError::Prompt` if no prompt resolves for `slug`.
    /// - `LlmError::UnknownSchema` if `schema_name` is not registered.
    /// - `LlmError::SchemaValidation` if the output does not conform.
    /// - Any transport error from the client.
    pub async fn complete<T: DeserializeOwned>(
        &self,
        slug: &str,
        schema_name: &str,
        vars: &[(&str, &str)],
    ) -> Result<T, LlmError> {
        let template = self
            .prompts
            .prompt(slug)
            .await?
            .ok_or_else(|| LlmError::Prompt(format!("no prompt configured for '{slug}'")))?;
        let schema = self
            .schemas
            .get(schema_name)
            .ok_or_else(|| LlmError::UnknownSchema(schema_name.to_string()))?
            .clone();

        let rendered = template.render(vars);
        let request = CompletionRequest {
            system: rendered.system,
            prompt: rendered.user,
            schema_name: schema_name.to_string(),
            schema,
            model: rendered.model,
        };

        tracing::debug!(slug, schema = schema_name, "structured completion");
        let output = self.client.complete(&request).await?;

        self.schemas
            .decode(schema_name, output)
            .map_err(|e| match e {
                SchemaError::NotFound(name) => LlmError::UnknownSchema(name),
                other => LlmError::SchemaValidation {
                    schema: schema_name.to_string(),
                    errors: other.messages(),
                },
            })
    }
}

#[cfg(test)]
mod tests {
    use dossier_core::entities::GapAnalysis;
    use dossier_core::enums::Criterion;
    use serde_json::json;

    use super::*;
    use crate::prompts::BuiltinPrompts;
    use crate::testing::ScriptedCompletion;

    fn completer(scripted: Arc<ScriptedCompletion>) -> StructuredCompleter {
        StructuredCompleter::new(
            scripted,
            Arc::new(BuiltinPrompts),
            Arc::new(SchemaRegistry::new()),
        )
    }

    #[tokio::test]
    async fn valid_output_is_decoded() {
        let scripted = Arc::new(ScriptedCompletion::new().with_response(
            "gap_analysis",
            json!({
                "gaps": [{
                    "criterion": "C9",
                    "severity": "high",
                    "description": "no salary data",
                    "recommended_evidence": ["offer letter"]
                }],
                "priority_criteria": ["C9"],
                "summary": "remuneration is unproven"
            }),
        ));
        let completer = completer(Arc::clone(&scripted));

        let gaps: GapAnalysis = completer
            .complete("gap_analysis", "gap_analysis", &[("context", "STRENGTH EVALUATION")])
            .await
            .unwrap();

        assert_eq!(gaps.priority_criteria, vec![Criterion::HighRemuneration]);
        let calls = scripted.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, "STRENGTH EVALUATION");
        assert!(calls[0].schema.is_object());
    }

    #[tokio::test]
    async fn nonconforming_output_is_a_validation_failure() {
        let scripted = Arc::new(
            ScriptedCompletion::new().with_response("gap_analysis", json!({"gaps": "none"})),
        );
        let err = completer(scripted)
            .complete::<GapAnalysis>("gap_analysis", "gap_analysis", &[])
            .await
            .unwrap_err();
        match err {
            LlmError::SchemaValidation { schema, errors } => {
                assert_eq!(schema, "gap_analysis");
                assert!(!errors.is_empty());
            }
            other => panic!("expected SchemaValidation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_schema_makes_no_call() {
        let scripted = Arc::new(ScriptedCompletion::new());
        let err = completer(Arc::clone(&scripted))
            .complete::<GapAnalysis>("gap_analysis", "not_registered", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::UnknownSchema(_)));
        assert_eq!(scripted.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_prompt_makes_no_call() {
        let scripted = Arc::new(ScriptedCompletion::new());
        let err = completer(Arc::clone(&scripted))
            .complete::<GapAnalysis>("not_a_prompt", "gap_analysis", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Prompt(_)));
        assert_eq!(scripted.call_count(), 0);
    }

    #[tokio::test]
    async fn scripted_queue_advances_then_repeats_last() {
        let scripted = ScriptedCompletion::new()
            .with_failure("background", "boom")
            .with_response("background", json!({}));
        let request = CompletionRequest {
            system: String::new(),
            prompt: String::new(),
            schema_name: "background".into(),
            schema: json!({}),
            model: None,
        };
        assert!(scripted.complete(&request).await.is_err());
        assert!(scripted.complete(&request).await.is_ok());
        assert!(scripted.complete(&request).await.is_ok());
        assert_eq!(scripted.calls_for("background").len(), 3);
    }
}
