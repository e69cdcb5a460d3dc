use async_trait::async_trait;
use dossier_config::ConfigError;
use dossier_llm::{CompletionClient, CompletionRequest, LlmError};
use serde_json::Value;

/// Stands in for the completion endpoint when it is not configured, so
/// store-only commands still run. Any completion fails with a config error.
#[derive(Debug, Default)]
pub struct OfflineCompletion;

#[async_trait]
impl CompletionClient for OfflineCompletion {
    async fn complete(&self, _request: &CompletionRequest) -> Result<Value, LlmError> {
        Err(LlmError::Config(ConfigError::NotConfigured {
            section: "completion".into(),
        }))
    }
}
