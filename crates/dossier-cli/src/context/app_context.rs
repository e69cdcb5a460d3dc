use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use dossier_config::DossierConfig;
use dossier_db::service::DossierStore;
use dossier_llm::{
    BuiltinPrompts, CachedPromptSource, CompletionClient, OpenAiClient, PromptSource,
    StructuredCompleter, TomlPromptDirectory,
};
use dossier_pipeline::Pipeline;
use dossier_schema::SchemaRegistry;

use super::offline::OfflineCompletion;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub pipeline: Pipeline,
    pub config: DossierConfig,
}

impl AppContext {
    /// Open the store and wire the completion stack for `project_root`.
    pub async fn init(project_root: PathBuf, config: DossierConfig) -> anyhow::Result<Self> {
        let db_path = database_path(&project_root, &config)?;
        let store = DossierStore::new_local(&db_path)
            .await
            .with_context(|| format!("failed to open dossier database at {db_path}"))?;

        let client: Arc<dyn CompletionClient> = if config.completion.is_configured() {
            Arc::new(
                OpenAiClient::new(&config.completion)
                    .context("failed to build completion client")?,
            )
        } else {
            tracing::debug!("completion endpoint not configured; model-backed commands will fail");
            Arc::new(OfflineCompletion)
        };

        let prompts: Arc<dyn PromptSource> = if config.prompts.has_directory() {
            let directory = resolve(&project_root, &config.prompts.directory);
            tracing::debug!(directory = %directory.display(), "using prompt overrides");
            Arc::new(CachedPromptSource::new(
                TomlPromptDirectory::new(directory),
                Duration::from_secs(config.prompts.cache_ttl_secs),
            ))
        } else {
            Arc::new(BuiltinPrompts)
        };

        let completer = StructuredCompleter::new(client, prompts, Arc::new(SchemaRegistry::new()));
        let pipeline = Pipeline::new(Arc::new(store), completer, config.pipeline.clone());

        Ok(Self { pipeline, config })
    }

    pub fn store(&self) -> &DossierStore {
        self.pipeline.store()
    }
}

fn resolve(project_root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

/// Database location as a string libSQL accepts, creating parent
/// directories for file-backed databases.
fn database_path(project_root: &Path, config: &DossierConfig) -> anyhow::Result<String> {
    if config.database.is_in_memory() {
        return Ok(config.database.path.clone());
    }
    let path = resolve(project_root, &config.database.path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(path.to_string_lossy().into_owned())
}
