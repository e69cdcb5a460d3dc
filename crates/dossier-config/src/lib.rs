//! # dossier-config
//!
//! Layered configuration loading for Dossier using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DOSSIER_*` prefix, `__` as separator)
//! 2. Project-level `.dossier/config.toml`
//! 3. User-level `~/.config/dossier/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DOSSIER_COMPLETION__API_KEY` -> `completion.api_key`,
//! `DOSSIER_PIPELINE__MAX_CONCURRENT_UNITS` -> `pipeline.max_concurrent_units`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use dossier_config::DossierConfig;
//!
//! let config = DossierConfig::load_with_dotenv().expect("config");
//!
//! if config.completion.is_configured() {
//!     println!("model: {}", config.completion.model);
//! }
//! ```

mod completion;
mod database;
mod error;
mod general;
mod pipeline;
mod prompts;

pub use completion::CompletionConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use pipeline::PipelineConfig;
pub use prompts::PromptsConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local configuration directory.
pub const PROJECT_DIR: &str = ".dossier";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DossierConfig {
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub prompts: PromptsConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl DossierConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed, or
    /// `ConfigError::InvalidValue` if pipeline settings are out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// Load configuration rooted at `project`, reading
    /// `<project>/.dossier/config.toml` instead of the working directory's.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_for_project(project: &Path) -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment_for(project))
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain for the current directory.
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    /// Build the figment provider chain with the project layer read from
    /// `project`.
    pub fn figment_for(project: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project.join(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("DOSSIER_").split("__"))
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.pipeline.validate()?;
        Ok(config)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dossier").join("config.toml"))
    }

    /// Load `.env` from the workspace root, falling back to the current
    /// directory. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = DossierConfig::default();
        assert!(!config.completion.is_configured());
        assert!(!config.prompts.has_directory());
        assert_eq!(config.pipeline.max_concurrent_units, 10);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: DossierConfig = DossierConfig::figment().extract()?;
            assert_eq!(config.general.default_limit, 20);
            assert_eq!(config.database.path, ".dossier/dossier.db");
            Ok(())
        });
    }
}
