//! Prompt override directory and lookup cache settings.

use serde::{Deserialize, Serialize};

const fn default_cache_ttl_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PromptsConfig {
    /// Directory holding `<slug>.toml` prompt overrides. Empty means
    /// built-in prompts only.
    #[serde(default)]
    pub directory: String,

    /// How long a looked-up prompt stays cached, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            directory: String::new(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl PromptsConfig {
    pub fn has_directory(&self) -> bool {
        !self.directory.is_empty()
    }
}
