//! Pipeline tuning knobs.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_max_concurrent_units() -> usize {
    10
}

const fn default_max_evidence_excerpts() -> usize {
    5
}

const fn default_agent_max_steps() -> u32 {
    6
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Upper bound on extraction units in flight at once.
    #[serde(default = "default_max_concurrent_units")]
    pub max_concurrent_units: usize,

    /// Excerpts kept per criterion summary.
    #[serde(default = "default_max_evidence_excerpts")]
    pub max_evidence_excerpts: usize,

    /// Step budget for the agent loop.
    #[serde(default = "default_agent_max_steps")]
    pub agent_max_steps: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_units: default_max_concurrent_units(),
            max_evidence_excerpts: default_max_evidence_excerpts(),
            agent_max_steps: default_agent_max_steps(),
        }
    }
}

impl PipelineConfig {
    /// Reject values that would stall the pipeline.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when concurrency or the agent step
    /// budget is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_units == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.max_concurrent_units".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.agent_max_steps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.agent_max_steps".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_concurrent_units, 10);
        assert_eq!(config.max_evidence_excerpts, 5);
        assert_eq!(config.agent_max_steps, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_concurrency_rejected() {
        let config = PipelineConfig {
            max_concurrent_units: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
