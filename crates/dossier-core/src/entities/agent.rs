use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::analysis::CriterionUpdate;

/// A side effect the agent asks for during one turn.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AgentAction {
    /// Deep-merge `patch` into the case profile.
    UpdateProfile { patch: serde_json::Value },
    /// Upgrade-only criterion updates appended as a new analysis version.
    UpdateAnalysis { updates: Vec<CriterionUpdate> },
    /// Register a drafted document on the case.
    CreateDocument { name: String, content: String },
}

impl AgentAction {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UpdateProfile { .. } => "update_profile",
            Self::UpdateAnalysis { .. } => "update_analysis",
            Self::CreateDocument { .. } => "create_document",
        }
    }
}

/// One model turn of the agent loop.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AgentTurn {
    pub message: String,
    #[serde(default)]
    pub actions: Vec<AgentAction>,
}

impl AgentTurn {
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.actions.is_empty()
    }
}
