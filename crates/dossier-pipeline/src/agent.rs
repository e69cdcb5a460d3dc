//! Bounded agent loop.
//!
//! State is the transcript so far. Each step asks for one `agent_turn`; the
//! turn's actions are applied through [`AgentEffects`] and their results
//! appended to the transcript. The loop ends when a turn requests no action
//! or the step budget runs out. The loop itself carries no domain logic.

use async_trait::async_trait;
use dossier_core::entities::{AgentAction, AgentTurn, AnalysisVersion, CaseDocument, CriterionUpdate};
use dossier_core::enums::VersionSource;
use dossier_llm::StructuredCompleter;
use dossier_llm::prompts::slugs;
use dossier_schema::names;
use serde::Serialize;
use serde_json::Value;

use crate::{Pipeline, PipelineError};

/// Side effects an agent may request.
#[async_trait]
pub trait AgentEffects: Send + Sync {
    async fn update_profile(&self, case_id: &str, patch: Value) -> Result<Value, PipelineError>;

    async fn update_analysis(
        &self,
        case_id: &str,
        updates: &[CriterionUpdate],
    ) -> Result<AnalysisVersion, PipelineError>;

    async fn create_document(
        &self,
        case_id: &str,
        name: &str,
        content: &str,
    ) -> Result<CaseDocument, PipelineError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Agent,
    Effect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum AppliedEffect {
    ProfileUpdated { profile: Value },
    AnalysisUpdated { version: u32 },
    DocumentCreated { document_id: String, name: String },
    Failed { action: String, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentRun {
    pub transcript: Vec<TranscriptEntry>,
    pub applied: Vec<AppliedEffect>,
    pub steps: u32,
    /// The last agent message.
    pub reply: String,
    /// True when the step budget ran out before a final turn.
    pub exhausted: bool,
}

/// Finite-step driver over `agent_turn` completions.
#[derive(Debug, Clone, Copy)]
pub struct AgentLoop {
    max_steps: u32,
}

impl AgentLoop {
    #[must_use]
    pub const fn new(max_steps: u32) -> Self {
        Self { max_steps }
    }

    /// Run until a turn requests no action or `max_steps` turns were taken.
    ///
    /// `profile` and `analysis` are rendered once into every prompt; the
    /// effect of each action is reported back through the transcript.
    ///
    /// # Errors
    ///
    /// Returns the completion error of any failed turn. Failed effects are
    /// recorded as [`AppliedEffect::Failed`] and do not stop the loop.
    pub async fn run(
        &self,
        completer: &StructuredCompleter,
        effects: &dyn AgentEffects,
        case_id: &str,
        request: &str,
        profile: &str,
        analysis: &str,
    ) -> Result<AgentRun, PipelineError> {
        let mut run = AgentRun {
            transcript: vec![TranscriptEntry {
                speaker: Speaker::User,
                text: request.to_string(),
            }],
            applied: Vec::new(),
            steps: 0,
            reply: String::new(),
            exhausted: false,
        };

        while run.steps < self.max_steps {
            run.steps += 1;
            let transcript = render_transcript(&run.transcript);
            let turn: AgentTurn = completer
                .complete(
                    slugs::AGENT_TURN,
                    names::AGENT_TURN,
                    &[
                        ("profile", profile),
                        ("analysis", analysis),
                        ("transcript", transcript.as_str()),
                    ],
                )
                .await?;
            tracing::debug!(case_id, step = run.steps, actions = turn.actions.len(), "agent turn");

            run.transcript.push(TranscriptEntry {
                speaker: Speaker::Agent,
                text: turn.message.clone(),
            });
            run.reply.clone_from(&turn.message);
            if turn.is_final() {
                return Ok(run);
            }

            for action in turn.actions {
                let applied = apply_action(effects, case_id, action).await;
                run.transcript.push(TranscriptEntry {
                    speaker: Speaker::Effect,
                    text: describe(&applied),
                });
                run.applied.push(applied);
            }
        }

        run.exhausted = true;
        Ok(run)
    }
}

async fn apply_action(effects: &dyn AgentEffects, case_id: &str, action: AgentAction) -> AppliedEffect {
    let kind = action.kind();
    let result = match action {
        AgentAction::UpdateProfile { patch } => effects
            .update_profile(case_id, patch)
            .await
            .map(|profile| AppliedEffect::ProfileUpdated { profile }),
        AgentAction::UpdateAnalysis { updates } => effects
            .update_analysis(case_id, &updates)
            .await
            .map(|v| AppliedEffect::AnalysisUpdated { version: v.version }),
        AgentAction::CreateDocument { name, content } => effects
            .create_document(case_id, &name, &content)
            .await
            .map(|doc| AppliedEffect::DocumentCreated {
                document_id: doc.id,
                name: doc.name,
            }),
    };
    result.unwrap_or_else(|e| {
        tracing::warn!(case_id, action = kind, %e, "agent action failed");
        AppliedEffect::Failed {
            action: kind.to_string(),
            error: e.to_string(),
        }
    })
}

fn describe(effect: &AppliedEffect) -> String {
    match effect {
        AppliedEffect::ProfileUpdated { profile } => format!("profile updated: {profile}"),
        AppliedEffect::AnalysisUpdated { version } => format!("analysis version {version} created"),
        AppliedEffect::DocumentCreated { document_id, name } => {
            format!("document {name} created as {document_id}")
        }
        AppliedEffect::Failed { action, error } => format!("{action} failed: {error}"),
    }
}

fn render_transcript(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let who = match entry.speaker {
                Speaker::User => "user",
                Speaker::Agent => "agent",
                Speaker::Effect => "effect",
            };
            format!("[{who}] {}", entry.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Store-backed effects
// ---------------------------------------------------------------------------

#[async_trait]
impl AgentEffects for Pipeline {
    async fn update_profile(&self, case_id: &str, patch: Value) -> Result<Value, PipelineError> {
        Self::update_profile(self, case_id, patch).await
    }

    async fn update_analysis(
        &self,
        case_id: &str,
        updates: &[CriterionUpdate],
    ) -> Result<AnalysisVersion, PipelineError> {
        self.append_merged(case_id, updates, VersionSource::Agent).await
    }

    async fn create_document(
        &self,
        case_id: &str,
        name: &str,
        content: &str,
    ) -> Result<CaseDocument, PipelineError> {
        Ok(self
            .store
            .register_document(case_id, name, Some(content))
            .await?)
    }
}

impl Pipeline {
    /// Deep-merge `patch` into the case profile under the case lock.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Database` if the patch is not an object or
    /// the write fails.
    pub async fn update_profile(&self, case_id: &str, patch: Value) -> Result<Value, PipelineError> {
        let _guard = self.locks.acquire(case_id).await;
        Ok(self.store.update_profile(case_id, patch).await?)
    }

    /// Run the agent loop for `request` with the store as the effect sink.
    ///
    /// # Errors
    ///
    /// See [`AgentLoop::run`].
    pub async fn run_agent(&self, case_id: &str, request: &str) -> Result<AgentRun, PipelineError> {
        let profile = self
            .store
            .get_profile(case_id)
            .await?
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        let analysis = match self.store.latest_version(case_id).await? {
            Some(version) => serde_json::to_string_pretty(&version.criteria)?,
            None => "no analysis yet".to_string(),
        };
        AgentLoop::new(self.config.agent_max_steps)
            .run(
                &self.completer,
                self,
                case_id,
                request,
                &serde_json::to_string_pretty(&profile)?,
                &analysis,
            )
            .await
    }
}
