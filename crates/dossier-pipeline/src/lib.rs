//! # dossier-pipeline
//!
//! The evidence pipeline and versioned-merge engine.
//!
//! - Extraction fan-out over the ten criteria plus background, with
//!   order-independent fan-in ([`assemble`]).
//! - Analysis versions: upgrade-only incremental merges under per-case
//!   serialization, extraction snapshots, reanalysis after a new document.
//! - Document verification records.
//! - The gated stage cascade and the two-pass risk computation.
//! - A bounded agent loop whose side effects go through [`AgentEffects`].

pub mod agent;
mod analysis;
pub mod assemble;
mod error;
mod extract;
mod locks;
mod reanalysis;
pub mod risk;
mod stages;
mod verification;

use std::sync::Arc;

use dossier_config::PipelineConfig;
use dossier_db::service::DossierStore;
use dossier_llm::StructuredCompleter;

pub use agent::{AgentEffects, AgentLoop, AgentRun, AppliedEffect};
pub use assemble::{
    ExtractionUnit, ProgressiveAssembler, UnitFailure, UnitOutcome, UnitOutput, assemble,
};
pub use error::PipelineError;
pub use extract::{ExtractionReport, ProgressObserver};
pub use locks::CaseLocks;
pub use reanalysis::ReanalysisOutcome;
pub use risk::RiskRun;
pub use verification::VerificationReport;

/// Entry point for every pipeline operation on a store.
pub struct Pipeline {
    store: Arc<DossierStore>,
    completer: StructuredCompleter,
    config: PipelineConfig,
    locks: CaseLocks,
}

impl Pipeline {
    pub fn new(
        store: Arc<DossierStore>,
        completer: StructuredCompleter,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            completer,
            config,
            locks: CaseLocks::new(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &DossierStore {
        &self.store
    }

    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
