use clap::{Args, Subcommand, ValueEnum};
use dossier_core::enums::{Criterion, PipelineStage};

use crate::cli::subcommands::{DocumentCommands, RecommenderCommands, SchemaCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Extract criterion evidence from case text and seed an analysis version.
    Extract(ExtractArgs),
    /// Run one stage of the analysis cascade.
    Stage(StageArgs),
    /// Run the two-pass risk assessment.
    Risk(CaseArgs),
    /// Merge criterion updates from a JSON file into a new analysis version.
    Update(UpdateArgs),
    /// Re-evaluate the criteria a new document may affect.
    Reanalyze(InputArgs),
    /// Verify an uploaded document against criteria.
    Verify(VerifyArgs),
    /// Analysis version history and current summary.
    History(HistoryArgs),
    /// Show or patch the case profile.
    Profile(ProfileArgs),
    /// Run the case assistant on a request.
    Agent(AgentArgs),
    /// Uploaded documents.
    Document {
        #[command(subcommand)]
        action: DocumentCommands,
    },
    /// Recommenders.
    Recommender {
        #[command(subcommand)]
        action: RecommenderCommands,
    },
    /// Registered output schemas.
    Schema {
        #[command(subcommand)]
        action: SchemaCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct CaseArgs {
    #[arg(long)]
    pub case: String,
}

#[derive(Clone, Debug, Args)]
pub struct ExtractArgs {
    #[arg(long)]
    pub case: String,
    /// File holding the case text.
    #[arg(long)]
    pub input: String,
    /// File holding survey answers.
    #[arg(long)]
    pub survey: Option<String>,
}

/// Cascade stages that run on demand.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum StageName {
    Strength,
    Gaps,
    Strategy,
    Consolidate,
}

impl StageName {
    #[must_use]
    pub const fn pipeline_stage(self) -> PipelineStage {
        match self {
            Self::Strength => PipelineStage::StrengthEvaluation,
            Self::Gaps => PipelineStage::GapAnalysis,
            Self::Strategy => PipelineStage::CaseStrategy,
            Self::Consolidate => PipelineStage::Consolidation,
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct StageArgs {
    #[arg(value_enum)]
    pub stage: StageName,
    #[arg(long)]
    pub case: String,
}

#[derive(Clone, Debug, Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub case: String,
    /// JSON file with an array of criterion updates.
    #[arg(long)]
    pub file: String,
}

#[derive(Clone, Debug, Args)]
pub struct InputArgs {
    #[arg(long)]
    pub case: String,
    /// File holding the document text.
    #[arg(long)]
    pub input: String,
}

#[derive(Clone, Debug, Args)]
pub struct VerifyArgs {
    #[arg(long)]
    pub case: String,
    /// Document id from `dossier document add`.
    #[arg(long)]
    pub document: String,
    /// File holding the document text.
    #[arg(long)]
    pub input: String,
    /// Comma-separated criterion codes, e.g. `C1,C4`.
    #[arg(long, value_delimiter = ',', required = true)]
    pub criteria: Vec<Criterion>,
}

#[derive(Clone, Debug, Args)]
pub struct HistoryArgs {
    #[arg(long)]
    pub case: String,
    /// Show a single version instead of the list.
    #[arg(long)]
    pub version: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub case: String,
    /// JSON object deep-merged into the stored profile.
    #[arg(long)]
    pub patch: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AgentArgs {
    #[arg(long)]
    pub case: String,
    #[arg(long)]
    pub request: String,
}
