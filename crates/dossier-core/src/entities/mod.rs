//! Entity structs for all Dossier domain objects.
//!
//! Persisted records map to tables in the libSQL database; model-produced
//! records are validated against schemas generated from these structs. All
//! structs derive `Serialize`, `Deserialize`, and `JsonSchema`.

mod agent;
mod analysis;
mod evidence;
mod extraction;
mod risk;
mod stages;
mod verification;

pub use agent::{AgentAction, AgentTurn};
pub use analysis::{
    AnalysisSummary, AnalysisVersion, CriterionAssessment, CriterionUpdate, RelevanceHint,
};
pub use evidence::{
    Award, CommercialSuccess, CompensationRecord, EvidenceCollections, EvidenceItem, Exhibition,
    Grant, JudgingActivity, LeadershipRole, MediaMention, Membership, OriginalContribution,
    Publication, merge_items,
};
pub use extraction::{
    Background, CriterionSummary, CriterionUnitOutput, Education, ExtractionDocument,
    ExtractionRecord, PersonalInfo, WorkExperience,
};
pub use risk::{
    CriterionRisk, EvidenceInventory, LetterPortfolioAssessment, OverallAssessment,
    ProbabilityAdjustment, ProbabilityBreakdown, ProbabilityDraft, QualitativeRiskFindings,
    RedFlag, RiskAssessment,
};
pub use stages::{
    CaseStrategy, Consolidation, CriterionEvaluation, EvidenceGap, GapAnalysis, StageOutputRecord,
    StrategyAction, StrengthEvaluation,
};
pub use verification::{CaseDocument, DocumentVerification, Recommender, VerificationRecord};
