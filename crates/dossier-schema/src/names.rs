//! Registered schema names.
//!
//! Stage output schemas are named by [`PipelineStage::schema_name`].
//!
//! [`PipelineStage::schema_name`]: dossier_core::enums::PipelineStage::schema_name

use dossier_core::enums::Criterion;

pub const BACKGROUND: &str = "background";
pub const RISK_FINDINGS: &str = "risk_findings";
pub const PROBABILITY_DRAFT: &str = "probability_draft";
pub const RELEVANCE_HINT: &str = "relevance_hint";
pub const CRITERION_REEVALUATION: &str = "criterion_reevaluation";
pub const DOCUMENT_VERIFICATION: &str = "document_verification";
pub const AGENT_TURN: &str = "agent_turn";
pub const CRITERION_UPDATES: &str = "criterion_updates";
pub const EXTRACTION_DOCUMENT: &str = "extraction_document";
pub const ANALYSIS_VERSION: &str = "analysis_version";

/// Schema bound to the extraction unit for `criterion`.
#[must_use]
pub const fn extraction(criterion: Criterion) -> &'static str {
    match criterion {
        Criterion::Awards => "extraction_c1",
        Criterion::Membership => "extraction_c2",
        Criterion::PublishedMaterial => "extraction_c3",
        Criterion::Judging => "extraction_c4",
        Criterion::OriginalContribution => "extraction_c5",
        Criterion::ScholarlyArticles => "extraction_c6",
        Criterion::Exhibitions => "extraction_c7",
        Criterion::LeadingRole => "extraction_c8",
        Criterion::HighRemuneration => "extraction_c9",
        Criterion::CommercialSuccess => "extraction_c10",
    }
}
