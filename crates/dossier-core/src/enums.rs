//! Criteria, strength levels, evidence categories, and pipeline stages.
//!
//! Criteria serialize as their stable codes (`"C1"`..`"C10"`); strength uses
//! the labels `"None"`, `"Weak"`, `"Strong"`. Everything else is `snake_case`.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Criterion
// ---------------------------------------------------------------------------

/// One of the ten fixed evaluation categories.
///
/// Ordering follows the code number, which is also the canonical order of
/// every per-criterion list produced by this crate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum Criterion {
    #[serde(rename = "C1")]
    Awards,
    #[serde(rename = "C2")]
    Membership,
    #[serde(rename = "C3")]
    PublishedMaterial,
    #[serde(rename = "C4")]
    Judging,
    #[serde(rename = "C5")]
    OriginalContribution,
    #[serde(rename = "C6")]
    ScholarlyArticles,
    #[serde(rename = "C7")]
    Exhibitions,
    #[serde(rename = "C8")]
    LeadingRole,
    #[serde(rename = "C9")]
    HighRemuneration,
    #[serde(rename = "C10")]
    CommercialSuccess,
}

impl Criterion {
    /// All ten criteria in canonical order.
    pub const ALL: [Self; 10] = [
        Self::Awards,
        Self::Membership,
        Self::PublishedMaterial,
        Self::Judging,
        Self::OriginalContribution,
        Self::ScholarlyArticles,
        Self::Exhibitions,
        Self::LeadingRole,
        Self::HighRemuneration,
        Self::CommercialSuccess,
    ];

    /// Stable code used in storage, schemas, and prompts.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Awards => "C1",
            Self::Membership => "C2",
            Self::PublishedMaterial => "C3",
            Self::Judging => "C4",
            Self::OriginalContribution => "C5",
            Self::ScholarlyArticles => "C6",
            Self::Exhibitions => "C7",
            Self::LeadingRole => "C8",
            Self::HighRemuneration => "C9",
            Self::CommercialSuccess => "C10",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Awards => "Nationally or internationally recognized awards",
            Self::Membership => "Membership in associations requiring outstanding achievement",
            Self::PublishedMaterial => "Published material about the applicant",
            Self::Judging => "Judging the work of others",
            Self::OriginalContribution => "Original contributions of major significance",
            Self::ScholarlyArticles => "Authorship of scholarly articles",
            Self::Exhibitions => "Display of work at exhibitions or showcases",
            Self::LeadingRole => "Leading or critical role for distinguished organizations",
            Self::HighRemuneration => "High salary or remuneration",
            Self::CommercialSuccess => "Commercial success in the performing arts",
        }
    }

    /// Zero-based position in [`Criterion::ALL`].
    #[must_use]
    pub const fn ordinal(self) -> usize {
        match self {
            Self::Awards => 0,
            Self::Membership => 1,
            Self::PublishedMaterial => 2,
            Self::Judging => 3,
            Self::OriginalContribution => 4,
            Self::ScholarlyArticles => 5,
            Self::Exhibitions => 6,
            Self::LeadingRole => 7,
            Self::HighRemuneration => 8,
            Self::CommercialSuccess => 9,
        }
    }

    /// Look up a criterion by its code (`"C1"`..`"C10"`, case-insensitive).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Criterion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| CoreError::UnknownCriterion(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Strength
// ---------------------------------------------------------------------------

/// How well the evidence satisfies a criterion.
///
/// ```text
/// None (0) < Weak (1) < Strong (2)
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub enum Strength {
    #[default]
    None,
    Weak,
    Strong,
}

impl Strength {
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Weak => 1,
            Self::Strong => 2,
        }
    }

    /// Inverse of [`Strength::rank`]. Ranks above 2 saturate to `Strong`.
    #[must_use]
    pub const fn from_rank(rank: u8) -> Self {
        match rank {
            0 => Self::None,
            1 => Self::Weak,
            _ => Self::Strong,
        }
    }

    /// The higher-ranked of two strengths.
    #[must_use]
    pub const fn upgrade(self, proposed: Self) -> Self {
        if proposed.rank() > self.rank() {
            proposed
        } else {
            self
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Weak => "Weak",
            Self::Strong => "Strong",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strength {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "weak" => Ok(Self::Weak),
            "strong" => Ok(Self::Strong),
            other => Err(CoreError::Validation(format!("unknown strength '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// EvidenceCategory
// ---------------------------------------------------------------------------

/// Kind of extracted evidence item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceCategory {
    Award,
    Publication,
    Membership,
    MediaMention,
    JudgingActivity,
    Grant,
    LeadershipRole,
    CompensationRecord,
    Exhibition,
    CommercialSuccess,
    OriginalContribution,
}

impl EvidenceCategory {
    pub const ALL: [Self; 11] = [
        Self::Award,
        Self::Publication,
        Self::Membership,
        Self::MediaMention,
        Self::JudgingActivity,
        Self::Grant,
        Self::LeadershipRole,
        Self::CompensationRecord,
        Self::Exhibition,
        Self::CommercialSuccess,
        Self::OriginalContribution,
    ];

    /// Short tag prepended to identity tokens.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Award => "awd",
            Self::Publication => "pub",
            Self::Membership => "mem",
            Self::MediaMention => "med",
            Self::JudgingActivity => "jdg",
            Self::Grant => "grt",
            Self::LeadershipRole => "ldr",
            Self::CompensationRecord => "cmp",
            Self::Exhibition => "exh",
            Self::CommercialSuccess => "com",
            Self::OriginalContribution => "orc",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Award => "award",
            Self::Publication => "publication",
            Self::Membership => "membership",
            Self::MediaMention => "media_mention",
            Self::JudgingActivity => "judging_activity",
            Self::Grant => "grant",
            Self::LeadershipRole => "leadership_role",
            Self::CompensationRecord => "compensation_record",
            Self::Exhibition => "exhibition",
            Self::CommercialSuccess => "commercial_success",
            Self::OriginalContribution => "original_contribution",
        }
    }
}

impl fmt::Display for EvidenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PipelineStage
// ---------------------------------------------------------------------------

/// Downstream analysis stage.
///
/// ```text
/// extraction → strength_evaluation → gap_analysis → case_strategy → consolidation
///                                  → risk_probability
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    StrengthEvaluation,
    GapAnalysis,
    CaseStrategy,
    Consolidation,
    RiskProbability,
}

/// What a stage must find in the store before it may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    Extraction,
    Stage(PipelineStage),
}

impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extraction => f.write_str("extraction"),
            Self::Stage(stage) => f.write_str(stage.as_str()),
        }
    }
}

impl PipelineStage {
    pub const ALL: [Self; 5] = [
        Self::StrengthEvaluation,
        Self::GapAnalysis,
        Self::CaseStrategy,
        Self::Consolidation,
        Self::RiskProbability,
    ];

    /// The stored output this stage requires.
    #[must_use]
    pub const fn prerequisite(self) -> Prerequisite {
        match self {
            Self::StrengthEvaluation => Prerequisite::Extraction,
            Self::GapAnalysis | Self::RiskProbability => {
                Prerequisite::Stage(Self::StrengthEvaluation)
            }
            Self::CaseStrategy => Prerequisite::Stage(Self::GapAnalysis),
            Self::Consolidation => Prerequisite::Stage(Self::CaseStrategy),
        }
    }

    /// Output schema name registered in the schema registry.
    #[must_use]
    pub const fn schema_name(self) -> &'static str {
        match self {
            Self::StrengthEvaluation => "strength_evaluation",
            Self::GapAnalysis => "gap_analysis",
            Self::CaseStrategy => "case_strategy",
            Self::Consolidation => "consolidation",
            Self::RiskProbability => "risk_assessment",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StrengthEvaluation => "strength_evaluation",
            Self::GapAnalysis => "gap_analysis",
            Self::CaseStrategy => "case_strategy",
            Self::Consolidation => "consolidation",
            Self::RiskProbability => "risk_probability",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineStage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown pipeline stage '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// VersionSource
// ---------------------------------------------------------------------------

/// Which path produced an analysis version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VersionSource {
    /// Full snapshot from an extraction run. May reset strengths.
    Extraction,
    /// Externally proposed criterion updates (upgrade-only).
    Incremental,
    /// Re-evaluation after a new document (upgrade-only).
    Reanalysis,
    /// Update requested by an agent action (upgrade-only).
    Agent,
}

impl VersionSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Extraction => "extraction",
            Self::Incremental => "incremental",
            Self::Reanalysis => "reanalysis",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

/// Qualitative risk classification for a criterion or portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

/// Severity of a red flag or gap. `Critical` is the top severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Filing recommendation derived from the final denial probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FilingRecommendation {
    FileNow,
    StrengthenFirst,
    MajorGaps,
}
