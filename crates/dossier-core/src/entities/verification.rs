use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Criterion, Strength};

/// Outcome of checking one uploaded document against one criterion.
///
/// Versioned per `(document_id, criterion)`; never merged into analysis
/// versions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VerificationRecord {
    pub id: String,
    pub case_id: String,
    pub document_id: String,
    pub criterion: Criterion,
    pub version: u32,
    pub strength: Strength,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub evidence: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Model judgement of one document against one criterion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DocumentVerification {
    pub strength: Strength,
    pub reason: String,
    #[serde(default)]
    pub evidence: Vec<String>,
}

/// Registered case document (metadata only; content lives in blob storage).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CaseDocument {
    pub id: String,
    pub case_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A recommendation letter author attached to a case.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Recommender {
    pub id: String,
    pub case_id: String,
    pub name: String,
    #[serde(default)]
    pub relationship: Option<String>,
    pub created_at: DateTime<Utc>,
}
