//! Record ID prefixes.
//!
//! Stored records use `{prefix}-{8 hex chars}` IDs generated by the database.
//! Evidence items use content-hash identities instead (see [`crate::identity`]).

pub const PREFIX_EXTRACTION: &str = "ext";
pub const PREFIX_ANALYSIS_VERSION: &str = "anv";
pub const PREFIX_STAGE_OUTPUT: &str = "stg";
pub const PREFIX_VERIFICATION: &str = "ver";
pub const PREFIX_DOCUMENT: &str = "doc";
pub const PREFIX_RECOMMENDER: &str = "rec";

/// Every record prefix, for exhaustive tests.
pub const ALL_PREFIXES: [&str; 6] = [
    PREFIX_EXTRACTION,
    PREFIX_ANALYSIS_VERSION,
    PREFIX_STAGE_OUTPUT,
    PREFIX_VERIFICATION,
    PREFIX_DOCUMENT,
    PREFIX_RECOMMENDER,
];
