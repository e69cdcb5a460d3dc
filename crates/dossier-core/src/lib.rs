//! # dossier-core
//!
//! Core types, evidence identity, and merge rules for Dossier.
//!
//! This crate provides the foundational types shared across all Dossier crates:
//! - Evaluation criteria, strength levels, and pipeline stage enums
//! - Evidence item structs and the aggregate extraction document
//! - Analysis versions, verification records, and stage outputs
//! - Deterministic content-hash identity for evidence items
//! - The upgrade-only strength merge applied to analysis versions
//! - Deep structural merge for partial profile updates
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod merge;
pub mod version_merge;
