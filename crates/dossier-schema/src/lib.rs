//! # dossier-schema
//!
//! JSON Schema generation, validation, and registry for Dossier.
//!
//! Every completion output contract is registered here by name. The pipeline
//! validates a model's raw JSON against the named schema before decoding it,
//! so a malformed completion surfaces as a validation failure rather than a
//! serde error deep inside a stage.
//!
//! Entity types are defined in `dossier-core` with `#[derive(JsonSchema)]`.
//! This crate imports those types and provides the registry, validation, and
//! export layer.

pub mod error;
pub mod names;
pub mod registry;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
