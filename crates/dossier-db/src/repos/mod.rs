//! Repository modules for all Dossier records.
//!
//! Each module adds methods to `DossierStore` via `impl DossierStore` blocks.

pub mod analysis;
pub mod extraction;
pub mod inventory;
pub mod profile;
pub mod stage;
pub mod verification;
