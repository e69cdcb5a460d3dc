//! Store facade over the database and schema registry.
//!
//! `DossierStore` wraps `DossierDb` (raw database access) and `SchemaRegistry`
//! (validation of stage outputs before they are persisted). All repo methods
//! are implemented as `impl DossierStore` blocks in [`crate::repos`].

use dossier_schema::SchemaRegistry;

use crate::DossierDb;
use crate::error::DatabaseError;

pub struct DossierStore {
    db: DossierDb,
    schema: SchemaRegistry,
}

impl DossierStore {
    /// Open a store on a local database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = DossierDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `DossierDb`.
    #[must_use]
    pub fn from_db(db: DossierDb) -> Self {
        Self {
            db,
            schema: SchemaRegistry::new(),
        }
    }

    #[must_use]
    pub const fn db(&self) -> &DossierDb {
        &self.db
    }

    #[must_use]
    pub const fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }
}
