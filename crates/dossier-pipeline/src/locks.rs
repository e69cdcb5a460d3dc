//! Per-case serialization of analysis version appends.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

/// One async mutex per case id, created on first use.
///
/// Holding the guard makes read-latest-then-append single-writer per case
/// within this process. Distinct cases never contend.
#[derive(Debug, Default)]
pub struct CaseLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl CaseLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, case_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(case_id.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}
