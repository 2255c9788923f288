//! Per-sheet serialization.
//!
//! Two regenerations of the same (event, round) run one after the other, so
//! the later one reads the stored RNG seed the earlier one committed and its
//! sheet replaces the earlier one wholesale. Different sheets do not wait on
//! each other here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use heat_core::enums::Round;
use tokio::sync::OwnedMutexGuard;

type SheetKey = (String, Round);

#[derive(Debug, Default)]
pub struct SheetLocks {
    inner: Mutex<HashMap<SheetKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl SheetLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of one heat sheet. Released on drop.
    pub async fn acquire(&self, event_id: &str, round: Round) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry((event_id.to_string(), round)).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of sheets that have been locked at least once.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
