//! Per-consultation turn serialization.
//!
//! Two racing turns on the same consultation must not interleave their
//! transcript reads, or the provider could see a transcript whose last
//! entry is not the turn being answered, and replies could duplicate. The
//! registry hands out one async mutex per consultation; `append_user_turn`
//! holds the guard for its entire duration. Turns on different
//! consultations proceed independently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::ConsultationId;

/// Registry of per-consultation locks.
///
/// The map keeps one entry per consultation that has ever taken a turn in
/// this process; entries are a single `Arc` + mutex and are reused across
/// turns.
#[derive(Default)]
pub struct TurnLocks {
    locks: Mutex<HashMap<ConsultationId, Arc<AsyncMutex<()>>>>,
}

impl TurnLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one consultation, waiting behind any turn
    /// already in flight for it.
    pub async fn acquire(&self, id: ConsultationId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap();
            locks
                .entry(id)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
