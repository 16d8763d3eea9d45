//! Per-label ordering of mutations.
//!
//! A label event holds its label's lock from the storage write until fanout
//! has queued every message, so each session's channel sees the writes to a
//! label in the order storage applied them.

use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;

use tokio::sync::{Mutex, MutexGuard};

use tabletop_domain::LabelId;

const STRIPES: usize = 64;

/// Fixed pool of locks shared by hashing label ids onto it.
pub struct LabelLocks {
    stripes: Box<[Mutex<()>]>,
    hasher: RandomState,
}

impl LabelLocks {
    pub fn new() -> Self {
        Self {
            stripes: (0..STRIPES).map(|_| Mutex::new(())).collect(),
            hasher: RandomState::new(),
        }
    }

    /// Wait for exclusive access to `id`. Unrelated labels may share a stripe.
    pub async fn lock(&self, id: LabelId) -> MutexGuard<'_, ()> {
        let index = self.hasher.hash_one(id) as usize % self.stripes.len();
        self.stripes[index].lock().await
    }
}

impl Default for LabelLocks {
    fn default() -> Self {
        Self::new()
    }
}
