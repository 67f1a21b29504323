//! Per-key async locks.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per key, created on first use and dropped once no caller
/// holds or waits on it.
///
/// Operations on the same key are serialized; different keys never contend
/// beyond the map shard lookup.
#[derive(Debug, Default)]
pub(crate) struct KeyedLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub(crate) async fn lock(&self, key: &str) -> KeyGuard<'_> {
        // Declared first so a cancelled wait still runs eviction last.
        let mut held = KeyGuard {
            locks: &self.locks,
            key: key.to_owned(),
            guard: None,
        };

        // Clone the Arc out so the shard guard is released before awaiting.
        let mutex = Arc::clone(
            self.locks
                .entry(key.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );

        held.guard = Some(mutex.lock_owned().await);

        held
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}

/// Exclusive access to one key; releasing it evicts the key when idle.
#[derive(Debug)]
pub(crate) struct KeyGuard<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        // The owned guard holds its own Arc; release it before counting.
        drop(self.guard.take());

        // Waiters clone the Arc under the shard lock, so a count of one means
        // only the map still refers to the mutex.
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
