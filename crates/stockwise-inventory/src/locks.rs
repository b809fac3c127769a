//! Keyed async mutexes.
//!
//! Callers touching the same key queue up behind one another; different
//! keys never contend beyond the brief map lookup.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Map size above which idle entries are swept on the next acquire.
const PRUNE_THRESHOLD: usize = 256;

#[derive(Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`. Released when the guard drops.
    pub async fn acquire(&self, key: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() >= PRUNE_THRESHOLD {
                // Only the map holds a reference: nobody owns or awaits it.
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            Arc::clone(
                locks
                    .entry(key)
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    /// Number of keys currently tracked.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn same_key_is_exclusive() {
        let locks = Arc::new(KeyedLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let key = Uuid::new_v4();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let inside = Arc::clone(&inside);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(key).await;
                assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                tokio::time::sleep(Duration::from_millis(5)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn different_keys_do_not_block() {
        let locks = KeyedLocks::new();
        let _a = locks.acquire(Uuid::new_v4()).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire(Uuid::new_v4())).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn idle_entries_are_pruned() {
        let locks = KeyedLocks::new();
        for _ in 0..PRUNE_THRESHOLD {
            drop(locks.acquire(Uuid::new_v4()).await);
        }
        assert_eq!(locks.len().await, PRUNE_THRESHOLD);

        let held = locks.acquire(Uuid::new_v4()).await;
        assert_eq!(locks.len().await, 1);
        drop(held);
        assert!(!locks.is_empty().await);
    }
}
