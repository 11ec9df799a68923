// src/storage/memory.rs

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{AppError, AppResult};

use super::KeyValueStore;

/// Shared handle that makes the next N writes of a [`MemoryStore`] fail.
#[derive(Debug, Clone, Default)]
pub struct WriteFaults {
    remaining: Arc<AtomicUsize>,
    // writes that still succeed before `remaining` starts counting
    grace: Arc<AtomicUsize>,
}

impl WriteFaults {
    pub fn fail_next(&self, n: usize) {
        self.grace.store(0, Ordering::SeqCst);
        self.remaining.store(n, Ordering::SeqCst);
    }

    pub fn fail_always(&self) {
        self.grace.store(0, Ordering::SeqCst);
        self.remaining.store(usize::MAX, Ordering::SeqCst);
    }

    /// Let `ok` more writes through, then fail every write until healed.
    pub fn fail_after(&self, ok: usize) {
        self.grace.store(ok, Ordering::SeqCst);
        self.remaining.store(usize::MAX, Ordering::SeqCst);
    }

    /// Let `ok` more writes through, fail the next one, then recover.
    pub fn fail_one_after(&self, ok: usize) {
        self.grace.store(ok, Ordering::SeqCst);
        self.remaining.store(1, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        self.grace.store(0, Ordering::SeqCst);
        self.remaining.store(0, Ordering::SeqCst);
    }

    fn hit(&self) -> bool {
        if self.remaining.load(Ordering::SeqCst) == 0 {
            return false;
        }
        let in_grace = self
            .grace
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |g| g.checked_sub(1))
            .is_ok();
        if in_grace {
            return false;
        }
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |x| match x {
                0 => None,
                usize::MAX => Some(usize::MAX),
                n => Some(n - 1),
            })
            .is_ok()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    faults: WriteFaults,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store plus a handle to inject write failures after it has been moved into app state.
    pub fn with_faults() -> (Self, WriteFaults) {
        let store = Self::default();
        let faults = store.faults.clone();
        (store, faults)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_write(&self, key: &str) -> AppResult<()> {
        if self.faults.hit() {
            return Err(AppError::StoreWriteFailed(format!(
                "injected write failure for {key:?}"
            )));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        self.check_write(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        self.check_write(key)?;
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> AppResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

// ======================================================
// Unit Tests
// ======================================================
