// src/command_state.rs

use crate::{
    activity_log::ActivityLog,
    error::{AppError, AppResult},
    storage::Persistence,
    types::AppState,
};
use std::sync::MutexGuard;

// ======================================================
// locking helpers
// ======================================================

pub fn lock_store<'a>(state: &'a AppState) -> AppResult<MutexGuard<'a, Persistence>> {
    state.store.lock().map_err(|_| AppError::StateLockPoisoned)
}

pub fn lock_activity_log<'a>(state: &'a AppState) -> AppResult<MutexGuard<'a, ActivityLog>> {
    state
        .activity_log
        .lock()
        .map_err(|_| AppError::StateLockPoisoned)
}

pub fn lock_current_signature<'a>(
    state: &'a AppState,
) -> AppResult<MutexGuard<'a, Option<String>>> {
    state
        .current_signature
        .lock()
        .map_err(|_| AppError::StateLockPoisoned)
}

// ======================================================
// scoped store access
// ======================================================

pub fn with_store<T>(
    state: &AppState,
    f: impl FnOnce(&mut Persistence) -> AppResult<T>,
) -> AppResult<T> {
    let mut guard = lock_store(state)?;
    f(&mut guard)
}

// ======================================================
// Unit Tests
// ======================================================
