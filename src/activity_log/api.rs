// src/activity_log/api.rs

use crate::command_state::lock_activity_log;
use crate::error::{AppError, AppResult};
use crate::types::{AppState, FormKind};

use super::model::{ActivityClass, ActivityEvent};

pub fn record_store_failure(state: &AppState, kind: FormKind, context: &str, err: &AppError) {
    let ts = state.clock.now_ms();
    let form = kind.to_string();

    let mut log = match state.activity_log.lock() {
        Ok(g) => g,
        Err(_) => return,
    };

    log.record(
        ts,
        ActivityClass::StoreFailure,
        store_failure_kind(err),
        Some(&form),
        context,
        &err.to_string(),
    );
}

pub fn record_form_event(state: &AppState, kind: FormKind, event: &str, msg: &str) {
    let ts = state.clock.now_ms();
    let form = kind.to_string();

    let mut log = match state.activity_log.lock() {
        Ok(g) => g,
        Err(_) => return,
    };

    log.record(ts, ActivityClass::FormEvent, event, Some(&form), event, msg);
}

/// Latest events, oldest first.
pub fn recent_activity(state: &AppState) -> AppResult<Vec<ActivityEvent>> {
    Ok(lock_activity_log(state)?.recent())
}

pub fn take_store_failure_pending(state: &AppState) -> bool {
    match state.activity_log.lock() {
        Ok(mut log) => log.take_store_failure_pending(),
        Err(_) => false,
    }
}

fn store_failure_kind(err: &AppError) -> &'static str {
    match err {
        AppError::StoreReadFailed(_) => "read",
        AppError::StoreWriteFailed(_) | AppError::Io(_) => "write",
        AppError::StoreInvalidJson { .. } => "corrupt",
        AppError::StoreTooLarge { .. } => "quota",
        AppError::StoreInvalidKey(_) => "key",
        _ => "other",
    }
}
