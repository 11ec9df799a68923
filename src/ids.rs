// src/ids.rs

//! Daily-scoped entry numbers: `<PREFIX>-<YY><MM><DD>-<seq:4>`.
//!
//! The counter lives in the store under `contador-<tag>-<YYMMDD>`. A new day
//! reads a key that has never been written, so sequences restart at 1 without
//! any rollover logic. If the wall clock moves backwards, the counter of that
//! earlier day is picked up again where it stopped.

use chrono::NaiveDate;
use serde_json::Value as JsonValue;

use crate::command_state::lock_store;
use crate::error::AppResult;
use crate::storage::Persistence;
use crate::types::{AppState, FormKind};

pub fn day_stamp(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

pub fn counter_key(kind: FormKind, date: NaiveDate) -> String {
    format!("contador-{}-{}", kind.counter_tag(), day_stamp(date))
}

pub fn format_identifier(kind: FormKind, date: NaiveDate, seq: u32) -> String {
    format!("{}-{}-{:04}", kind.id_prefix(), day_stamp(date), seq)
}

fn counter_from_json(v: &JsonValue) -> Option<u32> {
    match v {
        JsonValue::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        JsonValue::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Current counter value for `date` (0 when the day has no identifiers yet).
pub fn current_counter(store: &Persistence, kind: FormKind, date: NaiveDate) -> AppResult<u32> {
    let key = counter_key(kind, date);
    let Some(v) = store.load(&key)? else {
        return Ok(0);
    };

    match counter_from_json(&v) {
        Some(n) => Ok(n),
        None => {
            tracing::warn!(key, value = %v, "unreadable identifier counter, restarting at 0");
            Ok(0)
        }
    }
}

/// Read, increment and persist the day counter in one step, then format it.
pub fn next_identifier(store: &mut Persistence, kind: FormKind, date: NaiveDate) -> AppResult<String> {
    let seq = current_counter(store, kind, date)?.saturating_add(1);
    store.save(&counter_key(kind, date), &JsonValue::from(seq))?;
    Ok(format_identifier(kind, date, seq))
}

/// Fresh identifier for a new form instance, dated with the app clock.
pub fn generate(state: &AppState, kind: FormKind) -> AppResult<String> {
    let today = state.clock.today();
    let mut store = lock_store(state)?;
    next_identifier(&mut store, kind, today)
}

/// Sequence suffix of an identifier (`SOL-240110-0007` -> 7).
pub fn sequence_of(identifier: &str) -> Option<u32> {
    identifier.rsplit('-').next()?.parse().ok()
}

// ======================================================
// Unit Tests
// ======================================================
