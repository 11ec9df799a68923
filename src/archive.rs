// src/archive.rs

//! Submitted records: a bounded, newest-first history per form kind plus a
//! "last submission" slot, and JSON export of a record.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{AppError, AppResult};
use crate::storage::Persistence;
use crate::types::{FieldValue, FormKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
}

/// Signature ids attached to a record, by role.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSignatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
}

impl RecordSignatures {
    pub fn is_empty(&self) -> bool {
        self.responsable.is_none() && self.director.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub tipo_formulario: FormKind,
    pub identificador: String,
    /// ISO-8601 UTC with milliseconds.
    pub fecha_registro: String,
    #[serde(default)]
    pub estado: SubmissionStatus,
    pub campos: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "RecordSignatures::is_empty")]
    pub firmas: RecordSignatures,
}

/// Prepend `record` to the kind's history (truncated to `cap`) and make it
/// the last submission. If the last-submission write fails the previous
/// history is written back before the error is returned. A record whose
/// identifier already heads the history replaces that entry.
pub fn archive(
    store: &mut Persistence,
    record: &SubmissionRecord,
    cap: usize,
) -> AppResult<()> {
    let kind = record.tipo_formulario;
    let entry = serde_json::to_value(record)
        .map_err(|e| AppError::StoreWriteFailed(format!("record encode: {e}")))?;

    let previous = store.load(kind.history_key())?;
    let mut history = match &previous {
        None => Vec::new(),
        Some(JsonValue::Array(items)) => items.clone(),
        Some(_) => {
            return Err(AppError::StoreInvalidJson {
                key: kind.history_key().to_string(),
                detail: "history is not an array".into(),
            })
        }
    };

    if history.first().is_some_and(|head| same_identifier(head, &record.identificador)) {
        history[0] = entry.clone();
    } else {
        history.insert(0, entry.clone());
    }
    history.truncate(cap);

    store.save(kind.history_key(), &JsonValue::Array(history))?;
    if let Err(e) = store.save(kind.last_key(), &entry) {
        restore_history(store, kind, previous);
        return Err(e);
    }

    tracing::debug!(kind = %kind, id = %record.identificador, "submission archived");
    Ok(())
}

fn same_identifier(entry: &JsonValue, id: &str) -> bool {
    entry.get("identificador").and_then(JsonValue::as_str) == Some(id)
}

fn restore_history(store: &mut Persistence, kind: FormKind, previous: Option<JsonValue>) {
    let res = match previous {
        Some(v) => store.save(kind.history_key(), &v),
        None => store.delete(kind.history_key()),
    };
    if let Err(e) = res {
        tracing::warn!(kind = %kind, error = %e, "history not rolled back after failed archive");
    }
}

/// Archived records, newest first. Entries that no longer parse are skipped.
pub fn history(store: &Persistence, kind: FormKind) -> AppResult<Vec<SubmissionRecord>> {
    let Some(v) = store.load(kind.history_key())? else {
        return Ok(Vec::new());
    };
    let JsonValue::Array(items) = v else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(r) => Some(r),
            Err(e) => {
                tracing::warn!(kind = %kind, error = %e, "skipping unreadable history entry");
                None
            }
        })
        .collect())
}

pub fn last(store: &Persistence, kind: FormKind) -> AppResult<Option<SubmissionRecord>> {
    store.load_as(kind.last_key())
}

/// `<name>_<millis>.json`, the download name used for exports.
pub fn export_file_name(name: &str, now_ms: u64) -> String {
    format!("{name}_{now_ms}.json")
}

/// Write `value` pretty-printed into `dir`. Returns the created path.
pub fn export_json<T: Serialize>(
    dir: &Path,
    name: &str,
    value: &T,
    now_ms: u64,
) -> AppResult<PathBuf> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::ExportFailed(format!("json encode: {e}")))?;

    fs::create_dir_all(dir).map_err(|e| AppError::ExportFailed(format!("export dir: {e}")))?;

    let path = dir.join(export_file_name(name, now_ms));
    fs::write(&path, text).map_err(|e| AppError::ExportFailed(e.to_string()))?;
    Ok(path)
}

// ======================================================
// Unit Tests
// ======================================================
