// src/activity_log/store.rs

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use super::model::{
    ActivityClass, ActivityEvent, LOAD_TAIL_LINES, LOG_BACKUP_NAME, LOG_FILE_NAME, MAX_LOG_BYTES,
    MAX_LOG_EVENTS,
};

/// Bounded event log. In-memory ring of the latest events, mirrored to a JSONL
/// file when opened on a directory.
#[derive(Debug)]
pub struct ActivityLog {
    path: Option<PathBuf>,
    buf: VecDeque<ActivityEvent>,
    next_id: u64,
    store_failure_pending: bool,
}

impl ActivityLog {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            buf: VecDeque::with_capacity(MAX_LOG_EVENTS),
            next_id: 1,
            store_failure_pending: false,
        }
    }

    pub fn init(app_data_dir: &Path) -> Result<Self, String> {
        fs::create_dir_all(app_data_dir).map_err(|e| format!("activity log dir create: {e}"))?;

        let mut log = Self::in_memory();
        log.path = Some(app_data_dir.join(LOG_FILE_NAME));

        log.load_tail_best_effort();
        log.next_id = log.compute_next_id();

        Ok(log)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn record(
        &mut self,
        ts_ms: u64,
        class: ActivityClass,
        kind: &str,
        form: Option<&str>,
        context: &str,
        msg: &str,
    ) {
        let ev = ActivityEvent {
            id: self.alloc_id(),
            ts_ms,
            class,
            kind: kind.to_string(),
            form: form.map(str::to_string),
            context: context.to_string(),
            msg: msg.to_string(),
        };

        if self.buf.len() >= MAX_LOG_EVENTS {
            self.buf.pop_front();
        }
        self.buf.push_back(ev.clone());

        if class == ActivityClass::StoreFailure {
            self.store_failure_pending = true;
        }

        let Some(path) = self.path.as_deref() else {
            return;
        };

        if let Err(e) = rotate_if_needed(path)
            .and_then(|_| append_jsonl(path, &ev))
            .and_then(|_| trim_to_n_events(path, MAX_LOG_EVENTS))
        {
            tracing::debug!(error = %e, "activity log file write skipped");
        }
    }

    pub fn recent(&self) -> Vec<ActivityEvent> {
        self.buf.iter().cloned().collect()
    }

    pub fn take_store_failure_pending(&mut self) -> bool {
        std::mem::take(&mut self.store_failure_pending)
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn compute_next_id(&self) -> u64 {
        self.buf
            .iter()
            .map(|e| e.id)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }

    fn load_tail_best_effort(&mut self) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        let Some((lines, _)) = read_tail(path, LOAD_TAIL_LINES) else {
            return;
        };

        let events = lines
            .iter()
            .filter_map(|l| serde_json::from_str::<ActivityEvent>(l).ok());
        for ev in events {
            if self.buf.len() >= MAX_LOG_EVENTS {
                self.buf.pop_front();
            }
            self.buf.push_back(ev);
        }
    }
}

// ======================================================
// file helpers
// ======================================================

/// Last `n` lines of `path`, and whether older lines were dropped.
fn read_tail(path: &Path, n: usize) -> Option<(VecDeque<String>, bool)> {
    let file = File::open(path).ok()?;

    let mut tail = VecDeque::with_capacity(n.min(LOAD_TAIL_LINES));
    let mut dropped = false;
    for line in BufReader::new(file).lines().map_while(Result::ok) {
        if tail.len() == n {
            tail.pop_front();
            dropped = true;
        }
        tail.push_back(line);
    }
    Some((tail, dropped))
}

fn sync_parent_dir(path: &Path) {
    let Some(parent) = path.parent() else {
        return;
    };
    if let Ok(dir) = File::open(parent) {
        let _ = dir.sync_all();
    }
}

fn rotate_if_needed(path: &Path) -> Result<(), String> {
    let too_big = fs::metadata(path).is_ok_and(|m| m.len() > MAX_LOG_BYTES);
    if !too_big {
        return Ok(());
    }

    let backup = path.with_file_name(LOG_BACKUP_NAME);
    let _ = fs::remove_file(&backup);
    fs::rename(path, &backup).map_err(|e| format!("activity log rotate: {e}"))?;
    sync_parent_dir(path);
    Ok(())
}

fn append_jsonl(path: &Path, ev: &ActivityEvent) -> Result<(), String> {
    let mut line = serde_json::to_string(ev).map_err(|e| format!("activity log json: {e}"))?;
    line.push('\n');

    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("activity log open: {e}"))?;
    f.write_all(line.as_bytes())
        .map_err(|e| format!("activity log write: {e}"))?;
    let _ = f.sync_all();
    Ok(())
}

/// Keep only the newest `n` lines, rewriting through a temp file.
fn trim_to_n_events(path: &Path, n: usize) -> Result<(), String> {
    if n == 0 {
        return Ok(());
    }
    let Some((tail, true)) = read_tail(path, n) else {
        return Ok(());
    };

    let mut body = String::new();
    for line in &tail {
        body.push_str(line);
        body.push('\n');
    }

    let tmp = path.with_extension("jsonl.tmp");
    {
        let mut out = File::create(&tmp).map_err(|e| format!("activity log trim tmp: {e}"))?;
        out.write_all(body.as_bytes())
            .map_err(|e| format!("activity log trim write: {e}"))?;
        let _ = out.sync_all();
    }

    fs::rename(&tmp, path).map_err(|e| format!("activity log trim rename: {e}"))?;
    sync_parent_dir(path);
    Ok(())
}

// ======================================================
// Unit Tests
// ======================================================
