// src/activity_log/model.rs

use serde::{Deserialize, Serialize};

pub const LOG_FILE_NAME: &str = "activity.log.jsonl";
pub const LOG_BACKUP_NAME: &str = "activity.log.jsonl.1";

pub const MAX_LOG_BYTES: u64 = 2 * 1024 * 1024;
pub const MAX_LOG_EVENTS: usize = 50;
pub const LOAD_TAIL_LINES: usize = 400;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityClass {
    StoreFailure,
    FormEvent,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: u64,
    pub ts_ms: u64,
    pub class: ActivityClass,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    pub context: String,
    pub msg: String,
}
