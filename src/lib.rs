// src/lib.rs

pub mod activity_log;
pub mod archive;
pub mod clock;
pub mod command_state;
pub mod context;
pub mod error;
pub mod form;
pub mod guard;
pub mod ids;
pub mod notify;
pub mod print;
pub mod schema;
pub mod signature;
pub mod storage;
pub mod types;
pub mod validate;

use crate::activity_log::ActivityLog;
use crate::clock::{Clock, SystemClock};
use crate::context::{AppCtx, Settings, STORE_DIR};
use crate::storage::{FileStore, KeyValueStore, MemoryStore, Persistence};
use crate::types::AppState;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Open the engine on a data directory: file-backed store under `store/`,
/// activity log next to it, system clock, settings from the environment.
pub fn init_state(app_data_dir: &Path) -> Result<AppState, String> {
    std::fs::create_dir_all(app_data_dir)
        .map_err(|e| format!("Failed to create app data dir: {e}"))?;

    let store = FileStore::open(app_data_dir.join(STORE_DIR))
        .map_err(|e| format!("Failed to open store: {e}"))?;
    let activity_log = ActivityLog::init(app_data_dir)?;

    Ok(AppState::new(
        Box::new(store),
        Arc::new(SystemClock),
        Settings::from_env(),
        activity_log,
    ))
}

/// Resolve the data directory from the environment (or platform default)
/// and open the engine on it.
pub fn init_default() -> Result<(AppCtx, AppState), String> {
    let ctx = AppCtx::from_env().ok_or_else(|| "No usable data directory".to_string())?;
    let state = init_state(&ctx.app_data_dir)?;

    tracing::debug!(dir = %ctx.app_data_dir.display(), debug = ctx.debug, "engine state initialized");
    Ok((ctx, state))
}

impl AppState {
    pub fn new(
        backend: Box<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        settings: Settings,
        activity_log: ActivityLog,
    ) -> Self {
        let store = Persistence::new(settings.storage_prefix.clone(), backend, clock.clone());

        Self {
            store: Mutex::new(store),
            clock,
            settings,
            current_signature: Mutex::new(None),
            activity_log: Mutex::new(activity_log),
        }
    }

    /// Default settings, in-memory activity log, caller-supplied backend.
    pub fn with_backend(backend: Box<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self::new(backend, clock, Settings::default(), ActivityLog::in_memory())
    }

    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::with_backend(Box::new(MemoryStore::new()), clock)
    }
}
