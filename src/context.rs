// src/context.rs

use std::path::PathBuf;

use directories::ProjectDirs;

pub const APP_QUALIFIER: &str = "org";
pub const APP_ORG: &str = "formulario";
pub const APP_ID: &str = "formulario-transporte";

pub const STORE_DIR: &str = "store";
pub const EXPORTS_DIR: &str = "exports";

pub const ENV_DATA_DIR: &str = "FORMULARIO_DATA_DIR";
pub const ENV_DEBUG: &str = "FORMULARIO_DEBUG";
pub const ENV_DRAFT_DEBOUNCE_MS: &str = "FORMULARIO_DRAFT_DEBOUNCE_MS";

pub const DEFAULT_STORAGE_PREFIX: &str = "formulario_";
pub const DEFAULT_DRAFT_DEBOUNCE_MS: u64 = 2_000;
pub const DEFAULT_CLOCK_REFRESH_MS: u64 = 1_000;
pub const DEFAULT_HISTORY_CAP: usize = 100;
pub const DEFAULT_MAX_REPORTED_INVALID: usize = 3;

/// Tunables for the form engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub storage_prefix: String,
    pub draft_debounce_ms: u64,
    pub clock_refresh_ms: u64,
    pub history_cap: usize,
    /// How many invalid field names a failed submit reports to the user.
    pub max_reported_invalid: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            draft_debounce_ms: DEFAULT_DRAFT_DEBOUNCE_MS,
            clock_refresh_ms: DEFAULT_CLOCK_REFRESH_MS,
            history_cap: DEFAULT_HISTORY_CAP,
            max_reported_invalid: DEFAULT_MAX_REPORTED_INVALID,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let mut s = Self::default();

        if let Some(ms) = std::env::var(ENV_DRAFT_DEBOUNCE_MS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            s.draft_debounce_ms = ms;
        }

        s
    }
}

#[derive(Debug, Clone)]
pub struct AppCtx {
    pub app_data_dir: PathBuf,
    pub debug: bool,
}

impl AppCtx {
    pub fn new(app_data_dir: PathBuf) -> Self {
        let debug = std::env::var(ENV_DEBUG)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            app_data_dir,
            debug,
        }
    }

    /// Resolve the data dir: `FORMULARIO_DATA_DIR`, else the platform data dir.
    pub fn from_env() -> Option<Self> {
        if let Ok(p) = std::env::var(ENV_DATA_DIR) {
            if !p.trim().is_empty() {
                return Some(Self::new(PathBuf::from(p)));
            }
        }

        let proj = ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_ID)?;
        Some(Self::new(proj.data_dir().to_path_buf()))
    }

    /// <app_data>/store
    pub fn store_dir(&self) -> PathBuf {
        self.app_data_dir.join(STORE_DIR)
    }

    /// <app_data>/exports
    pub fn exports_dir(&self) -> PathBuf {
        self.app_data_dir.join(EXPORTS_DIR)
    }
}

// ======================================================
// Unit Tests
// ======================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_form_policy() {
        let s = Settings::default();
        assert_eq!(s.storage_prefix, "formulario_");
        assert_eq!(s.draft_debounce_ms, 2_000);
        assert_eq!(s.history_cap, 100);
        assert_eq!(s.max_reported_invalid, 3);
    }

    #[test]
    fn ctx_paths_hang_off_data_dir() {
        let ctx = AppCtx::new(PathBuf::from("/tmp/formulario-test"));
        assert_eq!(ctx.store_dir(), PathBuf::from("/tmp/formulario-test/store"));
        assert_eq!(
            ctx.exports_dir(),
            PathBuf::from("/tmp/formulario-test/exports")
        );
    }
}
