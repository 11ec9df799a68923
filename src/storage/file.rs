// src/storage/file.rs

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{AppError, AppResult};

use super::KeyValueStore;

// Same order of magnitude as a browser origin's local storage quota.
const VALUE_MAX_BYTES: u64 = 5 * 1024 * 1024;
const ENTRY_EXT: &str = "json";
const TMP_PREFIX: &str = ".entry.";

/// One file per key under a directory. File names are the hex of the key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| AppError::StoreWriteFailed(format!("store dir create: {e}")))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> AppResult<PathBuf> {
        if key.is_empty() {
            return Err(AppError::StoreInvalidKey(key.to_string()));
        }
        Ok(self
            .dir
            .join(format!("{}.{ENTRY_EXT}", hex::encode(key.as_bytes()))))
    }
}

fn key_from_file_name(name: &str) -> Option<String> {
    let stem = name.strip_suffix(&format!(".{ENTRY_EXT}"))?;
    let bytes = hex::decode(stem).ok()?;
    String::from_utf8(bytes).ok()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.entry_path(key)?;

        let meta = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::StoreReadFailed(e.to_string())),
        };

        let bytes = meta.len();
        if bytes > VALUE_MAX_BYTES {
            return Err(AppError::StoreTooLarge {
                bytes,
                max: VALUE_MAX_BYTES,
            });
        }

        let text = fs::read_to_string(&path).map_err(|e| AppError::StoreReadFailed(e.to_string()))?;
        Ok(Some(text))
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        let path = self.entry_path(key)?;

        let bytes = value.len() as u64;
        if bytes > VALUE_MAX_BYTES {
            return Err(AppError::StoreTooLarge {
                bytes,
                max: VALUE_MAX_BYTES,
            });
        }

        let mut rnd = [0u8; 12];
        OsRng.fill_bytes(&mut rnd);
        let tmp = self
            .dir
            .join(format!("{TMP_PREFIX}{}.tmp", hex::encode(rnd)));

        debug_assert_eq!(
            tmp.parent(),
            path.parent(),
            "temp file must be in same directory for atomic rename"
        );

        let mut f = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&tmp)
            .map_err(|e| AppError::StoreWriteFailed(e.to_string()))?;

        let write_res: AppResult<()> = (|| {
            f.write_all(value.as_bytes())
                .map_err(|e| AppError::StoreWriteFailed(e.to_string()))?;
            f.flush()
                .map_err(|e| AppError::StoreWriteFailed(e.to_string()))?;
            f.sync_all()
                .map_err(|e| AppError::StoreWriteFailed(e.to_string()))?;

            fs::rename(&tmp, &path).map_err(|e| AppError::StoreWriteFailed(e.to_string()))?;
            Ok(())
        })();

        if write_res.is_err() {
            let _ = fs::remove_file(&tmp);
        }

        write_res
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        let path = self.entry_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::StoreWriteFailed(e.to_string())),
        }
    }

    fn keys(&self) -> AppResult<Vec<String>> {
        let rd = fs::read_dir(&self.dir).map_err(|e| AppError::StoreReadFailed(e.to_string()))?;

        let mut out: Vec<String> = rd
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().to_str().and_then(key_from_file_name))
            .collect();

        out.sort();
        Ok(out)
    }
}

// ======================================================
// Unit Tests
// ======================================================
