// src/storage/mod.rs

//! Key/value persistence port.
//!
//! [`KeyValueStore`] is the raw backend (string keys, string values, like a
//! browser's local storage). [`Persistence`] layers the app namespace, JSON
//! encoding and `_savedAt` stamping on top of it.

mod file;
mod memory;
mod persistence;

use crate::error::AppResult;

pub use file::FileStore;
pub use memory::{MemoryStore, WriteFaults};
pub use persistence::{saved_at, Persistence, SAVED_AT_FIELD};

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&mut self, key: &str) -> AppResult<()>;
    fn keys(&self) -> AppResult<Vec<String>>;
}
