pub mod config;
pub mod counters;
pub mod database;

pub use config::Config;
pub use database::Database;

use std::path::PathBuf;

use crate::error::{CoreError, StorageError};

/// Durable key -> string-value map.
///
/// Every write overwrites the previous value for its key; there is no
/// append. Implemented by [`Database`]; tests substitute in-memory fakes
/// to simulate read/write failures.
pub trait KvStore: Send + Sync {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Directory holding the config file and the database:
/// `~/.config/pausely`, or `~/.config/pausely-dev` when `PAUSELY_ENV=dev`.
/// Created on first use.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("PAUSELY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pausely-dev")
    } else {
        base_dir.join("pausely")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
