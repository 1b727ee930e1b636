use anyhow::{Context, Result};
use std::path::PathBuf;

const DEFAULT_DB_FILE: &str = "recipes.db";

pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    /// Resolve the store location. The whole catalog lives in a single
    /// SQLite file; without an override it sits in the working directory
    /// the server was started from.
    pub fn resolve(db: Option<PathBuf>) -> Result<Self> {
        let db_path = db.unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create data directory: {}", parent.display())
                })?;
            }
        }

        Ok(Config { db_path })
    }
}
