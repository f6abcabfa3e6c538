use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use super::config::SqliteConfig;
use super::Sqlite;

pub struct SqliteFactory;

impl SqliteFactory {
    pub fn new() -> Self {
        Self {}
    }

    pub fn build_sqlite(&self, cfg: &SqliteConfig) -> Result<Sqlite> {
        if cfg.memory {
            warn!("Using in-memory sqlite database, all tokens will be lost when the server stops");
            return Sqlite::memory();
        }

        info!("Using sqlite database: {}", cfg.path);
        Sqlite::open(Path::new(&cfg.path))
            .with_context(|| format!("open sqlite database '{}'", cfg.path))
    }
}
