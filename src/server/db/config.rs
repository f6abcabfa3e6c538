use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{CommonConfig, PathSet};

use super::cache::config::CacheConfig;
use super::sqlite::config::SqliteConfig;

/// Database configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DbConfig {
    /// Database type to use
    #[serde(default)]
    pub name: DbType,

    /// SQLite configuration, only valid when database type is sqlite
    #[serde(default)]
    pub sqlite: SqliteConfig,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Database type
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
pub enum DbType {
    /// Use SQLite database
    #[serde(rename = "sqlite")]
    #[default]
    Sqlite,
}

impl CommonConfig for DbConfig {
    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        self.sqlite.complete(ps).context("sqlite")?;
        self.cache.complete(ps).context("cache")?;
        Ok(())
    }
}
