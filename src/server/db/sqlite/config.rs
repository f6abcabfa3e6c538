use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SqliteConfig {
    /// Keep the registry in memory only, it is lost when the server stops.
    #[serde(default)]
    pub memory: bool,

    /// Database file, default is `{data_dir}/topicgate.db`.
    #[serde(default)]
    pub path: String,
}

impl CommonConfig for SqliteConfig {
    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        if self.memory {
            return Ok(());
        }

        self.path = expandenv("path", &self.path)?;
        if self.path.is_empty() {
            let path = ps.data_dir.join("topicgate.db");
            self.path = format!("{}", path.display());
        }

        Ok(())
    }
}
