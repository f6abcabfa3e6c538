use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::{CommonConfig, PathSet};

/// Authorization related configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthzConfig {
    /// Methods for which the metadata bypass applies. Compared upper case.
    #[serde(default = "AuthzConfig::default_open_methods")]
    pub open_methods: Vec<String>,

    /// Path markers of the always-public catalog views. A request path
    /// containing any of them is open. Empty disables the bypass.
    #[serde(default = "AuthzConfig::default_open_paths")]
    pub open_paths: Vec<String>,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            open_methods: Self::default_open_methods(),
            open_paths: Self::default_open_paths(),
        }
    }
}

impl CommonConfig for AuthzConfig {
    fn complete(&mut self, _ps: &PathSet) -> Result<()> {
        self.open_methods = self
            .open_methods
            .iter()
            .map(|m| m.trim().to_uppercase())
            .filter(|m| !m.is_empty())
            .collect();
        // An empty marker would be contained in every path
        self.open_paths.retain(|p| !p.is_empty());
        Ok(())
    }
}

impl AuthzConfig {
    pub fn default_open_methods() -> Vec<String> {
        vec![String::from("GET")]
    }

    pub fn default_open_paths() -> Vec<String> {
        vec![
            String::from("data/metadata"),
            String::from("discovery-metadata"),
            String::from("stations"),
        ]
    }
}
