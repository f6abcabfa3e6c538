use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};

/// Where credentials are looked for. The query parameter always comes first.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthnConfig {
    /// Query parameter of the forwarded URI carrying the token.
    #[serde(default = "AuthnConfig::default_query_param")]
    pub query_param: String,

    /// Fall back to the `Authorization: Bearer <token>` header.
    #[serde(default = "AuthnConfig::default_bearer")]
    pub bearer: bool,
}

impl Default for AuthnConfig {
    fn default() -> Self {
        Self {
            query_param: Self::default_query_param(),
            bearer: Self::default_bearer(),
        }
    }
}

impl CommonConfig for AuthnConfig {
    fn complete(&mut self, _ps: &PathSet) -> Result<()> {
        self.query_param = expandenv("query_param", &self.query_param)?;
        if self.query_param.is_empty() {
            bail!("query_param cannot be empty");
        }
        Ok(())
    }
}

impl AuthnConfig {
    pub fn default_query_param() -> String {
        String::from("token")
    }

    pub fn default_bearer() -> bool {
        true
    }
}
